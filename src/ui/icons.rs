use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use eframe::egui::load::{SizeHint, TexturePoll};
use eframe::egui::{Context, TextureId, TextureOptions};

use crate::data::model::Kind;

/// Directory holding `<icon name>.svg` per kind.
pub const DEFAULT_ICON_DIR: &str = "icons";

// ---------------------------------------------------------------------------
// Lazily registered per-kind map icons
// ---------------------------------------------------------------------------

/// Resolves a kind's icon the first time a layer asks for it.
///
/// The SVGs are white so they can be tinted with the kind colour.
#[derive(Debug)]
pub struct IconRegistry {
    dir: PathBuf,
    registered: BTreeMap<Kind, String>,
    failed: BTreeSet<Kind>,
}

impl Default for IconRegistry {
    fn default() -> Self {
        IconRegistry::new(DEFAULT_ICON_DIR)
    }
}

impl IconRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        IconRegistry {
            dir: dir.into(),
            registered: BTreeMap::new(),
            failed: BTreeSet::new(),
        }
    }

    /// Image URI for `kind`, registering it on first request.
    pub fn uri(&mut self, kind: Kind) -> String {
        let dir = &self.dir;
        self.registered
            .entry(kind)
            .or_insert_with(|| {
                let path = dir.join(format!("{}.svg", kind.icon_name()));
                let uri = format!("file://{}", path.display());
                log::debug!("Icon for {kind} requested but not loaded, registering {uri}");
                uri
            })
            .clone()
    }

    /// Texture for `kind` once the image loaders have decoded it.
    ///
    /// Returns `None` while loading or when the asset is unavailable; the
    /// caller skips the icon for this frame.
    pub fn texture(&mut self, ctx: &Context, kind: Kind) -> Option<TextureId> {
        if self.failed.contains(&kind) {
            return None;
        }
        let uri = self.uri(kind);
        match ctx.try_load_texture(&uri, TextureOptions::LINEAR, SizeHint::default()) {
            Ok(TexturePoll::Ready { texture }) => Some(texture.id),
            Ok(TexturePoll::Pending { .. }) => None,
            Err(e) => {
                log::warn!("Failed to load icon {uri}: {e}");
                self.failed.insert(kind);
                None
            }
        }
    }
}
