mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result, anyhow};
use app::AccidentMapApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    if let Some(path) = &config.export_geojson {
        return export_geojson(&config, path);
    }

    let state = AppState::new(config.source(), config.criteria(), config.heatmap);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Liikenneonnettomuudet Helsingissä",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the svg icons.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(AccidentMapApp::new(state)))
        }),
    )
    .map_err(|e| anyhow!("running viewer: {e}"))
}

/// Load, filter and write the visible accidents as a GeoJSON feature
/// collection without opening a window.
fn export_geojson(config: &Config, path: &std::path::Path) -> Result<()> {
    let criteria = config.criteria();
    state::validate_year(criteria.year).with_context(|| format!("year {}", criteria.year))?;

    let source = config.source();
    let report = data::loader::load(&source)
        .with_context(|| format!("no data available from {source}"))?;
    let visible = data::filter::filter(&report.dataset.records, &criteria);
    let counts = data::aggregate::KindCounts::from_records(&visible);

    let collection = data::features::to_feature_collection(&visible);
    let json = serde_json::to_string(&collection).context("serializing features")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    log::info!(
        "Wrote {} of {} accidents to {}",
        visible.len(),
        report.dataset.len(),
        path.display()
    );
    for (kind, count) in counts.iter() {
        println!("{:<3}{count:>6}  {}", kind.code(), kind.description());
    }
    Ok(())
}
