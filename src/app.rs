use std::time::Duration;

use eframe::egui;

use crate::state::AppState;
use crate::ui::icons::IconRegistry;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AccidentMapApp {
    pub state: AppState,
    pub icons: IconRegistry,
}

impl AccidentMapApp {
    /// Start loading the state's data source right away.
    pub fn new(mut state: AppState) -> Self {
        state.start_load(state.source.clone());
        Self {
            state,
            icons: IconRegistry::default(),
        }
    }
}

impl eframe::App for AccidentMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.icons);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::accident_map(ui, &self.state, &mut self.icons);
        });
    }
}
