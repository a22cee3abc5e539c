use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use strum::IntoEnumIterator;

use crate::data::loader::DataSource;
use crate::data::model::Seriousness;
use crate::state::{AppState, YEAR_RANGE};
use crate::ui::chart;
use crate::ui::icons::IconRegistry;

const SOURCE_URL: &str = "https://hri.fi/data/fi/dataset/liikenneonnettomuudet-helsingissa";

// ---------------------------------------------------------------------------
// Left side panel – summary and filter form
// ---------------------------------------------------------------------------

/// Render the left panel: chart, data notes and the filter form.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, icons: &mut IconRegistry) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Liikenneonnettomuudet Helsingissä");
            ui.separator();

            chart::kind_chart(ui, &state.counts);
            ui.label(format!("Yhteensä {} onnettomuutta", state.counts.total()));
            chart::legend(ui, &state.counts, icons);
            ui.separator();

            ui.label(
                RichText::new(
                    "Liikenneonnettomuudet aikaväliltä 2000 — 2022, jotka ovat johtaneet \
                     omaisuusvahinkoon, loukkaantumiseen tai kuolemaan. Onnettomuusrekisteri \
                     perustuu poliisilta saatuihin tietoihin. Tiedot ovat täysin kattavia vain \
                     kuolemantapausten osalta. Aineistossa on puutteita mm. \
                     onnettomuusvahinkojen, lievien henkilövahinkojen sekä erityisesti \
                     jalankulkija-, polkupyörä- ja mopo-onnettomuuksien osalta.",
                )
                .small(),
            );
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.label(RichText::new("Lähde:").small());
                ui.hyperlink_to(
                    RichText::new("Liikenneonnettomuudet Helsingissä").small(),
                    SOURCE_URL,
                );
                ui.label(
                    RichText::new(
                        ". Helsinki Region Infoshare 21.09.2024. \
                         Lisenssi Creative Commons Attribution 4.0.",
                    )
                    .small(),
                );
            });
            ui.separator();

            filter_form(ui, state);
        });
}

/// Year, seriousness and heatmap controls. Every change refilters.
fn filter_form(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Suodata dataa");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Vuosi:");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.year_input)
                .hint_text(format!("{}–{}", YEAR_RANGE.start(), YEAR_RANGE.end()))
                .desired_width(80.0),
        );
        if response.changed() {
            state.submit_year_input();
        }
    });
    if let Some(err) = &state.year_error {
        ui.label(RichText::new(err.to_string()).italics().small().color(Color32::RED));
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Vain:");
        let current = state.criteria.seriousness_tier();
        let mut selected = current;
        egui::ComboBox::from_id_salt("seriousness")
            .selected_text(selected.map_or("kaikki", Seriousness::label))
            .show_ui(ui, |ui: &mut Ui| {
                ui.selectable_value(&mut selected, None, "kaikki");
                for tier in Seriousness::iter() {
                    ui.selectable_value(&mut selected, Some(tier), tier.label());
                }
            });
        if selected != current {
            state.set_seriousness(selected);
        }
    });

    let mut heatmap = state.heatmap;
    if ui.checkbox(&mut heatmap, "Lämpökartta").changed() {
        state.set_heatmap(heatmap);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.start_load(state.source.clone());
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label(format!("Loading {}…", state.source));
        } else if let Some(ds) = &state.dataset {
            let years = match (ds.years.first(), ds.years.last()) {
                (Some(first), Some(last)) => format!(", {first}–{last}"),
                _ => String::new(),
            };
            ui.label(format!(
                "{} accidents loaded{years} ({} rows skipped), {} visible",
                ds.len(),
                state.rejected_rows,
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open accident register")
        .add_filter("Accident register", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(DataSource::File(path));
    }
}
