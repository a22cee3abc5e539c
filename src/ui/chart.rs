use eframe::egui::{self, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};
use strum::IntoEnumIterator;

use crate::color::kind_color;
use crate::data::aggregate::KindCounts;
use crate::data::model::Kind;
use crate::ui::icons::IconRegistry;

// ---------------------------------------------------------------------------
// Accidents per kind (bar chart + legend)
// ---------------------------------------------------------------------------

/// One bar per kind, in the fixed JK, PP, MP, MA order.
pub fn kind_chart(ui: &mut Ui, counts: &KindCounts) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (kind, count))| {
            Bar::new(i as f64, count as f64)
                .name(short_label(kind))
                .fill(kind_color(kind))
                .width(0.7)
        })
        .collect();
    let codes: Vec<&'static str> = counts.iter().map(|(kind, _)| kind.code()).collect();

    Plot::new("kind_chart")
        .height(200.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .include_y(0.0)
        .include_y(counts.max().max(1) as f64 * 1.1)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            codes.get(i as usize).map(|c| c.to_string()).unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Colour swatch (kind icon when available) with the kind description and
/// its visible count.
pub fn legend(ui: &mut Ui, counts: &KindCounts, icons: &mut IconRegistry) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for kind in Kind::iter() {
            let color = kind_color(kind);
            ui.add(
                egui::Image::new(icons.uri(kind))
                    .tint(color)
                    .fit_to_exact_size(egui::vec2(12.0, 12.0)),
            );
            ui.label(RichText::new(legend_label(kind, counts)).small());
            ui.add_space(6.0);
        }
    });
}

fn legend_label(kind: Kind, counts: &KindCounts) -> String {
    format!("{} ({})", kind.description(), counts.get(kind))
}

/// Bar label; the motor kinds drop their parenthetical.
fn short_label(kind: Kind) -> &'static str {
    let description = kind.description();
    match kind {
        Kind::MotorVehicle | Kind::MotorTwoWheeler => {
            description.split(' ').next().unwrap_or(description)
        }
        Kind::Pedestrian | Kind::Bicycle => description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_drop_parentheticals() {
        assert_eq!(short_label(Kind::MotorVehicle), "Auto");
        assert_eq!(short_label(Kind::MotorTwoWheeler), "Moottoripyörä");
        assert_eq!(short_label(Kind::Pedestrian), "Jalankulkija");
    }

    #[test]
    fn legend_shows_count_per_kind() {
        let counts = KindCounts::default();
        assert_eq!(legend_label(Kind::Bicycle, &counts), "Polkupyörä (0)");
    }
}
