use eframe::egui::{Color32, Stroke, Ui, Vec2};
use egui_plot::{
    Legend, MarkerShape, Plot, PlotBounds, PlotImage, PlotPoint, PlotPoints, PlotUi, Points,
    Polygon,
};
use strum::IntoEnumIterator;

use crate::color::{HeatRamp, kind_color};
use crate::data::model::{AccidentRecord, Kind};
use crate::state::AppState;
use crate::ui::heat::{HeatGrid, seriousness_weight};
use crate::ui::icons::IconRegistry;
use crate::ui::style::{LayerStyle, span_for_zoom, zoom_for_span};

/// Helsinki city centre.
const CENTER: [f64; 2] = [24.945831, 60.192059];
const INITIAL_ZOOM: f64 = 11.0;

/// Heat cells are this many pixels wide.
const HEAT_CELL_PX: f64 = 8.0;

// ---------------------------------------------------------------------------
// Accident map (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered accidents on a longitude/latitude plot.
pub fn accident_map(ui: &mut Ui, state: &AppState, icons: &mut IconRegistry) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.heading("Ladataan…");
            } else {
                ui.heading("Dataa ei saatavilla  (File → Open…)");
            }
        });
        return;
    }

    // One degree of longitude is cos(lat) degrees of latitude long.
    let aspect = 1.0 / CENTER[1].to_radians().cos();
    let half_span = span_for_zoom(INITIAL_ZOOM, ui.available_width() as f64) / 2.0;
    let ctx = ui.ctx().clone();

    Plot::new("accident_map")
        .legend(Legend::default())
        .data_aspect(aspect as f32)
        .include_x(CENTER[0] - half_span)
        .include_x(CENTER[0] + half_span)
        .include_y(CENTER[1])
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let bounds = plot_ui.plot_bounds();
            let frame = *plot_ui.transform().frame();
            let style = LayerStyle::at_zoom(zoom_for_span(bounds.width(), frame.width() as f64));
            let records: Vec<&AccidentRecord> = state.visible_records().collect();

            if state.heatmap {
                heat_layer(plot_ui, &records, &bounds, frame.size(), &style);
            } else {
                circle_layer(plot_ui, &records, &style);
                icon_layer(plot_ui, &ctx, icons, &records, &bounds, frame.size(), &style);
            }
        });
}

fn heat_layer(
    plot_ui: &mut PlotUi,
    records: &[&AccidentRecord],
    bounds: &PlotBounds,
    frame: Vec2,
    style: &LayerStyle,
) {
    if style.heat_opacity <= 0.0 {
        return;
    }
    let cols = (frame.x as f64 / HEAT_CELL_PX).ceil() as usize;
    let rows = (frame.y as f64 / HEAT_CELL_PX).ceil() as usize;
    let mut grid = HeatGrid::new(bounds.min(), bounds.max(), cols, rows);
    for r in records {
        grid.add(
            r.coordinates.longitude,
            r.coordinates.latitude,
            seriousness_weight(r.seriousness),
        );
    }
    if grid.total_weight() <= 0.0 {
        return;
    }
    let radius = (style.heat_radius as f64 / HEAT_CELL_PX).round() as usize;
    let grid = grid.smoothed(radius);
    let max = grid.max_weight();

    let ramp = HeatRamp::density();
    for (lo, hi, weight) in grid.cells() {
        let color = ramp
            .sample((weight / max) as f32)
            .gamma_multiply(style.heat_opacity);
        let square = PlotPoints::new(vec![
            [lo[0], lo[1]],
            [hi[0], lo[1]],
            [hi[0], hi[1]],
            [lo[0], hi[1]],
        ]);
        plot_ui.polygon(
            Polygon::new(square)
                .fill_color(color)
                .stroke(Stroke::NONE),
        );
    }
}

fn circle_layer(plot_ui: &mut PlotUi, records: &[&AccidentRecord], style: &LayerStyle) {
    if style.circle_opacity <= 0.0 {
        return;
    }
    for kind in Kind::iter() {
        let points: PlotPoints = records
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| [r.coordinates.longitude, r.coordinates.latitude])
            .collect();
        plot_ui.points(
            Points::new(points)
                .name(kind.description())
                .shape(MarkerShape::Circle)
                .filled(true)
                .radius(style.circle_radius)
                .color(kind_color(kind).gamma_multiply(style.circle_opacity)),
        );
    }
}

fn icon_layer(
    plot_ui: &mut PlotUi,
    ctx: &eframe::egui::Context,
    icons: &mut IconRegistry,
    records: &[&AccidentRecord],
    bounds: &PlotBounds,
    frame: Vec2,
    style: &LayerStyle,
) {
    if style.icon_opacity <= 0.0 || frame.x <= 0.0 || frame.y <= 0.0 {
        return;
    }
    // Icon size in plot units.
    let size = Vec2::new(
        (style.icon_size as f64 * bounds.width() / frame.x as f64) as f32,
        (style.icon_size as f64 * bounds.height() / frame.y as f64) as f32,
    );
    let [min_x, min_y] = bounds.min();
    let [max_x, max_y] = bounds.max();

    for r in records {
        let (x, y) = (r.coordinates.longitude, r.coordinates.latitude);
        if x < min_x || x > max_x || y < min_y || y > max_y {
            continue;
        }
        let Some(texture) = icons.texture(ctx, r.kind) else {
            continue;
        };
        let tint: Color32 = kind_color(r.kind).gamma_multiply(style.icon_opacity);
        plot_ui.image(PlotImage::new(texture, PlotPoint::new(x, y), size).tint(tint));
    }
}
