//! Zoom-dependent styling of the map layers.
//!
//! Zoom levels follow the web-mercator tile convention: at zoom `z` the
//! whole 360° of longitude spans `256 · 2^z` pixels.

const TILE_SIZE: f64 = 256.0;
const MAX_ZOOM: f64 = 22.0;

/// Zoom level at which `lon_span` degrees fill `width_px` pixels.
pub fn zoom_for_span(lon_span: f64, width_px: f64) -> f64 {
    if !(lon_span > 0.0 && width_px > 0.0) {
        return MAX_ZOOM;
    }
    (360.0 * width_px / (TILE_SIZE * lon_span))
        .log2()
        .clamp(0.0, MAX_ZOOM)
}

/// Longitude span covered by `width_px` pixels at `zoom`.
pub fn span_for_zoom(zoom: f64, width_px: f64) -> f64 {
    360.0 * width_px / (TILE_SIZE * 2f64.powf(zoom))
}

/// Linear interpolation between `(input, output)` stops, clamped at both ends.
pub fn interpolate_linear(stops: &[(f64, f64)], x: f64) -> f64 {
    interpolate(stops, x, |t| t)
}

/// Exponential interpolation: `base > 1` makes the output rise faster near
/// the upper stop of each segment.
pub fn interpolate_exponential(base: f64, stops: &[(f64, f64)], x: f64) -> f64 {
    interpolate(stops, x, |t| {
        if (base - 1.0).abs() < f64::EPSILON {
            t
        } else {
            (base.powf(t) - 1.0) / (base - 1.0)
        }
    })
}

/// `ease` maps a distance from the segment start (in input units) to an
/// unnormalized progress value.
fn interpolate(stops: &[(f64, f64)], x: f64, ease: impl Fn(f64) -> f64) -> f64 {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (stops.first(), stops.last()) else {
        return 0.0;
    };
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }
    for pair in stops.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            let span = ease(x1 - x0);
            let t = if span > 0.0 { ease(x - x0) / span } else { 1.0 };
            return y0 + (y1 - y0) * t;
        }
    }
    y_last
}

/// Resolved paint properties of the three accident layers at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Marker radius in pixels.
    pub circle_radius: f32,
    pub circle_opacity: f32,
    pub icon_opacity: f32,
    /// Icon edge length in pixels.
    pub icon_size: f32,
    /// Smoothing radius of the heat layer in pixels.
    pub heat_radius: f32,
    pub heat_opacity: f32,
}

/// Icons are drawn from 24 × 24 px assets.
pub const ICON_BASE_SIZE: f64 = 24.0;

impl LayerStyle {
    pub fn at_zoom(zoom: f64) -> Self {
        let icon_scale =
            interpolate_exponential(1.5, &[(5.0, 0.1), (10.0, 0.5), (15.0, 1.0)], zoom);
        LayerStyle {
            circle_radius: interpolate_linear(&[(10.0, 2.0), (15.0, 6.0)], zoom) as f32,
            circle_opacity: interpolate_linear(&[(13.0, 1.0), (14.0, 0.0)], zoom) as f32,
            icon_opacity: interpolate_linear(&[(13.0, 0.0), (14.0, 1.0)], zoom) as f32,
            icon_size: (ICON_BASE_SIZE * icon_scale) as f32,
            heat_radius: interpolate_linear(&[(0.0, 2.0), (15.0, 30.0)], zoom) as f32,
            heat_opacity: interpolate_linear(&[(8.0, 0.0), (15.0, 1.0)], zoom) as f32,
        }
    }
}
