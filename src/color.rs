use eframe::egui::Color32;
use palette::{LinSrgba, Mix, Srgba};

use crate::data::model::Kind;

// ---------------------------------------------------------------------------
// Per-kind palette
// ---------------------------------------------------------------------------

/// Colour used for a kind's markers, icons and chart bar.
pub fn kind_color(kind: Kind) -> Color32 {
    match kind {
        Kind::Pedestrian => Color32::from_rgb(0x86, 0x22, 0x09),
        Kind::Bicycle => Color32::from_rgb(0x38, 0x91, 0xA6),
        Kind::MotorTwoWheeler => Color32::from_rgb(0xE9, 0xB8, 0x72),
        Kind::MotorVehicle => Color32::from_rgb(0x56, 0x42, 0x56),
    }
}

// ---------------------------------------------------------------------------
// Heat ramp: density in [0, 1] → colour
// ---------------------------------------------------------------------------

/// Piecewise-linear colour ramp, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct HeatRamp {
    stops: Vec<(f32, LinSrgba)>,
}

impl HeatRamp {
    /// Stops must be sorted by position.
    pub fn new(stops: &[(f32, [u8; 4])]) -> Self {
        let stops = stops
            .iter()
            .map(|&(t, [r, g, b, a])| {
                let srgba: Srgba<f32> = Srgba::new(r, g, b, a).into_format();
                let linear: LinSrgba = srgba.into_linear();
                (t, linear)
            })
            .collect();
        HeatRamp { stops }
    }

    /// Transparent blue through pale tones to deep red.
    pub fn density() -> Self {
        HeatRamp::new(&[
            (0.0, [33, 102, 172, 0]),
            (0.2, [103, 169, 207, 255]),
            (0.4, [209, 229, 240, 255]),
            (0.6, [253, 219, 199, 255]),
            (0.8, [239, 138, 98, 255]),
            (1.0, [178, 24, 43, 255]),
        ])
    }

    pub fn sample(&self, t: f32) -> Color32 {
        let Some(&(_, first)) = self.stops.first() else {
            return Color32::TRANSPARENT;
        };
        let t = t.clamp(0.0, 1.0);
        let mut color = first;
        for pair in self.stops.windows(2) {
            let (t0, c0) = pair[0];
            let (t1, c1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                let factor = if span > 0.0 { (t - t0) / span } else { 1.0 };
                color = c0.mix(c1, factor.clamp(0.0, 1.0));
                break;
            }
            color = c1;
        }
        to_color32(color)
    }
}

fn to_color32(color: LinSrgba) -> Color32 {
    let srgba: Srgba<f32> = Srgba::from_linear(color);
    let srgba: Srgba<u8> = srgba.into_format();
    Color32::from_rgba_unmultiplied(srgba.red, srgba.green, srgba.blue, srgba.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_hits_its_stops() {
        let ramp = HeatRamp::density();
        assert_eq!(ramp.sample(0.0).a(), 0);
        assert_eq!(ramp.sample(1.0), Color32::from_rgb(178, 24, 43));
        assert_eq!(ramp.sample(0.4), Color32::from_rgb(209, 229, 240));
    }

    #[test]
    fn ramp_clamps_out_of_range() {
        let ramp = HeatRamp::density();
        assert_eq!(ramp.sample(7.0), ramp.sample(1.0));
        assert_eq!(ramp.sample(-1.0), ramp.sample(0.0));
    }

    #[test]
    fn kinds_have_distinct_colors() {
        use strum::IntoEnumIterator;
        let colors: std::collections::HashSet<_> = Kind::iter().map(kind_color).collect();
        assert_eq!(colors.len(), 4);
    }
}
