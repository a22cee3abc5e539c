//! Projected → geographic coordinate conversion.
//!
//! The register publishes positions in ETRS-GK25 (EPSG:3879), a transverse
//! Mercator on the GRS80 ellipsoid. The inverse uses Krüger's series to
//! fourth order in the third flattening, which is sub-millimetre accurate
//! within a few degrees of the central meridian.

use super::model::GeoPoint;

/// Converts a projected `(x, y)` pair in metres to a geographic position.
///
/// `x` is the easting and `y` the northing. Returns `None` when the input
/// cannot be mapped to a valid latitude/longitude.
pub trait Projection {
    fn to_geographic(&self, x: f64, y: f64) -> Option<GeoPoint>;
}

/// Reference ellipsoid given by semi-major axis and inverse flattening.
#[derive(Debug, Clone, Copy)]
pub struct Ellipsoid {
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        inverse_flattening: 298.257_222_101,
    };
}

/// Inverse transverse Mercator (`+proj=tmerc`).
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    central_meridian: f64,
    scale_factor: f64,
    false_easting: f64,
    false_northing: f64,
    /// Rectifying radius `A`.
    rectifying_radius: f64,
    beta: [f64; 4],
    delta: [f64; 4],
}

impl TransverseMercator {
    pub fn new(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = 1.0 / ellipsoid.inverse_flattening;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let rectifying_radius =
            ellipsoid.semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
            4397.0 * n4 / 161_280.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
            56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
            4279.0 * n4 / 630.0,
        ];

        TransverseMercator {
            central_meridian,
            scale_factor,
            false_easting,
            false_northing,
            rectifying_radius,
            beta,
            delta,
        }
    }

    /// EPSG:3879, ETRS89 / GK25FIN:
    /// `+proj=tmerc +lat_0=0 +lon_0=25 +k=1 +x_0=25500000 +y_0=0 +ellps=GRS80`.
    pub fn gk25() -> Self {
        TransverseMercator::new(Ellipsoid::GRS80, 25.0, 1.0, 25_500_000.0, 0.0)
    }
}

/// Beyond this normalized easting the series diverges (roughly 40° off the
/// central meridian on the equator).
const MAX_ETA: f64 = 0.8;

impl Projection for TransverseMercator {
    fn to_geographic(&self, x: f64, y: f64) -> Option<GeoPoint> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let k_a = self.scale_factor * self.rectifying_radius;
        let xi = (y - self.false_northing) / k_a;
        let eta = (x - self.false_easting) / k_a;
        if eta.abs() > MAX_ETA || xi.abs() > std::f64::consts::FRAC_PI_2 {
            return None;
        }

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in self.delta.iter().enumerate() {
            phi += d * (2.0 * (j + 1) as f64 * chi).sin();
        }
        let lambda = eta_p.sinh().atan2(xi_p.cos());

        let point = GeoPoint::new(
            phi.to_degrees(),
            self.central_meridian + lambda.to_degrees(),
        );
        point.is_valid().then_some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-7;

    #[test]
    fn central_meridian_maps_to_lon_25() {
        let p = TransverseMercator::gk25()
            .to_geographic(25_500_000.0, 6_675_000.0)
            .unwrap();
        assert!((p.longitude - 25.0).abs() < 1e-12);
        assert!(p.latitude > 60.0 && p.latitude < 60.5);
    }

    #[test]
    fn origin_maps_to_equator() {
        let p = TransverseMercator::gk25()
            .to_geographic(25_500_000.0, 0.0)
            .unwrap();
        assert!(p.latitude.abs() < 1e-12);
        assert!((p.longitude - 25.0).abs() < 1e-12);
    }

    #[test]
    fn senate_square_reprojects_to_known_position() {
        // Senate Square, Helsinki: 60.16952 N, 24.95234 E.
        let p = TransverseMercator::gk25()
            .to_geographic(25_497_354.189, 6_672_960.629)
            .unwrap();
        assert!((p.latitude - 60.16952).abs() < EPS, "lat {}", p.latitude);
        assert!((p.longitude - 24.95234).abs() < EPS, "lon {}", p.longitude);
    }

    #[test]
    fn east_of_meridian_is_east_of_25() {
        let p = TransverseMercator::gk25()
            .to_geographic(25_505_537.845, 6_681_930.617)
            .unwrap();
        assert!((p.latitude - 60.25).abs() < EPS);
        assert!((p.longitude - 25.1).abs() < EPS);
    }

    #[test]
    fn rejects_non_finite_and_far_off_input() {
        let tm = TransverseMercator::gk25();
        assert!(tm.to_geographic(f64::NAN, 6_672_000.0).is_none());
        assert!(tm.to_geographic(25_497_000.0, f64::INFINITY).is_none());
        // Coordinates missing the zone prefix land thousands of km west.
        assert!(tm.to_geographic(497_000.0, 6_672_000.0).is_none());
        assert!(tm.to_geographic(25_500_000.0, 20_000_000.0).is_none());
    }
}
