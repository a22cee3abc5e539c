use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use strum::{EnumIter, EnumString, IntoStaticStr};

// ---------------------------------------------------------------------------
// Kind – accident participant category
// ---------------------------------------------------------------------------

/// Participant category, keyed by the register's two-letter code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumString,
    IntoStaticStr, EnumIter,
)]
pub enum Kind {
    #[strum(serialize = "JK")]
    #[serde(rename = "JK")]
    Pedestrian,
    #[strum(serialize = "PP")]
    #[serde(rename = "PP")]
    Bicycle,
    #[strum(serialize = "MP")]
    #[serde(rename = "MP")]
    MotorTwoWheeler,
    #[strum(serialize = "MA")]
    #[serde(rename = "MA")]
    MotorVehicle,
}

impl Kind {
    /// Parse a register code (`JK`, `PP`, `MP`, `MA`).
    pub fn from_code(code: &str) -> Option<Self> {
        code.parse().ok()
    }

    /// The register code, e.g. `"JK"`.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Name of the map icon asset (`icons/<name>.svg`).
    pub fn icon_name(self) -> &'static str {
        match self {
            Kind::Pedestrian => "pedestrian",
            Kind::Bicycle => "bicycle",
            Kind::MotorTwoWheeler => "motorcycle",
            Kind::MotorVehicle => "car",
        }
    }

    /// Legend label, in Finnish as published with the register.
    pub fn description(self) -> &'static str {
        match self {
            Kind::Pedestrian => "Jalankulkija",
            Kind::Bicycle => "Polkupyörä",
            Kind::MotorTwoWheeler => "Moottoripyörä (ml. mopot)",
            Kind::MotorVehicle => "Auto (ml. kuorma-autot, yhdistelmät jne.)",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Seriousness – injury severity tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Seriousness {
    PropertyDamage = 1,
    Injury = 2,
    Death = 3,
}

impl Seriousness {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Seriousness::PropertyDamage),
            2 => Some(Seriousness::Injury),
            3 => Some(Seriousness::Death),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    /// Option label used by the severity selector.
    pub fn label(self) -> &'static str {
        match self {
            Seriousness::PropertyDamage => "omaisuusvahingot",
            Seriousness::Injury => "loukkaantumiseen johtaneet",
            Seriousness::Death => "kuolemaan johtaneet",
        }
    }
}

// ---------------------------------------------------------------------------
// AccidentRecord – one accepted row of the register
// ---------------------------------------------------------------------------

/// Geographic WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and inside the valid latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    pub kind: Kind,
    pub coordinates: GeoPoint,
    pub seriousness: Seriousness,
    pub year: i32,
}

// ---------------------------------------------------------------------------
// AccidentDataset – the complete loaded register
// ---------------------------------------------------------------------------

/// All accepted records in file order, plus the distinct years present.
#[derive(Debug, Clone, Default)]
pub struct AccidentDataset {
    pub records: Vec<AccidentRecord>,
    pub years: BTreeSet<i32>,
}

impl AccidentDataset {
    pub fn from_records(records: Vec<AccidentRecord>) -> Self {
        let years = records.iter().map(|r| r.year).collect();
        AccidentDataset { records, years }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kind_codes_round_trip_through_parser() {
        for kind in Kind::iter() {
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
            assert_eq!(kind.to_string(), kind.code());
        }
        assert_eq!(Kind::from_code("XX"), None);
        assert_eq!(Kind::from_code("jk"), None);
    }

    #[test]
    fn seriousness_accepts_only_known_tiers() {
        assert_eq!(Seriousness::from_code(1), Some(Seriousness::PropertyDamage));
        assert_eq!(Seriousness::from_code(3), Some(Seriousness::Death));
        assert_eq!(Seriousness::from_code(0), None);
        assert_eq!(Seriousness::from_code(4), None);
        assert_eq!(Seriousness::Injury.code(), 2);
    }

    #[test]
    fn geo_point_validity() {
        assert!(GeoPoint::new(60.17, 24.95).is_valid());
        assert!(!GeoPoint::new(91.0, 24.95).is_valid());
        assert!(!GeoPoint::new(60.0, f64::NAN).is_valid());
    }

    #[test]
    fn dataset_collects_distinct_years() {
        let rec = |year| AccidentRecord {
            kind: Kind::Bicycle,
            coordinates: GeoPoint::new(60.2, 24.9),
            seriousness: Seriousness::Injury,
            year,
        };
        let ds = AccidentDataset::from_records(vec![rec(2012), rec(2010), rec(2012)]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2010, 2012]);
    }
}
