use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::model::{AccidentRecord, Kind};

/// Accident count per kind, always carrying all four kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindCounts(BTreeMap<Kind, usize>);

impl Default for KindCounts {
    fn default() -> Self {
        KindCounts(Kind::iter().map(|k| (k, 0)).collect())
    }
}

impl KindCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AccidentRecord>) -> Self {
        let mut counts = KindCounts::default();
        for record in records {
            *counts.0.entry(record.kind).or_default() += 1;
        }
        counts
    }

    pub fn get(&self, kind: Kind) -> usize {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn max(&self) -> usize {
        self.0.values().copied().max().unwrap_or(0)
    }

    /// `(kind, count)` in chart order: JK, PP, MP, MA.
    pub fn iter(&self) -> impl Iterator<Item = (Kind, usize)> + '_ {
        self.0.iter().map(|(k, c)| (*k, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{GeoPoint, Seriousness};
    use pretty_assertions::assert_eq;

    fn rec(kind: Kind) -> AccidentRecord {
        AccidentRecord {
            kind,
            coordinates: GeoPoint::new(60.2, 24.9),
            seriousness: Seriousness::PropertyDamage,
            year: 2020,
        }
    }

    #[test]
    fn counts_every_kind_regardless_of_order() {
        use Kind::*;
        let a = [MotorVehicle, Pedestrian, MotorVehicle, Bicycle, Pedestrian, MotorVehicle];
        let mut b = a;
        b.reverse();

        let from_a = KindCounts::from_records(&a.map(rec));
        let from_b = KindCounts::from_records(&b.map(rec));
        assert_eq!(from_a, from_b);
        assert_eq!(
            from_a.iter().collect::<Vec<_>>(),
            vec![(Pedestrian, 2), (Bicycle, 1), (MotorTwoWheeler, 0), (MotorVehicle, 3)]
        );
        assert_eq!(from_a.total(), 6);
        assert_eq!(from_a.max(), 3);
    }

    #[test]
    fn empty_input_reports_zeros() {
        let counts = KindCounts::from_records(&Vec::<AccidentRecord>::new());
        assert_eq!(counts.iter().count(), 4);
        assert_eq!(counts.get(Kind::MotorTwoWheeler), 0);
        assert_eq!(counts.total(), 0);
    }
}
