use super::model::{AccidentDataset, AccidentRecord, Seriousness};

// ---------------------------------------------------------------------------
// Filter criteria: year plus optional severity tier
// ---------------------------------------------------------------------------

/// Value of the raw seriousness criterion meaning "no filter".
pub const NO_SERIOUSNESS_FILTER: i32 = -1;

/// What the user currently asks to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterCriteria {
    pub year: i32,
    /// `-1` shows every tier, any other value must match exactly.
    pub seriousness: i32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            year: 2022,
            seriousness: NO_SERIOUSNESS_FILTER,
        }
    }
}

impl FilterCriteria {
    pub fn new(year: i32, seriousness: Option<Seriousness>) -> Self {
        Self {
            year,
            seriousness: seriousness.map_or(NO_SERIOUSNESS_FILTER, Seriousness::code),
        }
    }

    /// The selected tier, if the criterion names a known one.
    pub fn seriousness_tier(&self) -> Option<Seriousness> {
        Seriousness::from_code(self.seriousness.into())
    }

    pub fn matches(&self, record: &AccidentRecord) -> bool {
        record.year == self.year
            && (self.seriousness == NO_SERIOUSNESS_FILTER
                || record.seriousness.code() == self.seriousness)
    }
}

/// Records matching `criteria`, in their original order.
pub fn filter(records: &[AccidentRecord], criteria: &FilterCriteria) -> Vec<AccidentRecord> {
    records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Return indices of records that pass `criteria`.
pub fn filtered_indices(dataset: &AccidentDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}
