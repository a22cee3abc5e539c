use std::sync::mpsc::{self, Receiver, TryRecvError};

use thiserror::Error;

use crate::data::aggregate::KindCounts;
use crate::data::filter::{FilterCriteria, filtered_indices};
use crate::data::loader::{self, DataSource, LoadError, LoadReport};
use crate::data::model::{AccidentDataset, AccidentRecord, Seriousness};

/// The register covers these years.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2000..=2022;

// ---------------------------------------------------------------------------
// Year field validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YearError {
    #[error("{0}: dataa on vain aikaväliltä 2000—2022")]
    OutOfRange(i32),
    #[error("vuosi on annettava numerona")]
    NotANumber,
}

pub fn validate_year(year: i32) -> Result<i32, YearError> {
    if YEAR_RANGE.contains(&year) {
        Ok(year)
    } else {
        Err(YearError::OutOfRange(year))
    }
}

pub fn parse_year(input: &str) -> Result<i32, YearError> {
    let year = input.trim().parse().map_err(|_| YearError::NotANumber)?;
    validate_year(year)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded register (None until a load succeeds).
    pub dataset: Option<AccidentDataset>,

    /// Where the register is (or was last) loaded from.
    pub source: DataSource,

    /// Year and seriousness selection driving the filtered view.
    pub criteria: FilterCriteria,

    /// Text of the year field; only valid years reach `criteria`.
    pub year_input: String,

    /// Validation message for the year field.
    pub year_error: Option<YearError>,

    /// Draw the density surface instead of markers.
    pub heatmap: bool,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Per-kind counts of the visible records (cached).
    pub counts: KindCounts,

    /// Rows dropped by the last load.
    pub rejected_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load is in progress.
    pub loading: bool,

    pending: Option<Receiver<Result<LoadReport, LoadError>>>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(DataSource::default(), FilterCriteria::default(), false)
    }
}

impl AppState {
    /// An out-of-range year is kept in the year field with its error, while
    /// the criteria fall back to the default year.
    pub fn new(source: DataSource, mut criteria: FilterCriteria, heatmap: bool) -> Self {
        let year_input = criteria.year.to_string();
        let year_error = validate_year(criteria.year).err();
        if year_error.is_some() {
            log::warn!("Ignoring year {year_input}, showing {}", FilterCriteria::default().year);
            criteria.year = FilterCriteria::default().year;
        }
        Self {
            dataset: None,
            source,
            criteria,
            year_input,
            year_error,
            heatmap,
            visible_indices: Vec::new(),
            counts: KindCounts::default(),
            rejected_rows: 0,
            status_message: None,
            loading: false,
            pending: None,
        }
    }

    /// Load `source` on a worker thread; [`AppState::poll_load`] picks up the
    /// result.
    pub fn start_load(&mut self, source: DataSource) {
        let (tx, rx) = mpsc::channel();
        let worker_source = source.clone();
        std::thread::spawn(move || {
            // The receiver is gone only if a newer load replaced this one.
            let _ = tx.send(loader::load(&worker_source));
        });
        log::info!("Loading accident register from {source}");
        self.source = source;
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Returns `true` when a pending load finished during this call.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.fail_load("load worker stopped unexpectedly".to_string());
                return true;
            }
        };
        self.pending = None;
        match result {
            Ok(report) => {
                self.rejected_rows = report.total_rejected();
                self.set_dataset(report.dataset);
            }
            Err(e) => self.fail_load(e.to_string()),
        }
        true
    }

    fn fail_load(&mut self, reason: String) {
        log::error!("Failed to load accident register from {}: {reason}", self.source);
        self.dataset = None;
        self.visible_indices.clear();
        self.counts = KindCounts::default();
        self.status_message = Some(format!("Dataa ei saatavilla ({reason})"));
        self.loading = false;
    }

    /// Ingest a newly loaded dataset and apply the current criteria.
    pub fn set_dataset(&mut self, dataset: AccidentDataset) {
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.refilter();
    }

    /// Recompute the visible records and their per-kind counts.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.criteria);
        self.counts = KindCounts::from_records(
            self.visible_indices.iter().map(|&i| &ds.records[i]),
        );
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &AccidentRecord> + '_ {
        let records = self.dataset.as_ref().map(|ds| ds.records.as_slice()).unwrap_or(&[]);
        self.visible_indices.iter().map(move |&i| &records[i])
    }

    /// Apply the year field's text. Invalid input leaves the criteria
    /// untouched and sets `year_error`.
    pub fn submit_year_input(&mut self) {
        match parse_year(&self.year_input) {
            Ok(year) => {
                self.year_error = None;
                if year != self.criteria.year {
                    self.criteria.year = year;
                    self.refilter();
                }
            }
            Err(e) => self.year_error = Some(e),
        }
    }

    pub fn set_seriousness(&mut self, seriousness: Option<Seriousness>) {
        self.criteria = FilterCriteria::new(self.criteria.year, seriousness);
        self.refilter();
    }

    pub fn set_heatmap(&mut self, heatmap: bool) {
        self.heatmap = heatmap;
        self.refilter();
    }
}
