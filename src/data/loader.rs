use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::model::{AccidentDataset, AccidentRecord, Kind, Seriousness};
use super::projection::{Projection, TransverseMercator};

/// Location of the register shipped with the application.
pub const DEFAULT_DATA_PATH: &str = "data/liikenneonnettomuudet_Helsingissa.csv";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The source could not be fetched or read. Row-level problems are never
/// reported through this type; see [`RowRejection`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("parsing rows: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Fetch the raw bytes. Blocks until the whole body is read; there is no
    /// timeout and no retry.
    pub fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            DataSource::File(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            }),
            DataSource::Url(url) => {
                let http = |source: reqwest::Error| LoadError::Http {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::blocking::Client::builder()
                    .timeout(None)
                    .build()
                    .map_err(http)?
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(http)?;
                Ok(response.bytes().map_err(http)?.to_vec())
            }
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(PathBuf::from(DEFAULT_DATA_PATH))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

// ---------------------------------------------------------------------------
// Row outcomes
// ---------------------------------------------------------------------------

/// Why a data line was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowRejection {
    TooFewFields,
    /// The register contains accidents reported without a location.
    MissingCoordinates,
    UnknownKind,
    InvalidNumber,
    UnknownSeriousness,
    ProjectionFailed,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowRejection::TooFewFields => "too few fields",
            RowRejection::MissingCoordinates => "missing coordinates",
            RowRejection::UnknownKind => "unknown kind",
            RowRejection::InvalidNumber => "invalid number",
            RowRejection::UnknownSeriousness => "unknown seriousness",
            RowRejection::ProjectionFailed => "projection failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(AccidentRecord),
    Rejected(RowRejection),
}

/// Result of a load: the accepted records and how many lines were dropped
/// for each reason.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub dataset: AccidentDataset,
    pub rejections: BTreeMap<RowRejection, usize>,
}

impl LoadReport {
    pub fn total_rejected(&self) -> usize {
        self.rejections.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch and parse the register from `source` using the GK25 projection.
pub fn load(source: &DataSource) -> Result<LoadReport, LoadError> {
    let bytes = source.fetch()?;
    let report = parse_register(&bytes, &TransverseMercator::gk25())?;
    if report.dataset.is_empty() {
        log::warn!("No usable accident rows in {source}");
    }
    log::info!(
        "Loaded {} accident records from {source}, {} rows rejected {:?}",
        report.dataset.len(),
        report.total_rejected(),
        report.rejections
    );
    Ok(report)
}

/// Parse register text: one header line, then `;`-separated data lines.
///
/// Invalid UTF-8 is replaced rather than failing the load, since only the
/// header carries non-ASCII text in practice.
pub fn parse_register(bytes: &[u8], projection: &dyn Projection) -> Result<LoadReport, LoadError> {
    let text = String::from_utf8_lossy(bytes);
    // The first line is the header whatever it holds, blank or not.
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut rejections: BTreeMap<RowRejection, usize> = BTreeMap::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let fields: Vec<&str> = row.iter().collect();
        match parse_row(&fields, projection) {
            RowOutcome::Accepted(record) => records.push(record),
            RowOutcome::Rejected(reason) => {
                log::debug!("Skipping data row {row_no}: {reason} ({fields:?})");
                *rejections.entry(reason).or_default() += 1;
            }
        }
    }

    Ok(LoadReport {
        dataset: AccidentDataset::from_records(records),
        rejections,
    })
}

/// Classify one data line already split on `;`.
pub fn parse_row(fields: &[&str], projection: &dyn Projection) -> RowOutcome {
    use RowRejection::*;

    // kind, north, east, seriousness, year; anything after is ignored
    let [kind, north, east, seriousness, year, ..] = fields else {
        return RowOutcome::Rejected(TooFewFields);
    };
    if north.is_empty() || east.is_empty() {
        return RowOutcome::Rejected(MissingCoordinates);
    }
    let Some(kind) = Kind::from_code(kind) else {
        return RowOutcome::Rejected(UnknownKind);
    };
    let (Ok(north), Ok(east), Ok(seriousness), Ok(year)) = (
        north.parse::<f64>(),
        east.parse::<f64>(),
        seriousness.parse::<i64>(),
        year.parse::<i32>(),
    ) else {
        return RowOutcome::Rejected(InvalidNumber);
    };
    let Some(seriousness) = Seriousness::from_code(seriousness) else {
        return RowOutcome::Rejected(UnknownSeriousness);
    };
    // Source order is (north, east); the projection takes (x, y) = (east, north).
    let Some(coordinates) = projection.to_geographic(east, north) else {
        return RowOutcome::Rejected(ProjectionFailed);
    };

    RowOutcome::Accepted(AccidentRecord {
        kind,
        coordinates,
        seriousness,
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GeoPoint;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Onnettomuustyyppi;pohjoinen;itä;vakavuus;vuosi";

    fn gk25() -> TransverseMercator {
        TransverseMercator::gk25()
    }

    fn outcome(line: &str) -> RowOutcome {
        let fields: Vec<&str> = line.split(';').collect();
        parse_row(&fields, &gk25())
    }

    #[test]
    fn valid_row_keeps_source_fields() {
        let RowOutcome::Accepted(rec) = outcome("PP;6672960.629;25497354.189;2;2015") else {
            panic!("row should be accepted");
        };
        assert_eq!(rec.kind, Kind::Bicycle);
        assert_eq!(rec.seriousness, Seriousness::Injury);
        assert_eq!(rec.year, 2015);
        assert!(rec.coordinates.is_valid());
        assert!((rec.coordinates.latitude - 60.16952).abs() < 1e-6);
        assert!((rec.coordinates.longitude - 24.95234).abs() < 1e-6);
    }

    #[test]
    fn reprojected_coordinates_differ_from_raw_and_fall_in_helsinki() {
        let samples = [
            ("JK", 6_675_472.098, 25_496_994.907),
            ("MA", 6_681_930.617, 25_505_537.845),
            ("MP", 6_670_100.0, 25_490_250.0),
        ];
        for (kind, north, east) in samples {
            let line = format!("{kind};{north};{east};1;2020");
            let RowOutcome::Accepted(rec) = outcome(&line) else {
                panic!("{line} should be accepted");
            };
            let GeoPoint {
                latitude,
                longitude,
            } = rec.coordinates;
            assert_ne!(latitude, north);
            assert_ne!(longitude, east);
            assert!((60.0..=60.5).contains(&latitude), "{line}: lat {latitude}");
            assert!((24.5..=25.5).contains(&longitude), "{line}: lon {longitude}");
        }
    }

    #[test]
    fn rejects_each_malformed_shape() {
        use RowRejection::*;
        let cases = [
            ("JK;;100;1;2010", MissingCoordinates),
            ("JK;6672000;;1;2010", MissingCoordinates),
            ("XX;100;100;1;2010", UnknownKind),
            ("JK;6672000;25497000;1", TooFewFields),
            ("", TooFewFields),
            ("JK;north;25497000;1;2010", InvalidNumber),
            ("JK;6672000;25497000;1;vuosi", InvalidNumber),
            ("JK;6672000;25497000;7;2010", UnknownSeriousness),
            ("JK;6672000;497000;1;2010", ProjectionFailed),
        ];
        for (line, expected) in cases {
            assert_eq!(outcome(line), RowOutcome::Rejected(expected), "{line:?}");
        }
    }

    #[test]
    fn extra_fields_are_ignored() {
        assert!(matches!(
            outcome("MA;6672000;25497000;3;2001;extra;columns"),
            RowOutcome::Accepted(AccidentRecord { year: 2001, .. })
        ));
    }

    #[test]
    fn header_plus_three_lines_yields_two_records() {
        let text = format!(
            "{HEADER}\r\nJK;6672960.629;25497354.189;1;2010\r\n\
             PP;;;2;2010\r\nMA;6675472.098;25496994.907;3;2011\r\n"
        );
        let report = parse_register(text.as_bytes(), &gk25()).unwrap();
        assert_eq!(report.dataset.len(), 2);
        assert_eq!(report.rejections.get(&RowRejection::MissingCoordinates), Some(&1));
        assert_eq!(report.total_rejected(), 1);
        let kinds: Vec<Kind> = report.dataset.records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![Kind::Pedestrian, Kind::MotorVehicle]);
    }

    #[test]
    fn counts_rejections_per_reason() {
        let text = format!(
            "{HEADER}\r\nXX;1;1;1;2010\r\nJK;;1;1;2010\r\nJK;1;;1;2010\r\n\
             MA;6672000;25497000\r\nMP;6672000;25497000;2;2019\r\n"
        );
        let report = parse_register(text.as_bytes(), &gk25()).unwrap();
        let expected: BTreeMap<RowRejection, usize> = [
            (RowRejection::UnknownKind, 1),
            (RowRejection::MissingCoordinates, 2),
            (RowRejection::TooFewFields, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(report.rejections, expected);
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.dataset.years.iter().copied().collect::<Vec<_>>(), vec![2019]);
    }

    #[test]
    fn header_only_and_non_utf8_header_are_fine() {
        let mut bytes = b"Onnettomuustyyppi;pohjoinen;it\xe4;vakavuus;vuosi\r\n".to_vec();
        let report = parse_register(&bytes, &gk25()).unwrap();
        assert!(report.dataset.is_empty());

        bytes.extend_from_slice(b"JK;6672000;25497000;1;2004\r\n");
        let report = parse_register(&bytes, &gk25()).unwrap();
        assert_eq!(report.dataset.len(), 1);
    }

    #[test]
    fn first_line_is_dropped_even_when_blank() {
        let text = format!("\r\n{HEADER}\r\nJK;6672000;25497000;1;2004\r\n");
        let report = parse_register(text.as_bytes(), &gk25()).unwrap();
        assert_eq!(report.dataset.len(), 1);
        assert_eq!(report.rejections.get(&RowRejection::UnknownKind), Some(&1));

        let report = parse_register(HEADER.as_bytes(), &gk25()).unwrap();
        assert!(report.dataset.is_empty());
        assert_eq!(report.total_rejected(), 0);
    }

    #[test]
    fn shipped_register_lands_in_helsinki() {
        let report = load(&DataSource::default()).unwrap();
        assert!(!report.dataset.is_empty());
        assert!(report.rejections.contains_key(&RowRejection::UnknownKind));
        for rec in &report.dataset.records {
            let GeoPoint {
                latitude,
                longitude,
            } = rec.coordinates;
            assert!((60.0..=60.5).contains(&latitude), "{rec:?}");
            assert!((24.5..=25.5).contains(&longitude), "{rec:?}");
            assert!((2000..=2022).contains(&rec.year));
        }
    }

    #[test]
    fn data_source_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("https://example.org/data.csv"),
            DataSource::Url("https://example.org/data.csv".into())
        );
        assert_eq!(
            DataSource::parse("data/x.csv"),
            DataSource::File(PathBuf::from("data/x.csv"))
        );
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "helsinki-accidents-loader-{}.csv",
            std::process::id()
        ));
        let text = format!("{HEADER}\r\nPP;6672000;25497000;1;2022\r\nJK;;;1;2022\r\n");
        std::fs::write(&path, text).unwrap();

        let report = load(&DataSource::File(path.clone())).unwrap();
        assert_eq!(report.dataset.len(), 1);
        std::fs::remove_file(&path).unwrap();

        let err = load(&DataSource::File(path)).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "{err}");
    }
}
