use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{FilterCriteria, NO_SERIOUSNESS_FILTER};
use crate::data::loader::{DEFAULT_DATA_PATH, DataSource};

/// Command-line configuration.
#[derive(Debug, Parser)]
#[command(version, about = "Helsinki traffic accidents on a map")]
pub struct Config {
    /// Register to load: a file path or an http(s) URL.
    #[arg(long, env = "ACCIDENT_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: String,

    /// Initial year filter.
    #[arg(long, default_value_t = 2022)]
    pub year: i32,

    /// Initial seriousness filter: 1 property damage, 2 injury, 3 death, -1 all.
    #[arg(long, default_value_t = NO_SERIOUSNESS_FILTER, allow_negative_numbers = true)]
    pub seriousness: i32,

    /// Start with the heat layer instead of markers.
    #[arg(long)]
    pub heatmap: bool,

    /// Write the filtered accidents as GeoJSON to this file and exit.
    #[arg(long, value_name = "PATH")]
    pub export_geojson: Option<PathBuf>,
}

impl Config {
    pub fn source(&self) -> DataSource {
        DataSource::parse(&self.data)
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            year: self.year,
            seriousness: self.seriousness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let config = Config::try_parse_from(["helsinki-accidents"]).unwrap();
        assert_eq!(config.criteria(), FilterCriteria::default());
        assert_eq!(config.source(), DataSource::default());
        assert!(!config.heatmap);
        assert!(config.export_geojson.is_none());
    }

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "helsinki-accidents",
            "--data",
            "https://example.org/accidents.csv",
            "--year",
            "2010",
            "--seriousness",
            "3",
            "--heatmap",
            "--export-geojson",
            "out.geojson",
        ])
        .unwrap();
        assert_eq!(config.criteria(), FilterCriteria { year: 2010, seriousness: 3 });
        assert!(matches!(config.source(), DataSource::Url(_)));
        assert!(config.heatmap);
        assert_eq!(config.export_geojson, Some(PathBuf::from("out.geojson")));
    }

    #[test]
    fn accepts_negative_seriousness() {
        let config =
            Config::try_parse_from(["helsinki-accidents", "--seriousness", "-1"]).unwrap();
        assert_eq!(config.seriousness, NO_SERIOUSNESS_FILTER);
    }
}
