//! Run configuration, read from a JSON file and overridable from the command line.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accuracy::AccuracyOptions;
use crate::data::{CsvSource, RowOrder};
use crate::file::{ReadJsonFile, SEASON_PLACEHOLDER};
use crate::season::{InvalidSeason, Season};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("reference table is empty")]
    EmptyReferenceTable,

    #[error("alias '{alias}' has no alphanumeric characters")]
    BlankAlias { alias: String },

    #[error("alias '{alias}' maps to both {first} and {second}")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("{0}")]
    InvalidSeason(#[from] InvalidSeason),

    #[error("file pattern '{0}' does not contain {{season}}")]
    UnseasonedPattern(String),

    #[error("lopsided band {0} is outside 0..=50")]
    InvalidLopsidedBand(f64),

    #[error("cannot read {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory containing the per-season odds and results files.
    pub data_dir: PathBuf,
    pub odds_file: String,
    pub results_file: String,
    pub teams_file: PathBuf,
    pub seasons: Vec<Season>,
    pub row_order: RowOrder,
    pub accuracy: AccuracyOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("NHL Data"),
            odds_file: format!("nhl odds {SEASON_PLACEHOLDER}.csv"),
            results_file: format!("nhl results {SEASON_PLACEHOLDER}.csv"),
            teams_file: PathBuf::from("config/teams.json"),
            seasons: vec![],
            row_order: RowOrder::default(),
            accuracy: AccuracyOptions::default(),
        }
    }
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let config = Self::read_json_file(path).map_err(|source| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for pattern in [&self.odds_file, &self.results_file] {
            if !pattern.contains(SEASON_PLACEHOLDER) {
                return Err(ConfigurationError::UnseasonedPattern(pattern.clone()));
            }
        }
        if let Some(band) = self.accuracy.lopsided_band {
            if !(0.0..=50.0).contains(&band) {
                return Err(ConfigurationError::InvalidLopsidedBand(band));
            }
        }
        Ok(())
    }

    pub fn source(&self) -> CsvSource {
        CsvSource {
            dir: self.data_dir.clone(),
            odds_file: self.odds_file.clone(),
            results_file: self.results_file.clone(),
            row_order: self.row_order,
        }
    }
}
