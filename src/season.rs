//! Season labels and the errors scoped to processing a single season.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accuracy::InsufficientData;
use crate::data::DataLoadError;
use crate::odds::InvalidOdds;
use crate::reconcile::EmptyJoin;

/// A season label of the form `yyyy-yy`, e.g. `2018-19`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season {
    label: String,
    start_year: i32,
}
impl Season {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("season '{0}' should be in the form yyyy-yy, with yy following yyyy")]
pub struct InvalidSeason(pub String);

impl FromStr for Season {
    type Err = InvalidSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSeason(s.to_owned());
        let label = s.trim();
        let (start, end) = label.split_once('-').ok_or_else(invalid)?;
        if start.len() != 4 || end.len() != 2 {
            return Err(invalid());
        }
        let start_year: i32 = start.parse().map_err(|_| invalid())?;
        let end_suffix: i32 = end.parse().map_err(|_| invalid())?;
        if (start_year + 1) % 100 != end_suffix {
            return Err(invalid());
        }
        Ok(Self {
            label: label.to_owned(),
            start_year,
        })
    }
}

impl TryFrom<String> for Season {
    type Error = InvalidSeason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.label
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Anything that can abort the processing of one season without affecting the others.
#[derive(Debug, Error)]
pub enum SeasonError {
    #[error("{0}")]
    DataLoad(#[from] DataLoadError),

    #[error("odds table line {line} ({team}): {source}")]
    InvalidOdds {
        line: usize,
        team: String,
        source: InvalidOdds,
    },

    #[error("{0}")]
    EmptyJoin(#[from] EmptyJoin),

    #[error("{0}")]
    InsufficientData(#[from] InsufficientData),
}
