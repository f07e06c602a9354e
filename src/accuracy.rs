//! How often the odds-implied favourite won.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use thiserror::Error;
use tracing::debug;

use crate::data::SeasonSource;
use crate::domain::{Ending, JoinedGame, TiePolicy};
use crate::reconcile::season_data;
use crate::season::{Season, SeasonError};
use crate::teams::TeamDirectory;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyOptions {
    pub tie_policy: TiePolicy,

    /// If set, only games whose home win probability lies at least this many points from 50 count.
    pub lopsided_band: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Overall,
    Ending(Ending),
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Partition::Overall => write!(f, "overall"),
            Partition::Ending(ending) => write!(f, "{ending}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("season {season}: no games to score in the {partition} partition")]
pub struct InsufficientData {
    pub season: Season,
    pub partition: Partition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    correct: usize,
    total: usize,
}
impl Tally {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    fn score(&self, season: &Season, partition: Partition) -> Result<Score, InsufficientData> {
        if self.total == 0 {
            return Err(InsufficientData {
                season: season.clone(),
                partition,
            });
        }
        Ok(Score {
            accuracy: 100.0 * self.correct as f64 / self.total as f64,
            correct: self.correct,
            total: self.total,
        })
    }
}

/// The share of correctly predicted games in a partition, as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAccuracy {
    pub season: Season,
    pub overall: Score,
    pub regulation: Score,
    pub overtime: Score,
    pub shootout: Score,
}
impl SeasonAccuracy {
    pub fn by_ending(&self, ending: Ending) -> &Score {
        match ending {
            Ending::Regulation => &self.regulation,
            Ending::Overtime => &self.overtime,
            Ending::Shootout => &self.shootout,
        }
    }
}

/// Scores the favourite of each game against its victor, overall and by ending. Fails if any of the
/// partitions ends up with no games to score.
pub fn prediction_accuracy(
    season: &Season,
    games: &[JoinedGame],
    options: &AccuracyOptions,
) -> Result<SeasonAccuracy, InsufficientData> {
    let mut overall = Tally::default();
    let mut by_ending = [Tally::default(); Ending::COUNT];
    let (mut even, mut balanced) = (0, 0);
    for game in games {
        if let Some(band) = options.lopsided_band {
            if !game.is_lopsided(band) {
                balanced += 1;
                continue;
            }
        }
        let Some(correct) = game.is_correct(options.tie_policy) else {
            even += 1;
            continue;
        };
        overall.record(correct);
        by_ending[game.ending as usize].record(correct);
    }
    if even > 0 {
        debug!("{season}: excluded {even} games with even odds");
    }
    if balanced > 0 {
        debug!("{season}: excluded {balanced} games inside the lopsided band");
    }

    let score = |tally: &Tally, partition| tally.score(season, partition);
    let ending_score =
        |ending: Ending| score(&by_ending[ending as usize], Partition::Ending(ending));
    Ok(SeasonAccuracy {
        season: season.clone(),
        overall: score(&overall, Partition::Overall)?,
        regulation: ending_score(Ending::Regulation)?,
        overtime: ending_score(Ending::Overtime)?,
        shootout: ending_score(Ending::Shootout)?,
    })
}

/// Joins the season's odds and results, then scores the predictions.
pub fn season_accuracy<S: SeasonSource + ?Sized>(
    source: &S,
    directory: &TeamDirectory,
    season: &Season,
    options: &AccuracyOptions,
) -> Result<SeasonAccuracy, SeasonError> {
    let games = season_data(source, directory, season)?;
    Ok(prediction_accuracy(season, &games, options)?)
}
