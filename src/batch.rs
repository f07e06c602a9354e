//! Scoring of several seasons in one run. Seasons are independent: one that fails is reported
//! alongside the rest rather than aborting the run.

use std::io;
use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use crate::accuracy::{season_accuracy, AccuracyOptions, SeasonAccuracy};
use crate::csv::CsvWriter;
use crate::data::SeasonSource;
use crate::season::{Season, SeasonError};
use crate::teams::TeamDirectory;
use crate::timed::Timed;

#[derive(Debug, Error)]
#[error("season {season} failed")]
pub struct SeasonFailure {
    pub season: Season,
    #[source]
    pub error: SeasonError,
}

#[derive(Debug)]
pub struct SeasonOutcome {
    pub season: Season,
    pub elapsed: Duration,
    pub result: Result<SeasonAccuracy, SeasonFailure>,
}

/// Outcomes in the order the seasons were given.
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<SeasonOutcome>,
}
impl Report {
    pub fn accuracies(&self) -> impl Iterator<Item = &SeasonAccuracy> {
        self.outcomes.iter().filter_map(|outcome| outcome.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SeasonFailure> {
        self.outcomes.iter().filter_map(|outcome| outcome.result.as_ref().err())
    }

    pub fn elapsed(&self) -> Duration {
        self.outcomes.iter().map(|outcome| outcome.elapsed).sum()
    }

    /// Writes one record per scored season. Failed seasons are left out.
    pub fn write_csv<W: Write>(&self, writer: &mut CsvWriter<W>) -> Result<(), io::Error> {
        writer.append(CSV_HEADER)?;
        for accuracy in self.accuracies() {
            let mut record = vec![accuracy.season.to_string()];
            for score in [
                &accuracy.overall,
                &accuracy.regulation,
                &accuracy.overtime,
                &accuracy.shootout,
            ] {
                record.push(format!("{:.2}", score.accuracy));
                record.push(score.correct.to_string());
                record.push(score.total.to_string());
            }
            writer.append(record)?;
        }
        writer.flush()
    }
}

const CSV_HEADER: [&str; 13] = [
    "Season",
    "Overall",
    "Overall correct",
    "Overall games",
    "RT",
    "RT correct",
    "RT games",
    "OT",
    "OT correct",
    "OT games",
    "SO",
    "SO correct",
    "SO games",
];

pub fn run<S: SeasonSource + ?Sized>(
    source: &S,
    directory: &TeamDirectory,
    seasons: &[Season],
    options: &AccuracyOptions,
) -> Report {
    let mut outcomes = Vec::with_capacity(seasons.len());
    for season in seasons {
        let timed = Timed::run(|| season_accuracy(source, directory, season, options));
        let result = match timed.value {
            Ok(accuracy) => {
                info!(
                    "{season}: favourite won {:.2}% of {} games, took {:.3}s",
                    accuracy.overall.accuracy,
                    accuracy.overall.total,
                    timed.elapsed.as_secs_f64()
                );
                Ok(accuracy)
            }
            Err(err) => {
                error!("{season}: {err}");
                Err(SeasonFailure {
                    season: season.clone(),
                    error: err,
                })
            }
        };
        outcomes.push(SeasonOutcome {
            season: season.clone(),
            elapsed: timed.elapsed,
            result,
        });
    }
    Report { outcomes }
}
