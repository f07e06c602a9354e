//! Loading of the per-season odds and results tables.
//!
//! The odds table describes each game in two consecutive rows, one per team. Those rows are paired
//! into [`OddsGame`]s here, straight after loading, so that nothing downstream depends on row
//! parity.

use std::io;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;
use tracing::{debug, warn};

use crate::csv::CsvReader;
use crate::domain::{Ending, OddsGame, OddsSide};
use crate::file::season_path;
use crate::season::{Season, SeasonError};


pub const ODDS_COLUMNS: [&str; 4] = ["Date", "Team", "Final", "Close"];
pub const RESULTS_COLUMNS: [&str; 3] = ["Date", "Home", "RTOTSO"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Games in months from October onwards belong to the first year of a season.
const SEASON_START_MONTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TableKind {
    Odds,
    Results,
}

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot open {table} table {}: {source}", path.display())]
    Unreadable {
        table: TableKind,
        path: PathBuf,
        source: io::Error,
    },

    #[error("error reading {table} table: {source}")]
    Read { table: TableKind, source: io::Error },

    #[error("{table} table has no header")]
    MissingHeader { table: TableKind },

    #[error("{table} table is missing column '{column}'")]
    MissingColumn {
        table: TableKind,
        column: &'static str,
    },

    #[error("{table} table line {line}: malformed {column} '{value}'")]
    MalformedField {
        table: TableKind,
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("odds table line {line} has no row to pair with")]
    UnpairedRow { line: usize },
}

/// Which row of each pair in the odds table describes the home team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    #[default]
    VisitorFirst,
    HomeFirst,
}

/// One row of the odds table.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsRow {
    pub line: usize,
    pub date: NaiveDate,
    pub team: String,
    pub final_score: u16,

    /// The closing moneyline, as it appears in the source.
    pub close: String,
}
impl OddsRow {
    fn into_side(self) -> Result<OddsSide, SeasonError> {
        let close = self.close.parse().map_err(|source| SeasonError::InvalidOdds {
            line: self.line,
            team: self.team.clone(),
            source,
        })?;
        Ok(OddsSide {
            line: self.line,
            team: self.team,
            final_score: self.final_score,
            close,
        })
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub line: usize,
    pub date: NaiveDate,
    pub home: String,
    pub ending: Ending,
}

/// Where the tables for a season come from.
pub trait SeasonSource {
    fn odds(&self, season: &Season) -> Result<Vec<OddsRow>, DataLoadError>;

    fn results(&self, season: &Season) -> Result<Vec<ResultRow>, DataLoadError>;

    fn row_order(&self) -> RowOrder {
        RowOrder::default()
    }

    /// The season's odds, paired into games.
    fn games(&self, season: &Season) -> Result<Vec<OddsGame>, SeasonError> {
        pair_odds_rows(self.odds(season)?, self.row_order())
    }
}

/// Reads CSV tables from a directory, naming files by substituting the season label into a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSource {
    pub dir: PathBuf,
    pub odds_file: String,
    pub results_file: String,
    pub row_order: RowOrder,
}
impl CsvSource {
    pub fn odds_path(&self, season: &Season) -> PathBuf {
        season_path(&self.dir, &self.odds_file, season)
    }

    pub fn results_path(&self, season: &Season) -> PathBuf {
        season_path(&self.dir, &self.results_file, season)
    }
}

fn open(
    table: TableKind,
    path: &Path,
) -> Result<CsvReader<io::BufReader<std::fs::File>>, DataLoadError> {
    debug!("reading {table} table from {}", path.display());
    CsvReader::open(path).map_err(|source| DataLoadError::Unreadable {
        table,
        path: path.to_path_buf(),
        source,
    })
}

impl SeasonSource for CsvSource {
    fn odds(&self, season: &Season) -> Result<Vec<OddsRow>, DataLoadError> {
        read_odds(open(TableKind::Odds, &self.odds_path(season))?, season)
    }

    fn results(&self, season: &Season) -> Result<Vec<ResultRow>, DataLoadError> {
        read_results(open(TableKind::Results, &self.results_path(season))?, season)
    }

    fn row_order(&self) -> RowOrder {
        self.row_order
    }
}

/// Reads the named columns of every non-blank row, along with the row's line number.
fn read_columns<R: BufRead, const N: usize>(
    mut reader: CsvReader<R>,
    table: TableKind,
    columns: [&'static str; N],
) -> Result<Vec<(usize, [String; N])>, DataLoadError> {
    let header = reader
        .read()
        .ok_or(DataLoadError::MissingHeader { table })?
        .map_err(|source| DataLoadError::Read { table, source })?;
    let header: Vec<_> = header
        .iter()
        .map(|name| name.trim_start_matches('\u{feff}'))
        .collect();

    let mut indices = [0; N];
    for (index, &column) in columns.iter().enumerate() {
        indices[index] = header
            .iter()
            .position(|name| name.eq_ignore_ascii_case(column))
            .ok_or(DataLoadError::MissingColumn { table, column })?;
    }

    let mut rows = vec![];
    for (offset, record) in reader.enumerate() {
        let record = record.map_err(|source| DataLoadError::Read { table, source })?;
        if record.iter().all(String::is_empty) {
            continue;
        }
        let fields =
            std::array::from_fn(|index| record.get(indices[index]).cloned().unwrap_or_default());
        rows.push((offset + 2, fields));
    }
    Ok(rows)
}

fn malformed(table: TableKind, line: usize, column: &'static str, value: String) -> DataLoadError {
    DataLoadError::MalformedField {
        table,
        line,
        column,
        value,
    }
}

fn parse_date(
    table: TableKind,
    line: usize,
    raw: String,
    season: &Season,
) -> Result<NaiveDate, DataLoadError> {
    parse_game_date(&raw, season).ok_or_else(|| malformed(table, line, "Date", raw))
}

fn require_team(
    table: TableKind,
    line: usize,
    column: &'static str,
    raw: String,
) -> Result<String, DataLoadError> {
    if raw.is_empty() {
        Err(malformed(table, line, column, raw))
    } else {
        Ok(raw)
    }
}

pub fn read_odds<R: BufRead>(
    reader: CsvReader<R>,
    season: &Season,
) -> Result<Vec<OddsRow>, DataLoadError> {
    const TABLE: TableKind = TableKind::Odds;
    read_columns(reader, TABLE, ODDS_COLUMNS)?
        .into_iter()
        .map(|(line, [date, team, final_score, close])| -> Result<_, DataLoadError> {
            Ok(OddsRow {
                line,
                date: parse_date(TABLE, line, date, season)?,
                team: require_team(TABLE, line, "Team", team)?,
                final_score: final_score
                    .parse()
                    .map_err(|_| malformed(TABLE, line, "Final", final_score))?,
                close,
            })
        })
        .collect()
}

/// Reads the results table. A blank ending is taken to mean the game ended in regulation.
pub fn read_results<R: BufRead>(
    reader: CsvReader<R>,
    season: &Season,
) -> Result<Vec<ResultRow>, DataLoadError> {
    const TABLE: TableKind = TableKind::Results;
    read_columns(reader, TABLE, RESULTS_COLUMNS)?
        .into_iter()
        .map(|(line, [date, home, ending])| -> Result<_, DataLoadError> {
            let ending = if ending.is_empty() {
                Ending::default()
            } else {
                Ending::from_str(&ending).map_err(|_| malformed(TABLE, line, "RTOTSO", ending))?
            };
            Ok(ResultRow {
                line,
                date: parse_date(TABLE, line, date, season)?,
                home: require_team(TABLE, line, "Home", home)?,
                ending,
            })
        })
        .collect()
}

/// Parses a game date. Besides full dates, accepts the month-day form used by sportsbook
/// archives (`1004` for October 4th, `105` for January 5th), placing it in the season's first year
/// for October onwards and in the second year otherwise.
pub fn parse_game_date(raw: &str, season: &Season) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT) {
        return Some(date_time.date());
    }
    if (3..=4).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit()) {
        let month_day: u32 = raw.parse().ok()?;
        let (month, day) = (month_day / 100, month_day % 100);
        let year = if month >= SEASON_START_MONTH {
            season.start_year()
        } else {
            season.end_year()
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Pairs consecutive odds rows into games, assigning home and visitor roles by `order`. The game
/// takes the home row's date.
pub fn pair_odds_rows(rows: Vec<OddsRow>, order: RowOrder) -> Result<Vec<OddsGame>, SeasonError> {
    if rows.len() % 2 != 0 {
        let line = rows.last().map(|row| row.line).unwrap_or_default();
        return Err(DataLoadError::UnpairedRow { line }.into());
    }

    let mut games = Vec::with_capacity(rows.len() / 2);
    let mut rows = rows.into_iter();
    while let (Some(first), Some(second)) = (rows.next(), rows.next()) {
        let (home, visitor) = match order {
            RowOrder::VisitorFirst => (second, first),
            RowOrder::HomeFirst => (first, second),
        };
        if home.date != visitor.date {
            warn!(
                "odds lines {} and {} are paired but dated {} and {}",
                visitor.line, home.line, visitor.date, home.date
            );
        }
        games.push(OddsGame {
            date: home.date,
            home: home.into_side()?,
            visitor: visitor.into_side()?,
        });
    }
    Ok(games)
}
