//! Testing helpers.

use std::cell::Cell;
use std::str::FromStr;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::data::{DataLoadError, OddsRow, ResultRow, SeasonSource, TableKind};
use crate::domain::{Ending, GameKey, JoinedGame};
use crate::season::Season;
use crate::teams::TeamDirectory;

pub const ALIASES: &[(&str, &str)] = &[
    ("Anaheim", "ANA"),
    ("Arizona", "ARI"),
    ("Boston", "BOS"),
    ("Columbus", "CBJ"),
    ("Columbus Blue Jackets", "CBJ"),
    ("Montreal", "MTL"),
    ("Montreal Canadiens", "MTL"),
    ("New Jersey", "NJD"),
    ("NYIslanders", "NYI"),
    ("NYRangers", "NYR"),
    ("St. Louis", "STL"),
    ("San Jose", "SJS"),
    ("San Jose Sharks", "SJS"),
    ("Tampa Bay", "TBL"),
    ("Toronto", "TOR"),
    ("Toronto Maple Leafs", "TOR"),
    ("Washington", "WSH"),
    ("Washington Capitals", "WSH"),
];

pub fn directory() -> TeamDirectory {
    TeamDirectory::new(ALIASES.iter().copied()).unwrap()
}

pub fn season() -> Season {
    Season::from_str("2018-19").unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn odds_row(
    line: usize,
    date: NaiveDate,
    team: &str,
    final_score: u16,
    close: &str,
) -> OddsRow {
    OddsRow {
        line,
        date,
        team: team.into(),
        final_score,
        close: close.into(),
    }
}

pub fn result_row(line: usize, date: NaiveDate, home: &str, ending: Ending) -> ResultRow {
    ResultRow {
        line,
        date,
        home: home.into(),
        ending,
    }
}

/// Appends the two odds rows of a game, visitor first.
pub fn push_game(
    rows: &mut Vec<OddsRow>,
    date: NaiveDate,
    (visitor, visitor_score, visitor_close): (&str, u16, &str),
    (home, home_score, home_close): (&str, u16, &str),
) {
    let line = rows.len() + 2;
    rows.push(odds_row(line, date, visitor, visitor_score, visitor_close));
    rows.push(odds_row(line + 1, date, home, home_score, home_close));
}

/// A game between Toronto at home and Montreal, played in October 2018.
pub fn joined_game(day: u32, home_win_prob: f64, victor: &str, ending: Ending) -> JoinedGame {
    JoinedGame {
        key: GameKey::new(date(2018, 10, day), "TOR"),
        home: "TOR".into(),
        visitor: "MTL".into(),
        home_win_prob,
        victor: victor.into(),
        ending,
        season: season(),
    }
}

/// Serves tables from memory. A season with no tables fails to load as if its files were missing.
#[derive(Default)]
pub struct MemorySource {
    tables: FxHashMap<Season, (Vec<OddsRow>, Vec<ResultRow>)>,
    loads: Cell<usize>,
}
impl MemorySource {
    pub fn with_season(
        mut self,
        season: Season,
        odds: Vec<OddsRow>,
        results: Vec<ResultRow>,
    ) -> Self {
        self.tables.insert(season, (odds, results));
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    fn missing(table: TableKind, season: &Season) -> DataLoadError {
        DataLoadError::Unreadable {
            table,
            path: format!("memory/{season}").into(),
            source: std::io::ErrorKind::NotFound.into(),
        }
    }
}

impl SeasonSource for MemorySource {
    fn odds(&self, season: &Season) -> Result<Vec<OddsRow>, DataLoadError> {
        self.loads.set(self.loads.get() + 1);
        self.tables
            .get(season)
            .map(|(odds, _)| odds.clone())
            .ok_or_else(|| Self::missing(TableKind::Odds, season))
    }

    fn results(&self, season: &Season) -> Result<Vec<ResultRow>, DataLoadError> {
        self.tables
            .get(season)
            .map(|(_, results)| results.clone())
            .ok_or_else(|| Self::missing(TableKind::Results, season))
    }
}
