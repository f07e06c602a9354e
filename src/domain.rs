//! Games, as read from the odds and results sources and as joined.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

use crate::odds::{round2, AmericanOdds};
use crate::season::Season;

/// How a game was decided.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Ending {
    #[default]
    #[strum(serialize = "RT")]
    Regulation,

    #[strum(serialize = "OT")]
    Overtime,

    #[strum(serialize = "SO")]
    Shootout,
}

/// What to predict when the odds make the game a coin toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TiePolicy {
    #[default]
    Visitor,
    Home,

    /// Leave the game out of the accuracy count altogether.
    Exclude,
}

/// Joins the odds and results of a game: the date followed by the home team's code. Keys order as
/// their string form does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameKey {
    pub date: NaiveDate,
    pub home: String,
}
impl GameKey {
    pub fn new(date: NaiveDate, home: impl Into<String>) -> Self {
        Self {
            date,
            home: home.into(),
        }
    }
}

impl Display for GameKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.date.format("%Y-%m-%d"), self.home)
    }
}

/// One team's line in the odds table.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsSide {
    /// Source line number, for error reporting.
    pub line: usize,
    pub team: String,
    pub final_score: u16,
    pub close: AmericanOdds,
}

/// A game from the odds table, with the two rows that describe it assigned to their roles.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsGame {
    pub date: NaiveDate,
    pub home: OddsSide,
    pub visitor: OddsSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedGame {
    pub key: GameKey,
    pub home: String,
    pub visitor: String,

    /// Margin-free home win probability in percent, rounded to two decimal places.
    pub home_win_prob: f64,
    pub victor: String,
    pub ending: Ending,
    pub season: Season,
}
impl JoinedGame {
    pub fn visitor_win_prob(&self) -> f64 {
        round2(100.0 - self.home_win_prob)
    }

    /// The team the odds favour, or `None` if the odds are even and the policy excludes such games.
    pub fn predicted_victor(&self, tie_policy: TiePolicy) -> Option<&str> {
        match self.home_win_prob.total_cmp(&self.visitor_win_prob()) {
            Ordering::Greater => Some(self.home.as_str()),
            Ordering::Less => Some(self.visitor.as_str()),
            Ordering::Equal => match tie_policy {
                TiePolicy::Visitor => Some(self.visitor.as_str()),
                TiePolicy::Home => Some(self.home.as_str()),
                TiePolicy::Exclude => None,
            },
        }
    }

    pub fn is_correct(&self, tie_policy: TiePolicy) -> Option<bool> {
        self.predicted_victor(tie_policy)
            .map(|predicted| predicted == self.victor)
    }

    /// Whether either side's probability lies at least `band` points away from an even game.
    pub fn is_lopsided(&self, band: f64) -> bool {
        (self.home_win_prob - 50.0).abs() >= band
    }
}
