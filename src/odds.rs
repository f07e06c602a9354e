//! Conversion of American (moneyline) odds to win probabilities.
//!
//! Positive odds state the profit on a 100 stake (underdog); negative odds state the stake
//! needed to profit 100 (favourite). Probabilities here are expressed as percentages.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidOdds {
    #[error("zero is not a valid moneyline")]
    Zero,

    #[error("non-finite moneyline {0}")]
    NonFinite(f64),

    #[error("unparseable moneyline '{0}'")]
    Unparseable(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmericanOdds(f64);
impl AmericanOdds {
    pub fn new(value: f64) -> Result<Self, InvalidOdds> {
        if !value.is_finite() {
            Err(InvalidOdds::NonFinite(value))
        } else if value == 0.0 {
            Err(InvalidOdds::Zero)
        } else {
            Ok(Self(value))
        }
    }

    /// The probability implied by these odds alone, bookmaker margin included.
    pub fn raw_probability(&self) -> f64 {
        let odds = self.0;
        if odds > 0.0 {
            100.0 / (1.0 + odds / 100.0)
        } else {
            100.0 / (1.0 - 100.0 / odds)
        }
    }
}

impl FromStr for AmericanOdds {
    type Err = InvalidOdds;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidOdds::Unparseable(s.trim().to_owned()))?;
        Self::new(value)
    }
}

impl Display for AmericanOdds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0.0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A two-way market with the margin removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedProbabilities {
    pub home: f64,
    pub visitor: f64,

    /// Sum of the raw probabilities; `100` for a fair book.
    pub booksum: f64,
}
impl ImpliedProbabilities {
    pub fn overround(&self) -> f64 {
        self.booksum - 100.0
    }
}

/// Derives both sides' win probabilities, rescaled (multiplicatively) so that they sum to 100.
pub fn implied_probabilities(home: AmericanOdds, visitor: AmericanOdds) -> ImpliedProbabilities {
    let (raw_home, raw_visitor) = (home.raw_probability(), visitor.raw_probability());
    let booksum = raw_home + raw_visitor;
    let weight = 100.0 / booksum;
    ImpliedProbabilities {
        home: raw_home * weight,
        visitor: raw_visitor * weight,
        booksum,
    }
}

/// The home side's win probability, in `[0, 100]`, given both sides' closing moneylines.
pub fn win_probability(home_odds: f64, visitor_odds: f64) -> Result<f64, InvalidOdds> {
    let (home, visitor) = (AmericanOdds::new(home_odds)?, AmericanOdds::new(visitor_odds)?);
    Ok(implied_probabilities(home, visitor).home)
}

/// Rounds to two decimal places, for storage and display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
