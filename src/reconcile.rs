//! Joins a season's odds with its results.
//!
//! Both tables are keyed by date and normalised home team code, sorted by key, and merged. Games
//! present in only one of the tables are dropped.

use std::cmp::Ordering;

use thiserror::Error;
use tracing::{debug, warn};

use crate::data::{SeasonSource, TableKind};
use crate::domain::{Ending, GameKey, JoinedGame};
use crate::odds::{implied_probabilities, round2};
use crate::season::{Season, SeasonError};
use crate::teams::TeamDirectory;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
#[error("season {season}: no games matched between odds and results")]
pub struct EmptyJoin {
    pub season: Season,
}

trait Keyed {
    fn key(&self) -> &GameKey;
    fn line(&self) -> usize;
}

/// A game from the odds table, with its teams normalised and its outcome priced.
#[derive(Debug)]
struct PricedGame<'a> {
    key: GameKey,
    line: usize,
    home: &'a str,
    visitor: &'a str,
    home_win_prob: f64,
    victor: &'a str,
}
impl Keyed for PricedGame<'_> {
    fn key(&self) -> &GameKey {
        &self.key
    }

    fn line(&self) -> usize {
        self.line
    }
}

#[derive(Debug)]
struct Outcome {
    key: GameKey,
    line: usize,
    ending: Ending,
}
impl Keyed for Outcome {
    fn key(&self) -> &GameKey {
        &self.key
    }

    fn line(&self) -> usize {
        self.line
    }
}

/// Sorts by key, dropping every row whose key repeats, whichever order the rows came in.
fn sort_unique<T: Keyed>(items: &mut Vec<T>, table: TableKind) {
    items.sort_by(|a, b| a.key().cmp(b.key()));
    let mut unique = Vec::with_capacity(items.len());
    let mut rows = std::mem::take(items).into_iter().peekable();
    while let Some(row) = rows.next() {
        let mut lines = vec![];
        while let Some(repeat) = rows.next_if(|next| next.key() == row.key()) {
            lines.push(repeat.line());
        }
        if lines.is_empty() {
            unique.push(row);
        } else {
            lines.push(row.line());
            lines.sort_unstable();
            warn!(
                "{table} table lines {lines:?} all describe game {}, ignoring them",
                row.key()
            );
        }
    }
    *items = unique;
}

/// Loads the odds and results of `season` and joins them on [`GameKey`]. The joined games are
/// ordered by key.
pub fn season_data<S: SeasonSource + ?Sized>(
    source: &S,
    directory: &TeamDirectory,
    season: &Season,
) -> Result<Vec<JoinedGame>, SeasonError> {
    let games = source.games(season)?;
    let results = source.results(season)?;
    let normaliser = directory.for_season(season);

    let mut priced = Vec::with_capacity(games.len());
    let mut booksum = 0.0;
    for game in games {
        let home = normaliser.code(&game.home.team);
        let visitor = normaliser.code(&game.visitor.team);
        let victor = match game.home.final_score.cmp(&game.visitor.final_score) {
            Ordering::Greater => home,
            Ordering::Less => visitor,
            Ordering::Equal => {
                warn!(
                    "odds table lines {} and {}: {visitor} at {home} on {} finished level at {}, \
                     skipping",
                    game.visitor.line, game.home.line, game.date, game.home.final_score
                );
                continue;
            }
        };
        let implied = implied_probabilities(game.home.close, game.visitor.close);
        booksum += implied.booksum;
        priced.push(PricedGame {
            key: GameKey::new(game.date, home),
            line: game.home.line,
            home,
            visitor,
            home_win_prob: round2(implied.home),
            victor,
        });
    }
    if !priced.is_empty() {
        debug!(
            "{season}: {} priced games, mean overround {:.3}%",
            priced.len(),
            booksum / priced.len() as f64 - 100.0
        );
    }

    let mut outcomes: Vec<_> = results
        .into_iter()
        .map(|row| Outcome {
            key: GameKey::new(row.date, normaliser.code(&row.home)),
            line: row.line,
            ending: row.ending,
        })
        .collect();

    sort_unique(&mut priced, TableKind::Odds);
    sort_unique(&mut outcomes, TableKind::Results);

    let mut joined = Vec::with_capacity(priced.len().min(outcomes.len()));
    let (mut odds_only, mut results_only) = (0, 0);
    let mut outcomes = outcomes.into_iter().peekable();
    for game in priced {
        while outcomes.next_if(|outcome| outcome.key < game.key).is_some() {
            results_only += 1;
        }
        match outcomes.next_if(|outcome| outcome.key == game.key) {
            Some(outcome) => joined.push(JoinedGame {
                key: game.key,
                home: game.home.into(),
                visitor: game.visitor.into(),
                home_win_prob: game.home_win_prob,
                victor: game.victor.into(),
                ending: outcome.ending,
                season: season.clone(),
            }),
            None => odds_only += 1,
        }
    }
    results_only += outcomes.count();
    debug!(
        "{season}: joined {} games; {odds_only} only in odds, {results_only} only in results",
        joined.len()
    );

    if joined.is_empty() {
        return Err(EmptyJoin {
            season: season.clone(),
        }
        .into());
    }
    Ok(joined)
}
