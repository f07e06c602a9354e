//! Measures how well closing moneyline odds predict the outcome of hockey games.
//! Joins a season of betting odds with a season of results, derives the odds-implied favourite of
//! each game and reports how often the favourite won, split by regulation, overtime and shootout
//! endings.

pub mod accuracy;
pub mod batch;
pub mod config;
pub mod csv;
pub mod data;
pub mod domain;
pub mod file;
pub mod odds;
pub mod print;
pub mod reconcile;
pub mod season;
pub mod similarity;
pub mod teams;
pub mod timed;

#[cfg(test)]
pub(crate) mod testing;
