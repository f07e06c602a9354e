//! File utilities: JSON-encoded configuration and the per-season file naming convention.

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::from_reader;

use crate::season::Season;

/// Placeholder substituted with the season label in file name patterns.
pub const SEASON_PLACEHOLDER: &str = "{season}";

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, io::Error> {
    let file = File::open(path)?;
    Ok(from_reader(BufReader::new(file))?)
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, io::Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, io::Error> {
        read_json(path)
    }
}

/// Resolves the file for `season` in `dir`, given a name `pattern` such as
/// `"nhl odds {season}.csv"`.
pub fn season_path(dir: impl AsRef<Path>, pattern: &str, season: &Season) -> PathBuf {
    dir.as_ref().join(pattern.replace(SEASON_PLACEHOLDER, season.label()))
}
