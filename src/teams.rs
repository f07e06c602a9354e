//! Resolution of free-text team names to canonical team codes.
//!
//! Names are first looked up exactly, after reduction to a canonical form (lower case,
//! alphanumerics only). Names that are not in the table fall back to approximate matching, which
//! always yields some code but is logged, since a wrong match silently misattributes games.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::warn;

use crate::config::ConfigurationError;
use crate::file::ReadJsonFile;
use crate::season::Season;
use crate::similarity::gestalt_ratio;


/// The on-disk form of the reference table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFile {
    /// `[alias, code]` pairs, in lookup order.
    pub aliases: Vec<(String, String)>,

    /// Entries that take precedence over `aliases` for a given season, for names whose code changed
    /// when a franchise relocated or was renamed.
    #[serde(default)]
    pub seasons: BTreeMap<String, Vec<(String, String)>>,
}

/// Reduces a name to the form used for lookups.
pub fn canonicalise(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug)]
struct Entry {
    alias: String,
    canonical: String,
    code: String,
}

#[derive(Debug, Default)]
struct AliasTable {
    entries: Vec<Entry>,
    index: FxHashMap<String, usize>,
}
impl AliasTable {
    fn build<A, C>(pairs: impl IntoIterator<Item = (A, C)>) -> Result<Self, ConfigurationError>
    where
        A: Into<String>,
        C: Into<String>,
    {
        let mut table = Self::default();
        for (alias, code) in pairs {
            let (alias, code) = (alias.into(), code.into());
            let canonical = canonicalise(&alias);
            if canonical.is_empty() {
                return Err(ConfigurationError::BlankAlias { alias });
            }
            if let Some(&existing) = table.index.get(&canonical) {
                let existing = &table.entries[existing];
                if existing.code == code {
                    continue;
                }
                return Err(ConfigurationError::ConflictingAlias {
                    alias,
                    first: existing.code.clone(),
                    second: code,
                });
            }
            table.index.insert(canonical.clone(), table.entries.len());
            table.entries.push(Entry {
                alias,
                canonical,
                code,
            });
        }
        Ok(table)
    }

    fn exact(&self, canonical: &str) -> Option<&Entry> {
        self.index.get(canonical).map(|&index| &self.entries[index])
    }
}

/// The immutable reference table of team aliases. Load once and pass by reference to wherever names
/// need resolving.
#[derive(Debug)]
pub struct TeamDirectory {
    global: AliasTable,
    seasons: FxHashMap<Season, AliasTable>,
}
impl TeamDirectory {
    pub fn new<A, C>(aliases: impl IntoIterator<Item = (A, C)>) -> Result<Self, ConfigurationError>
    where
        A: Into<String>,
        C: Into<String>,
    {
        let global = AliasTable::build(aliases)?;
        if global.entries.is_empty() {
            return Err(ConfigurationError::EmptyReferenceTable);
        }
        Ok(Self {
            global,
            seasons: FxHashMap::default(),
        })
    }

    pub fn with_season<A, C>(
        mut self,
        season: Season,
        aliases: impl IntoIterator<Item = (A, C)>,
    ) -> Result<Self, ConfigurationError>
    where
        A: Into<String>,
        C: Into<String>,
    {
        self.seasons.insert(season, AliasTable::build(aliases)?);
        Ok(self)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let file = TeamFile::read_json_file(path).map_err(|source| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::try_from(file)
    }

    pub fn len(&self) -> usize {
        self.global.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global.entries.is_empty()
    }

    /// A normaliser that only consults the global table.
    pub fn normaliser(&self) -> Normaliser<'_> {
        Normaliser {
            global: &self.global,
            scoped: None,
        }
    }

    /// A normaliser that prefers the overrides of `season`, if there are any.
    pub fn for_season(&self, season: &Season) -> Normaliser<'_> {
        Normaliser {
            global: &self.global,
            scoped: self.seasons.get(season),
        }
    }
}

impl TryFrom<TeamFile> for TeamDirectory {
    type Error = ConfigurationError;

    fn try_from(file: TeamFile) -> Result<Self, Self::Error> {
        let mut directory = Self::new(file.aliases)?;
        for (label, aliases) in file.seasons {
            let season: Season = label.parse()?;
            directory = directory.with_season(season, aliases)?;
        }
        Ok(directory)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Method<'a> {
    Exact,
    Approximate { alias: &'a str, score: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub code: &'a str,
    pub method: Method<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct Normaliser<'a> {
    global: &'a AliasTable,
    scoped: Option<&'a AliasTable>,
}
impl<'a> Normaliser<'a> {
    /// The code for `name`. Never fails; unrecognised names resolve to their closest alias.
    pub fn code(&self, name: &str) -> &'a str {
        let resolution = self.resolve(name);
        if let Method::Approximate { alias, score } = resolution.method {
            warn!(
                "no alias for '{name}', approximated by '{alias}' ({score:.3}) -> {}",
                resolution.code
            );
        }
        resolution.code
    }

    pub fn resolve(&self, name: &str) -> Resolution<'a> {
        let canonical = canonicalise(name);
        if let Some(entry) = self.exact(&canonical) {
            return Resolution {
                code: &entry.code,
                method: Method::Exact,
            };
        }

        let (best, score) = self.closest(&canonical);
        let code = self
            .scoped
            .and_then(|table| table.exact(&best.canonical))
            .map_or(best.code.as_str(), |entry| entry.code.as_str());
        Resolution {
            code,
            method: Method::Approximate {
                alias: &best.alias,
                score,
            },
        }
    }

    fn exact(&self, canonical: &str) -> Option<&'a Entry> {
        self.scoped
            .and_then(|table| table.exact(canonical))
            .or_else(|| self.global.exact(canonical))
    }

    /// The highest-scoring alias by gestalt ratio. Ties go to the higher Jaro-Winkler similarity,
    /// then to the earlier entry (season overrides before the global table).
    fn closest(&self, canonical: &str) -> (&'a Entry, f64) {
        let scoped = self.scoped.map(|table| table.entries.as_slice()).unwrap_or_default();
        let mut candidates = scoped.iter().chain(self.global.entries.iter());

        // the global table is never empty
        let first = &self.global.entries[0];
        let mut best = candidates.next().unwrap_or(first);
        let mut best_score = (
            gestalt_ratio(canonical, &best.canonical),
            jaro_winkler(canonical, &best.canonical),
        );
        for candidate in candidates {
            let score = (
                gestalt_ratio(canonical, &candidate.canonical),
                jaro_winkler(canonical, &candidate.canonical),
            );
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        (best, best_score.0)
    }
}
