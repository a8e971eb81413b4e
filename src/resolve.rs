use std::time::Instant;

use polars::prelude::*;
use rustc_hash::FxHashMap as HashMap;
use tracing::{debug, info, warn};

use crate::error::CrewError;
use crate::merge::FilmCrew;

/// Looks up the display name of a person id.
pub trait NameSource {
    fn lookup(&self, nconst: &str) -> Option<String>;
}

impl<S: NameSource + ?Sized> NameSource for &S {
    fn lookup(&self, nconst: &str) -> Option<String> {
        (**self).lookup(nconst)
    }
}

/// `nconst -> primaryName` over the names table. The first row wins on
/// duplicate ids.
pub struct NameIndex<'a> {
    by_id: HashMap<&'a str, &'a str>,
}

impl<'a> NameIndex<'a> {
    pub fn new(names: &'a DataFrame) -> Result<Self, PolarsError> {
        let start = Instant::now();
        let mut by_id: HashMap<&str, &str> = HashMap::default();
        for (nconst, name) in names
            .column("nconst")?
            .str()?
            .into_iter()
            .zip(names.column("primaryName")?.str()?)
        {
            if let (Some(nconst), Some(name)) = (nconst, name) {
                by_id.entry(nconst).or_insert(name);
            }
        }
        debug!(people = by_id.len(), elapsed = ?start.elapsed(), "indexed names");
        Ok(NameIndex { by_id })
    }
}

impl NameSource for NameIndex<'_> {
    fn lookup(&self, nconst: &str) -> Option<String> {
        self.by_id.get(nconst).map(|name| name.to_string())
    }
}

/// Memoized names for one resolution pass.
#[derive(Debug, Default)]
pub struct NameCache {
    names: HashMap<String, String>,
}

impl NameCache {
    /// Returns the cached name, computing and storing it on the first request.
    /// `f` is not called on a hit, and nothing is stored if it fails.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        nconst: &str,
        f: impl FnOnce() -> Result<String, E>,
    ) -> Result<&str, E> {
        if !self.names.contains_key(nconst) {
            let name = f()?;
            self.names.insert(nconst.to_string(), name);
        }
        Ok(&self.names[nconst])
    }

    pub fn get(&self, nconst: &str) -> Option<&str> {
        self.names.get(nconst).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What to do with a person id the names table does not know.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissingName {
    /// Abort the run.
    #[default]
    Fail,
    /// Use this text as the name and keep going.
    Placeholder(String),
}

pub struct Resolver<S> {
    source: S,
    cache: NameCache,
    missing: MissingName,
}

impl<S: NameSource> Resolver<S> {
    pub fn new(source: S, missing: MissingName) -> Self {
        Resolver {
            source,
            cache: NameCache::default(),
            missing,
        }
    }

    /// Replaces every person id of `film` with a name.
    pub fn resolve(&mut self, film: &FilmCrew<String>) -> Result<FilmCrew<String>, CrewError> {
        let Resolver {
            source,
            cache,
            missing,
        } = self;
        film.try_map(|nconst| -> Result<String, CrewError> {
            let name = cache.get_or_try_insert_with(nconst, || {
                if let Some(name) = source.lookup(nconst) {
                    return Ok(name);
                }
                match missing {
                    MissingName::Fail => Err(CrewError::UnknownPerson {
                        nconst: nconst.clone(),
                        film: film.tconst.clone(),
                    }),
                    MissingName::Placeholder(text) => {
                        warn!(nconst = %nconst, film = %film.tconst, "no name found, using placeholder");
                        Ok(text.clone())
                    }
                }
            })?;
            Ok(name.to_string())
        })
    }

    pub fn resolve_all(
        &mut self,
        films: &[FilmCrew<String>],
    ) -> Result<Vec<FilmCrew<String>>, CrewError> {
        let start = Instant::now();
        let resolved = films
            .iter()
            .map(|film| self.resolve(film))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            films = resolved.len(),
            people = self.cache.len(),
            elapsed = ?start.elapsed(),
            "resolved names"
        );
        Ok(resolved)
    }

    pub fn cache(&self) -> &NameCache {
        &self.cache
    }
}
