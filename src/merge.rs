use std::time::Instant;

use memchr::memchr_iter;
use polars::prelude::*;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use tracing::{debug, info};

use crate::data::ImdbData;

/// IMDB's "no value" marker.
pub const NULL_MARKER: &str = "\\N";

/// How a director/writer field holding only [`NULL_MARKER`] is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullMarker {
    /// The field means "nobody": an empty sequence.
    #[default]
    Empty,
    /// The marker is kept as a one-element sequence and looked up like an id.
    Keep,
}

/// One film with its directors, writers and actors, in source order.
/// `T` is a person id after merging and a display name after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmCrew<T> {
    pub tconst: String,
    pub directors: Vec<T>,
    pub writers: Vec<T>,
    pub actors: Vec<T>,
}

impl<T> FilmCrew<T> {
    /// Maps every person in order, keeping sequence lengths.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<U, E>,
    ) -> Result<FilmCrew<U>, E> {
        let mut each = |people: &[T]| people.iter().map(&mut f).collect::<Result<Vec<_>, E>>();
        Ok(FilmCrew {
            tconst: self.tconst.clone(),
            directors: each(&self.directors)?,
            writers: each(&self.writers)?,
            actors: each(&self.actors)?,
        })
    }

    pub fn people(&self) -> impl Iterator<Item = &T> {
        self.directors
            .iter()
            .chain(&self.writers)
            .chain(&self.actors)
    }
}

/// Splits a comma-joined id list. An empty string is one empty id.
pub fn split_ids(field: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut start = 0;
    for end in memchr_iter(b',', field.as_bytes()) {
        ids.push(field[start..end].to_string());
        start = end + 1;
    }
    ids.push(field[start..].to_string());
    ids
}

fn split_field(field: Option<&str>, null_marker: NullMarker) -> Vec<String> {
    match (field, null_marker) {
        (None, _) => Vec::new(),
        (Some(NULL_MARKER), NullMarker::Empty) => Vec::new(),
        (Some(field), _) => split_ids(field),
    }
}

/// Joins each allow-listed crew row with the actors credited on the same film.
/// Films without crew or without actors are dropped. Output follows crew order.
pub fn merge_crew(
    db: &ImdbData,
    null_marker: NullMarker,
) -> Result<Vec<FilmCrew<String>>, PolarsError> {
    let start = Instant::now();
    let principals = &db.principals;
    let crew = &db.crew;

    // tconst -> comma-joined actor nconsts, in principals order
    let mut cast: HashMap<&str, String> = HashMap::default();
    let mut actor_rows = 0;
    for ((tconst, nconst), category) in principals
        .column("tconst")?
        .str()?
        .into_iter()
        .zip(principals.column("nconst")?.str()?)
        .zip(principals.column("category")?.str()?)
    {
        if let (Some(tconst), Some(nconst), Some("actor")) = (tconst, nconst, category) {
            actor_rows += 1;
            cast.entry(tconst)
                .and_modify(|ids| {
                    ids.push(',');
                    ids.push_str(nconst);
                })
                .or_insert_with(|| nconst.to_string());
        }
    }
    debug!(actor_rows, films = cast.len(), "aggregated actors");

    let mut films = Vec::new();
    let mut matched: HashSet<&str> = HashSet::default();
    let mut without_cast = 0;
    for ((tconst, directors), writers) in crew
        .column("tconst")?
        .str()?
        .into_iter()
        .zip(crew.column("directors")?.str()?)
        .zip(crew.column("writers")?.str()?)
    {
        let Some(tconst) = tconst else { continue };
        let Some(actors) = cast.get(tconst) else {
            without_cast += 1;
            continue;
        };
        matched.insert(tconst);
        films.push(FilmCrew {
            tconst: tconst.to_string(),
            directors: split_field(directors, null_marker),
            writers: split_field(writers, null_marker),
            actors: split_ids(actors),
        });
    }

    debug!(
        without_cast,
        without_crew = cast.len() - matched.len(),
        "films dropped by join"
    );
    info!(films = films.len(), elapsed = ?start.elapsed(), "merged crew");

    Ok(films)
}
