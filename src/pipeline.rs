use std::time::Instant;

use tracing::info;

use crate::config::Config;
use crate::data::ImdbData;
use crate::error::CrewError;
use crate::merge::merge_crew;
use crate::resolve::{NameIndex, Resolver};
use crate::writer::write_csv;

/// Row counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub movies: usize,
    pub crew_rows: usize,
    pub principal_rows: usize,
    pub films: usize,
    pub people: usize,
    pub rows_written: usize,
}

/// Load, merge, resolve and write. The output file is only touched once
/// every name has been resolved.
pub fn run(config: &Config) -> Result<RunSummary, CrewError> {
    let start = Instant::now();

    let db = ImdbData::load(&config.sources, &config.movies)?;
    let films = merge_crew(&db, config.null_marker)?;

    let mut resolver = Resolver::new(NameIndex::new(&db.names)?, config.missing_name.clone());
    let resolved = resolver.resolve_all(&films)?;

    let rows_written = write_csv(&resolved, &config.output)?;

    let summary = RunSummary {
        movies: config.movies.len(),
        crew_rows: db.crew.height(),
        principal_rows: db.principals.height(),
        films: films.len(),
        people: resolver.cache().len(),
        rows_written,
    };
    info!(?summary, elapsed = ?start.elapsed(), "done");
    Ok(summary)
}
