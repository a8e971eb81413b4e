use std::io;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures that abort a run. Nothing is written once one of these is raised.
#[derive(Debug, Error)]
pub enum CrewError {
    #[error("cannot read '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("cannot parse table '{}': {source}", path.display())]
    Read { path: PathBuf, source: PolarsError },
    #[error("table '{}' has no column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("allow-list '{}' line {line}: {reason}", path.display())]
    AllowList {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("no name found for person '{nconst}' (film '{film}')")]
    UnknownPerson { nconst: String, film: String },
    #[error("cannot create '{}': {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[error("cannot write '{}': {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
    #[error("cannot write rows to '{}': {source}", path.display())]
    Write { path: PathBuf, source: PolarsError },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
