use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::read::MultiGzDecoder;
use polars::prelude::*;
use tracing::{debug, info};

use crate::allow_list::AllowList;
use crate::error::CrewError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// title.crew.tsv
//     tconst     text  -- film id
//     directors  text  -- comma-joined nconst list, or \N
//     writers    text  -- comma-joined nconst list, or \N
pub const CREW_COLUMNS: [&str; 3] = ["tconst", "directors", "writers"];

// title.principals.tsv
//     tconst      text
//     ordering    integer
//     nconst      text
//     category    text  -- actor, actress, director, writer, self, ...
//     job         text
//     characters  text
pub const PRINCIPALS_COLUMNS: [&str; 3] = ["tconst", "nconst", "category"];

// name.basics.tsv
//     nconst             text
//     primaryName        text
//     birthYear          integer
//     deathYear          integer
//     primaryProfession  text
//     knownForTitles     text
pub const NAMES_COLUMNS: [&str; 2] = ["nconst", "primaryName"];

/// Where the three source tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub crew: PathBuf,
    pub principals: PathBuf,
    pub names: PathBuf,
}

/// The three source tables, projected to the columns the pipeline reads.
/// `crew` and `principals` only hold allow-listed films.
pub struct ImdbData {
    pub crew: DataFrame,
    pub principals: DataFrame,
    pub names: DataFrame,
}

impl ImdbData {
    pub fn load(paths: &SourcePaths, movies: &AllowList) -> Result<Self, CrewError> {
        let start = Instant::now();

        let crew = read_tsv(&paths.crew, &CREW_COLUMNS)?;
        let principals = read_tsv(&paths.principals, &PRINCIPALS_COLUMNS)?;
        let names = read_tsv(&paths.names, &NAMES_COLUMNS)?;
        debug!(
            crew = crew.height(),
            principals = principals.height(),
            names = names.height(),
            "read source tables"
        );

        let crew = keep_movies(crew, movies)?;
        let principals = keep_movies(principals, movies)?;

        info!(
            crew = crew.height(),
            principals = principals.height(),
            names = names.height(),
            elapsed = ?start.elapsed(),
            "loaded tables"
        );

        Ok(ImdbData {
            crew,
            principals,
            names,
        })
    }
}

/// Reads a tab-separated table with a header row, every column as text.
/// Gzip input is detected by its magic bytes; every member of a
/// multi-member file is read.
pub fn read_tsv(path: &Path, columns: &[&str]) -> Result<DataFrame, CrewError> {
    let io_err = |source| CrewError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(io_err)?;
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut raw = Vec::new();
        MultiGzDecoder::new(bytes.as_slice())
            .read_to_end(&mut raw)
            .map_err(io_err)?;
        bytes = raw;
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_separator(b'\t').with_quote_char(None))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|source| CrewError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(missing) = columns
        .iter()
        .find(|c| df.get_column_index(c).is_none())
    {
        return Err(CrewError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    Ok(df.select(columns.iter().copied())?)
}

/// Keeps the rows whose `tconst` is allow-listed.
pub fn keep_movies(df: DataFrame, movies: &AllowList) -> PolarsResult<DataFrame> {
    df.lazy()
        .filter(col("tconst").is_in(lit(movies.to_series()).implode(), false))
        .collect()
}
