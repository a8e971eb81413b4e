use std::io::Write;
use std::path::Path;
use std::time::Instant;

use polars::prelude::*;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::CrewError;
use crate::merge::FilmCrew;

const HEADER: &str = ",tconst,directors,writers,actors\n";

/// Renders names as a list literal: `['A', 'B']`. A name holding a single
/// quote and no double quote is wrapped in double quotes. Backslashes and
/// control characters are escaped (`\\`, `\n`, `\x07`, `\x85`).
pub fn list_literal<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::from("[");
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let name = name.as_ref();
        let quote = if name.contains('\'') && !name.contains('"') {
            '"'
        } else {
            '\''
        };
        out.push(quote);
        for c in name.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                c => out.push(c),
            }
        }
        out.push(quote);
    }
    out.push(']');
    out
}

/// One row per film, the name lists rendered with [`list_literal`].
pub fn to_frame(films: &[FilmCrew<String>]) -> PolarsResult<DataFrame> {
    let directors: Vec<String> = films.iter().map(|f| list_literal(&f.directors)).collect();
    let writers: Vec<String> = films.iter().map(|f| list_literal(&f.writers)).collect();
    let actors: Vec<String> = films.iter().map(|f| list_literal(&f.actors)).collect();
    DataFrame::new(vec![
        Column::new(
            "tconst".into(),
            films.iter().map(|f| f.tconst.as_str()).collect::<Vec<_>>(),
        ),
        Column::new("directors".into(), directors),
        Column::new("writers".into(), writers),
        Column::new("actors".into(), actors),
    ])
}

/// Writes the films as CSV with a leading row index, replacing `path`.
/// Rows go to a temporary file beside `path` that is renamed over it once
/// complete, so a failed write leaves the destination as it was.
/// Returns the number of rows written.
pub fn write_csv(films: &[FilmCrew<String>], path: &Path) -> Result<usize, CrewError> {
    let start = Instant::now();
    let mut df = to_frame(films)?.with_row_index("index".into(), None)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|source| CrewError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.write_all(HEADER.as_bytes())
        .map_err(|source| CrewError::Output {
            path: path.to_path_buf(),
            source,
        })?;
    CsvWriter::new(tmp.as_file_mut())
        .include_header(false)
        .finish(&mut df)
        .map_err(|source| CrewError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    tmp.persist(path).map_err(|e| CrewError::Output {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    info!(rows = df.height(), path = %path.display(), elapsed = ?start.elapsed(), "wrote crew");
    Ok(df.height())
}
