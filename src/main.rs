use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crewmap::config::{CREW_FILE, NAMES_FILE, OUTPUT_FILE, PRINCIPALS_FILE};
use crewmap::data::SourcePaths;
use crewmap::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crewmap")]
#[command(about = "Resolve the directors, writers and actors of selected IMDB films to names")]
struct Args {
    /// title.crew dump (tsv, optionally gzipped)
    #[arg(long, default_value = CREW_FILE)]
    crew: PathBuf,

    /// title.principals dump
    #[arg(long, default_value = PRINCIPALS_FILE)]
    principals: PathBuf,

    /// name.basics dump
    #[arg(long, default_value = NAMES_FILE)]
    names: PathBuf,

    #[arg(short, long, default_value = OUTPUT_FILE)]
    output: PathBuf,

    /// File with one film id per line; the built-in list is used otherwise
    #[arg(long)]
    allow_list: Option<PathBuf>,

    /// Look up `\N` director/writer fields as ids instead of treating them as empty
    #[arg(long)]
    keep_null_marker: bool,

    /// Name to use for unknown people instead of failing
    #[arg(long, value_name = "TEXT")]
    missing_name: Option<String>,

    /// More logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let movies = match &self.allow_list {
            Some(path) => AllowList::from_file(path)?,
            None => AllowList::default(),
        };
        Ok(Config {
            sources: SourcePaths {
                crew: self.crew,
                principals: self.principals,
                names: self.names,
            },
            output: self.output,
            movies,
            null_marker: if self.keep_null_marker {
                NullMarker::Keep
            } else {
                NullMarker::Empty
            },
            missing_name: match self.missing_name {
                Some(text) => MissingName::Placeholder(text),
                None => MissingName::Fail,
            },
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let config = args.into_config()?;
    let output = config.output.clone();
    let summary = run(&config).with_context(|| format!("failed to build {}", output.display()))?;

    println!(
        "{} of {} films written to {}",
        summary.rows_written,
        summary.movies,
        output.display()
    );
    Ok(())
}
