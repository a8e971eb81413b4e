use std::path::PathBuf;

use crate::allow_list::AllowList;
use crate::data::SourcePaths;
use crate::merge::NullMarker;
use crate::resolve::MissingName;

pub const CREW_FILE: &str = "title.crew.tsv.gz";
pub const PRINCIPALS_FILE: &str = "title.principals.tsv.gz";
pub const NAMES_FILE: &str = "name.basics.tsv.gz";
pub const OUTPUT_FILE: &str = "crew_info.csv";

/// Everything one run needs. The default reads the IMDB dumps from the
/// working directory and writes `crew_info.csv` next to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sources: SourcePaths,
    pub output: PathBuf,
    pub movies: AllowList,
    pub null_marker: NullMarker,
    pub missing_name: MissingName,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sources: SourcePaths {
                crew: CREW_FILE.into(),
                principals: PRINCIPALS_FILE.into(),
                names: NAMES_FILE.into(),
            },
            output: OUTPUT_FILE.into(),
            movies: AllowList::default(),
            null_marker: NullMarker::default(),
            missing_name: MissingName::default(),
        }
    }
}
