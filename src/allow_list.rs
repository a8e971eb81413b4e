use std::fs;
use std::path::Path;

use polars::prelude::*;
use regex::Regex;
use rustc_hash::FxHashSet as HashSet;

use crate::error::CrewError;

// Films of interest.
#[rustfmt::skip]
pub const MOVIE_IDS: [&str; 98] = [
    "tt0050083", "tt0062622", "tt0066921", "tt0026778", "tt0044081", "tt0042192", "tt0074119",
    "tt0069704", "tt0075686", "tt0078788", "tt0052618", "tt0083658", "tt0061418", "tt0029947",
    "tt0064115", "tt0068327", "tt0034583", "tt0071315", "tt0033467", "tt0021749", "tt0097216",
    "tt0036775", "tt0057012", "tt0023969", "tt0064276", "tt0109830", "tt0031381", "tt0099685",
    "tt0044706", "tt0061811", "tt0025316", "tt0038650", "tt0073195", "tt0024216", "tt0056172",
    "tt0066026", "tt0064665", "tt0027977", "tt0031679", "tt0073440", "tt0074958", "tt0053125",
    "tt0047296", "tt0073486", "tt0091763", "tt0054215", "tt0110912", "tt0081398", "tt0082971",
    "tt0047396", "tt0075148", "tt0120815", "tt0108052", "tt0046303", "tt0045152", "tt0029583",
    "tt0053291", "tt0084707", "tt0054331", "tt0076759", "tt0034240", "tt0018455", "tt0043014",
    "tt0028333", "tt0075314", "tt0043265", "tt0053604", "tt0036868", "tt0050212", "tt0077416",
    "tt0067116", "tt0017925", "tt0068646", "tt0071562", "tt0015864", "tt0061722", "tt0032551",
    "tt0067328", "tt0120737", "tt0033870", "tt0032904", "tt0049730", "tt0111161", "tt0102926",
    "tt0167404", "tt0059742", "tt0040897", "tt0065214", "tt0032138", "tt0120338", "tt0056592",
    "tt0084805", "tt0114709", "tt0105695", "tt0052357", "tt0055614", "tt0061184", "tt0035575",
];

/// The set of film ids a run is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    ids: Vec<String>,
    set: HashSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new(MOVIE_IDS)
    }
}

impl AllowList {
    /// Duplicates are kept once, first occurrence wins the position.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = AllowList {
            ids: Vec::new(),
            set: HashSet::default(),
        };
        for id in ids {
            let id = id.into();
            if list.set.insert(id.clone()) {
                list.ids.push(id);
            }
        }
        list
    }

    /// Reads one film id per line. Blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self, CrewError> {
        let text = fs::read_to_string(path).map_err(|source| CrewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|(line, reason)| CrewError::AllowList {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }

    fn parse(text: &str) -> Result<Self, (usize, String)> {
        let tconst = Regex::new(r"^tt\d+$").map_err(|e| (0, e.to_string()))?;
        let mut ids = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = match raw.split_once('#') {
                Some((before, _)) => before,
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            if !tconst.is_match(line) {
                return Err((i + 1, format!("'{line}' is not a film id")));
            }
            ids.push(line);
        }
        Ok(Self::new(ids))
    }

    pub fn contains(&self, tconst: &str) -> bool {
        self.set.contains(tconst)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// The ids as a string series, for `is_in` filters.
    pub fn to_series(&self) -> Series {
        Series::new("tconst".into(), self.ids.as_slice())
    }
}
