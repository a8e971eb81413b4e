pub mod allow_list;
pub mod config;
pub mod data;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod writer;

pub use allow_list::AllowList;
pub use config::Config;
pub use error::CrewError;
pub use merge::{FilmCrew, NullMarker};
pub use pipeline::{RunSummary, run};
pub use resolve::MissingName;
