//! Ingestion, filtering and aggregation of anime metadata exports.
//!
//! ```text
//!  source ─▶ parser ─▶ normalize ─▶ Dataset ─▶ filter ─▶ stats ─▶ renderer
//! ```
//!
//! [`state::AppState`] owns the loaded [`data::model::Dataset`] and is the
//! only thing a caller needs: `load_dataset` to (re)load, `filter` /
//! `set_selection` to narrow, `dashboard` to get every aggregated view.

pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod stats;

pub use config::Config;
pub use data::filter::{FilterSelection, FilteredView};
pub use data::model::{AnimeRecord, Dataset};
pub use error::{FieldFallback, LoadError, SkipReason};
pub use state::{AppState, Dashboard};
