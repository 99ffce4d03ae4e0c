use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// AnimeRecord – one normalized row of the export
// ---------------------------------------------------------------------------

/// A single anime entry after parsing and coercion.
///
/// Numeric fields use `0.0` for "missing". Consumers that need real scores
/// filter on `rating > 0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeRecord {
    pub name: String,
    /// Year taken from the air-date column, defaulted to 2000.
    pub year: i32,
    pub rating: f64,
    /// Number of users who rated the title.
    pub rated_by: f64,
    pub episodes: f64,
    /// Raw genre tokens; may still contain noise (see [`super::taxonomy`]).
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    /// Columns the pipeline does not interpret, keyed by header name.
    pub extra: BTreeMap<String, String>,
}

impl AnimeRecord {
    /// Whether the record carries a usable score.
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }

    /// Record with just the core fields set; the list fields start empty.
    pub fn named(name: &str, year: i32, rating: f64) -> Self {
        AnimeRecord {
            name: name.to_string(),
            year,
            rating,
            rated_by: 0.0,
            episodes: 0.0,
            genres: Vec::new(),
            studios: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_genres(mut self, genres: &[&str]) -> Self {
        self.genres = genres.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn with_studios(mut self, studios: &[&str]) -> Self {
        self.studios = studios.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_rated_by(mut self, rated_by: f64) -> Self {
        self.rated_by = rated_by;
        self
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// All records from the most recent successful load, in source order.
///
/// Never mutated after construction; a reload builds a new `Dataset` and
/// swaps it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<AnimeRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<AnimeRecord>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[AnimeRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
