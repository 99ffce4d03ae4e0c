use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::{mode, RatingSum};
use crate::config::YearWindow;
use crate::data::model::{AnimeRecord, Dataset};
use crate::data::taxonomy::{valid_genres, valid_studios};

// ---------------------------------------------------------------------------
// Mode / mean metrics
// ---------------------------------------------------------------------------

/// Most frequent value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode {
    pub label: String,
    pub count: usize,
}

impl Mode {
    /// Placeholder for an empty input.
    pub fn none() -> Self {
        Mode {
            label: "-".to_string(),
            count: 0,
        }
    }

    fn from_tally<K: ToString>(tally: &IndexMap<K, usize>) -> Self {
        mode(tally)
            .map(|(key, count)| Mode {
                label: key.to_string(),
                count,
            })
            .unwrap_or_else(Mode::none)
    }
}

/// Year with the most titles.
pub fn mode_by_year(view: &[&AnimeRecord]) -> Mode {
    let mut tally: IndexMap<_, usize> = IndexMap::new();
    for rec in view {
        *tally.entry(rec.year).or_default() += 1;
    }
    Mode::from_tally(&tally)
}

/// Genre with the most titles, counting only real genre tokens.
pub fn mode_by_genre(view: &[&AnimeRecord]) -> Mode {
    let mut tally: IndexMap<_, usize> = IndexMap::new();
    for rec in view {
        for genre in valid_genres(&rec.genres) {
            *tally.entry(genre).or_default() += 1;
        }
    }
    Mode::from_tally(&tally)
}

/// Studio with the most titles, counting only real studio tokens.
pub fn mode_by_studio(view: &[&AnimeRecord]) -> Mode {
    let mut tally: IndexMap<_, usize> = IndexMap::new();
    for rec in view {
        for studio in valid_studios(&rec.studios) {
            *tally.entry(studio).or_default() += 1;
        }
    }
    Mode::from_tally(&tally)
}

/// Mean rating over rated titles; 0 when nothing is rated.
pub fn mean_rating(view: &[&AnimeRecord]) -> f64 {
    let mut sum = RatingSum::default();
    for rec in view.iter().filter(|r| r.is_rated()) {
        sum.add(rec.rating);
    }
    sum.mean()
}

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub top_year: Mode,
    pub mean_rating: f64,
    /// `mean_rating` with two decimals, or `-` for an empty view.
    pub mean_rating_label: String,
    pub top_genre: Mode,
    pub top_studio: Mode,
}

pub fn summarize(view: &[&AnimeRecord]) -> MetricSummary {
    if view.is_empty() {
        return MetricSummary {
            top_year: Mode::none(),
            mean_rating: 0.0,
            mean_rating_label: "-".to_string(),
            top_genre: Mode::none(),
            top_studio: Mode::none(),
        };
    }

    let mean = mean_rating(view);
    MetricSummary {
        top_year: mode_by_year(view),
        mean_rating: mean,
        mean_rating_label: format!("{mean:.2}"),
        top_genre: mode_by_genre(view),
        top_studio: mode_by_studio(view),
    }
}

// ---------------------------------------------------------------------------
// Selection options
// ---------------------------------------------------------------------------

/// Sorted, deduplicated values for the three selection controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
}

/// Build the selection options from the full dataset.
pub fn filter_options(dataset: &Dataset, window: YearWindow) -> FilterOptions {
    let mut years = BTreeSet::new();
    let mut genres = BTreeSet::new();
    let mut studios = BTreeSet::new();

    for rec in dataset.records() {
        if window.contains(rec.year) {
            years.insert(rec.year);
        }
        genres.extend(valid_genres(&rec.genres).map(str::to_string));
        studios.extend(valid_studios(&rec.studios).map(str::to_string));
    }

    FilterOptions {
        years: years.into_iter().collect(),
        genres: genres.into_iter().collect(),
        studios: studios.into_iter().collect(),
    }
}
