//! Aggregations over a filtered view.
//!
//! Everything here is a pure function of `&[&AnimeRecord]` returning plain
//! serializable data. Grouping always happens in first-encountered order so
//! that ties in rankings and modes resolve the same way on every run.

use indexmap::IndexMap;
use serde::Serialize;

pub mod charts;
pub mod summary;
pub mod table;

pub use charts::{compute_charts, ChartSet};
pub use summary::{filter_options, summarize, FilterOptions, MetricSummary};
pub use table::{leaderboard_rows, LeaderboardRow};

/// Minimum rated titles before a studio is ranked.
pub const MIN_STUDIO_SUPPORT: usize = 3;
/// Minimum rated titles before a year appears in the trend.
pub const MIN_YEAR_SUPPORT: usize = 5;
/// Minimum titles before a genre appears in the volume ranking.
pub const MIN_GENRE_SUPPORT: usize = 5;
/// Minimum distinct years before a genre's evolution series is kept.
pub const MIN_SERIES_YEARS: usize = 3;

pub const TOP_STUDIOS: usize = 10;
pub const TOP_GENRES: usize = 15;
pub const EVOLUTION_GENRES: usize = 5;
pub const COMPARISON_GENRES: usize = 8;
pub const LEADERBOARD_SIZE: usize = 15;

// ---------------------------------------------------------------------------
// Chart – populated result or explicit "no data"
// ---------------------------------------------------------------------------

/// A chart dataset, or a marker telling the renderer to show a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Chart<T> {
    NoData,
    Ready(T),
}

impl<T> Chart<T> {
    /// `NoData` when `value` is empty by the given test.
    pub fn from_non_empty(value: T, is_empty: impl FnOnce(&T) -> bool) -> Self {
        if is_empty(&value) {
            Chart::NoData
        } else {
            Chart::Ready(value)
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Chart::Ready(v) => Some(v),
            Chart::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Chart::NoData)
    }
}

// ---------------------------------------------------------------------------
// Insertion-ordered tallies
// ---------------------------------------------------------------------------

/// Key with the highest count. On a tie the key seen first wins.
pub fn mode<K>(tally: &IndexMap<K, usize>) -> Option<(&K, usize)> {
    let mut best: Option<(&K, usize)> = None;
    for (key, &count) in tally {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best
}

/// Running sum and count of ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSum {
    pub total: f64,
    pub count: usize,
}

impl RatingSum {
    pub fn add(&mut self, rating: f64) {
        self.total += rating;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Axis range
// ---------------------------------------------------------------------------

/// Padding applied around the observed mean ratings.
const RANGE_PADDING: f64 = 0.3;

/// Suggested value-axis range for a rating series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// `[max(0, min - 0.3), min(10, max + 0.3)]` over `values`, or `None`
    /// when there are no values.
    pub fn around(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        let (lo, hi) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(AxisRange {
            min: (lo - RANGE_PADDING).max(0.0),
            max: (hi + RANGE_PADDING).min(10.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(keys: &[i32]) -> IndexMap<i32, usize> {
        let mut tally = IndexMap::new();
        for &key in keys {
            *tally.entry(key).or_default() += 1;
        }
        tally
    }

    #[test]
    fn mode_prefers_first_seen_on_tie() {
        let years = [2003, 2001, 2001, 2003, 1999];
        assert_eq!(mode(&tally(&years)), Some((&2003, 2)));

        // Same input, same answer.
        assert_eq!(mode(&tally(&years)), mode(&tally(&years)));
    }

    #[test]
    fn mode_of_nothing_is_none() {
        assert_eq!(mode(&IndexMap::<i32, usize>::new()), None);
    }

    #[test]
    fn groups_keep_insertion_order() {
        let mut groups: IndexMap<&str, RatingSum> = IndexMap::new();
        groups.entry("b").or_default().add(1.0);
        groups.entry("a").or_default().add(2.0);
        groups.entry("b").or_default().add(3.0);
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(groups.get("b").map(RatingSum::mean), Some(2.0));
    }

    #[test]
    fn axis_range_is_padded_and_clamped() {
        let r = AxisRange::around([7.0, 8.0]).unwrap();
        assert!((r.min - 6.7).abs() < 1e-9);
        assert!((r.max - 8.3).abs() < 1e-9);

        let r = AxisRange::around([0.1, 9.9]).unwrap();
        assert_eq!(r, AxisRange { min: 0.0, max: 10.0 });

        assert_eq!(AxisRange::around(Vec::<f64>::new()), None);
    }

    #[test]
    fn chart_serializes_with_status_tag() {
        let empty: Chart<Vec<u8>> = Chart::NoData;
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"status":"no_data"}"#);
        let ready = Chart::Ready(vec![1u8]);
        assert_eq!(
            serde_json::to_string(&ready).unwrap(),
            r#"{"status":"ready","data":[1]}"#
        );
    }
}
