use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{AnimeRecord, Dataset};

// ---------------------------------------------------------------------------
// Selection: which years / genres / studios are picked
// ---------------------------------------------------------------------------

/// The user's selection on the three filter dimensions.
/// An empty set means "no constraint" on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub genres: BTreeSet<String>,
    pub studios: BTreeSet<String>,
}

impl FilterSelection {
    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.genres.is_empty() && self.studios.is_empty()
    }

    /// Whether `record` passes every constrained dimension.
    pub fn matches(&self, record: &AnimeRecord) -> bool {
        let year_ok = self.years.is_empty() || self.years.contains(&record.year);
        let genre_ok = self.genres.is_empty() || record.genres.iter().any(|g| self.genres.contains(g));
        let studio_ok =
            self.studios.is_empty() || record.studios.iter().any(|s| self.studios.contains(s));
        year_ok && genre_ok && studio_ok
    }
}

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of a dataset
// ---------------------------------------------------------------------------

/// The records of a [`Dataset`] that match a selection, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a AnimeRecord>,
}

impl<'a> FilteredView<'a> {
    /// View over every record.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.records().iter().collect(),
        }
    }

    /// View over the records at `indices`. Out-of-range indices are ignored.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        Self {
            records: indices
                .iter()
                .filter_map(|&i| dataset.records().get(i))
                .collect(),
        }
    }

    pub fn records(&self) -> &[&'a AnimeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Narrow `dataset` to the records matching `selection`.
///
/// An empty selection yields every record. An empty result is returned as
/// is; substituting the full dataset is the caller's decision.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    FilteredView {
        records: dataset
            .records()
            .iter()
            .filter(|rec| selection.matches(rec))
            .collect(),
    }
}
