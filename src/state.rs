use std::sync::Arc;

use serde::Serialize;

use crate::config::{ColumnMap, Config, YearWindow};
use crate::data::filter::{filter, filtered_indices, FilterSelection, FilteredView};
use crate::data::model::Dataset;
use crate::data::normalize::normalize_document;
use crate::data::source::{fetch_with_fallback, Source};
use crate::error::LoadError;
use crate::stats::{
    compute_charts, filter_options, leaderboard_rows, summarize, ChartSet, FilterOptions,
    LeaderboardRow, MetricSummary,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything a dashboard needs, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Arc<Dataset>>,

    /// Current selection on the three filter dimensions.
    pub selection: FilterSelection,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    pub columns: ColumnMap,
    pub year_window: YearWindow,

    /// Status / error message for the user.
    pub status_message: Option<String>,

    /// Whether a load is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Aggregated output for one `(Dataset, FilterSelection)` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_records: usize,
    pub matching_records: usize,
    /// True when the selection matched nothing and the full dataset is shown.
    pub showing_unfiltered: bool,
    pub options: FilterOptions,
    pub summary: MetricSummary,
    pub charts: ChartSet,
    pub leaderboard: Vec<LeaderboardRow>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            columns: config.columns.clone(),
            year_window: config.year_options,
            status_message: None,
            loading: false,
        }
    }

    /// Fetch, parse and install a new dataset.
    ///
    /// On failure the previous dataset stays installed and the error is
    /// recorded in `status_message` as well as returned.
    pub async fn load_dataset(&mut self, primary: &Source, fallback: &Source) -> Result<(), LoadError> {
        self.loading = true;
        let fetched = match fetch_with_fallback(primary, fallback).await {
            Ok(fetched) => fetched,
            Err(e) => {
                log::warn!("Load failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
                return Err(e);
            }
        };

        let normalized = normalize_document(&fetched.text, &self.columns);
        log::info!(
            "Loaded {} records from {} ({} rows skipped)",
            normalized.dataset.len(),
            fetched.source,
            normalized.skipped.len()
        );
        self.set_dataset(normalized.dataset);
        Ok(())
    }

    /// Install a fully built dataset and reset the selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(Arc::new(dataset));
        self.status_message = None;
        self.loading = false;
    }

    /// Records matching `selection` in the current dataset. Does not touch
    /// the stored selection.
    pub fn filter(&self, selection: &FilterSelection) -> Option<FilteredView<'_>> {
        self.dataset.as_deref().map(|ds| filter(ds, selection))
    }

    /// Replace the stored selection and recompute `visible_indices`.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.refilter();
    }

    /// Recompute `visible_indices` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
        }
    }

    pub fn clear_filters(&mut self) {
        self.set_selection(FilterSelection::default());
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.refilter();
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.selection.genres.remove(genre) {
            self.selection.genres.insert(genre.to_string());
        }
        self.refilter();
    }

    pub fn toggle_studio(&mut self, studio: &str) {
        if !self.selection.studios.remove(studio) {
            self.selection.studios.insert(studio.to_string());
        }
        self.refilter();
    }

    /// The view aggregations run over: the filtered records, or the whole
    /// dataset when the selection matches nothing.
    pub fn active_view(&self) -> Option<(FilteredView<'_>, bool)> {
        let ds = self.dataset.as_deref()?;
        if self.visible_indices.is_empty() {
            Some((FilteredView::all(ds), !self.selection.is_empty()))
        } else {
            Some((FilteredView::from_indices(ds, &self.visible_indices), false))
        }
    }

    /// Compute every output for the current snapshot.
    pub fn dashboard(&self) -> Option<Dashboard> {
        let ds = self.dataset.as_deref()?;
        let (view, showing_unfiltered) = self.active_view()?;
        let records = view.records();

        Some(Dashboard {
            total_records: ds.len(),
            matching_records: self.visible_indices.len(),
            showing_unfiltered,
            options: filter_options(ds, self.year_window),
            summary: summarize(records),
            charts: compute_charts(records),
            leaderboard: leaderboard_rows(records),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::AnimeRecord;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_records(vec![
            AnimeRecord::named("A", 2001, 8.0).with_genres(&["Drama"]),
            AnimeRecord::named("B", 2002, 7.0).with_genres(&["Comedy"]),
        ]));
        state
    }

    #[test]
    fn toggles_narrow_and_widen() {
        let mut state = loaded();
        state.toggle_genre("Drama");
        assert_eq!(state.visible_indices, vec![0]);
        state.toggle_year(2002);
        assert!(state.visible_indices.is_empty());
        state.toggle_genre("Drama");
        assert_eq!(state.visible_indices, vec![1]);
        state.clear_filters();
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn empty_match_falls_back_to_everything() {
        let mut state = loaded();
        state.toggle_studio("Nobody");
        let dashboard = state.dashboard().unwrap();
        assert!(dashboard.showing_unfiltered);
        assert_eq!(dashboard.matching_records, 0);
        assert_eq!(dashboard.leaderboard.len(), 2);
    }

    #[test]
    fn filter_is_pure() {
        let state = loaded();
        let selection = FilterSelection {
            years: [2002].into(),
            ..Default::default()
        };
        assert_eq!(state.filter(&selection).map(|v| v.len()), Some(1));
        assert!(state.selection.is_empty());
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn no_dataset_no_dashboard() {
        assert!(AppState::default().dashboard().is_none());
    }
}
