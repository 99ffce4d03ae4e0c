use indexmap::IndexMap;
use serde::Serialize;

use super::{
    AxisRange, Chart, RatingSum, COMPARISON_GENRES, EVOLUTION_GENRES, LEADERBOARD_SIZE,
    MIN_GENRE_SUPPORT, MIN_SERIES_YEARS, MIN_STUDIO_SUPPORT, MIN_YEAR_SUPPORT, TOP_GENRES,
    TOP_STUDIOS,
};
use crate::data::model::AnimeRecord;
use crate::data::taxonomy::{valid_genres, valid_studios};

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudioQuality {
    pub studio: String,
    pub mean_rating: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub mean_rating: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTrend {
    pub points: Vec<YearPoint>,
    pub range: AxisRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreVolume {
    pub genre: String,
    pub count: usize,
    pub mean_rating: f64,
    pub total_raters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSeries {
    pub genre: String,
    pub points: Vec<YearPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreEvolution {
    pub series: Vec<GenreSeries>,
    /// Shared value range over every point of every series.
    pub range: AxisRange,
}

/// Four per-genre metrics, either raw or scaled to 0–10.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenreMetrics {
    pub mean_rating: f64,
    pub count: f64,
    /// Mean raters per title.
    pub popularity: f64,
    /// Share of the view's titles, in percent.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfile {
    pub genre: String,
    pub raw: GenreMetrics,
    pub scaled: GenreMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// Name shortened for axis labels.
    pub label: String,
    pub name: String,
    pub rating: f64,
}

/// Every chart dataset the dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub studio_ranking: Chart<Vec<StudioQuality>>,
    pub year_trend: Chart<YearTrend>,
    pub genre_volume: Chart<Vec<GenreVolume>>,
    pub genre_evolution: Chart<GenreEvolution>,
    pub genre_comparison: Chart<Vec<GenreProfile>>,
    pub leaderboard: Chart<Vec<LeaderboardEntry>>,
}

impl ChartSet {
    pub fn no_data() -> Self {
        ChartSet {
            studio_ranking: Chart::NoData,
            year_trend: Chart::NoData,
            genre_volume: Chart::NoData,
            genre_evolution: Chart::NoData,
            genre_comparison: Chart::NoData,
            leaderboard: Chart::NoData,
        }
    }
}

/// Compute all chart datasets for `view`.
pub fn compute_charts(view: &[&AnimeRecord]) -> ChartSet {
    if view.is_empty() {
        return ChartSet::no_data();
    }

    let volume = genre_volume(view);
    let genre_comparison = Chart::from_non_empty(genre_comparison(&volume, view.len()), Vec::is_empty);

    ChartSet {
        studio_ranking: Chart::from_non_empty(studio_ranking(view), Vec::is_empty),
        year_trend: year_trend(view).map_or(Chart::NoData, Chart::Ready),
        genre_evolution: genre_evolution(view, &volume).map_or(Chart::NoData, Chart::Ready),
        genre_comparison,
        leaderboard: Chart::from_non_empty(leaderboard_entries(view), Vec::is_empty),
        genre_volume: Chart::from_non_empty(volume, Vec::is_empty),
    }
}

// ---------------------------------------------------------------------------
// Studio quality ranking
// ---------------------------------------------------------------------------

/// Best-rated studios with at least [`MIN_STUDIO_SUPPORT`] rated titles.
pub fn studio_ranking(view: &[&AnimeRecord]) -> Vec<StudioQuality> {
    let mut groups: IndexMap<&str, RatingSum> = IndexMap::new();
    for rec in view.iter().filter(|r| r.is_rated()) {
        for studio in valid_studios(&rec.studios) {
            groups.entry(studio).or_default().add(rec.rating);
        }
    }

    let mut rows: Vec<StudioQuality> = groups
        .into_iter()
        .filter(|(_, sum)| sum.count >= MIN_STUDIO_SUPPORT)
        .map(|(studio, sum)| StudioQuality {
            studio: studio.to_string(),
            mean_rating: sum.mean(),
            count: sum.count,
        })
        .collect();
    rows.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
    rows.truncate(TOP_STUDIOS);
    rows
}

// ---------------------------------------------------------------------------
// Year trend
// ---------------------------------------------------------------------------

fn yearly_means<'a>(records: impl Iterator<Item = &'a AnimeRecord>) -> Vec<YearPoint> {
    let mut groups: IndexMap<i32, RatingSum> = IndexMap::new();
    for rec in records.filter(|r| r.is_rated()) {
        groups.entry(rec.year).or_default().add(rec.rating);
    }
    let mut points: Vec<YearPoint> = groups
        .into_iter()
        .map(|(year, sum)| YearPoint {
            year,
            mean_rating: sum.mean(),
            count: sum.count,
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points
}

/// Mean rating per year for years with at least [`MIN_YEAR_SUPPORT`] rated
/// titles, oldest first. `None` when no year qualifies.
pub fn year_trend(view: &[&AnimeRecord]) -> Option<YearTrend> {
    let points: Vec<YearPoint> = yearly_means(view.iter().copied())
        .into_iter()
        .filter(|p| p.count >= MIN_YEAR_SUPPORT)
        .collect();
    let range = AxisRange::around(points.iter().map(|p| p.mean_rating))?;
    Some(YearTrend { points, range })
}

// ---------------------------------------------------------------------------
// Genre volume, evolution and comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct GenreAcc {
    rating: RatingSum,
    raters: f64,
}

/// Most common genres with at least [`MIN_GENRE_SUPPORT`] titles.
///
/// Unrated titles count towards volume and pull the mean rating down; this
/// is a volume ranking, not a quality one.
pub fn genre_volume(view: &[&AnimeRecord]) -> Vec<GenreVolume> {
    let mut groups: IndexMap<&str, GenreAcc> = IndexMap::new();
    for rec in view {
        for genre in valid_genres(&rec.genres) {
            let acc = groups.entry(genre).or_default();
            acc.rating.add(rec.rating);
            acc.raters += rec.rated_by;
        }
    }

    let mut rows: Vec<GenreVolume> = groups
        .into_iter()
        .filter(|(_, acc)| acc.rating.count >= MIN_GENRE_SUPPORT)
        .map(|(genre, acc)| GenreVolume {
            genre: genre.to_string(),
            count: acc.rating.count,
            mean_rating: acc.rating.mean(),
            total_raters: acc.raters,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(TOP_GENRES);
    rows
}

/// Yearly mean rating of the top [`EVOLUTION_GENRES`] genres of `volume`.
/// A genre is kept only if it spans at least [`MIN_SERIES_YEARS`] years.
pub fn genre_evolution(view: &[&AnimeRecord], volume: &[GenreVolume]) -> Option<GenreEvolution> {
    let series: Vec<GenreSeries> = volume
        .iter()
        .take(EVOLUTION_GENRES)
        .map(|g| GenreSeries {
            genre: g.genre.clone(),
            points: yearly_means(
                view.iter()
                    .copied()
                    .filter(|rec| rec.genres.iter().any(|rg| *rg == g.genre)),
            ),
        })
        .filter(|s| s.points.len() >= MIN_SERIES_YEARS)
        .collect();

    let range = AxisRange::around(
        series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.mean_rating)),
    )?;
    Some(GenreEvolution { series, range })
}

/// Four-metric profile of the top [`COMPARISON_GENRES`] genres, each metric
/// also scaled against its maximum across those genres onto 0–10.
pub fn genre_comparison(volume: &[GenreVolume], view_size: usize) -> Vec<GenreProfile> {
    let raw: Vec<(String, GenreMetrics)> = volume
        .iter()
        .take(COMPARISON_GENRES)
        .map(|g| {
            let count = g.count as f64;
            (
                g.genre.clone(),
                GenreMetrics {
                    mean_rating: g.mean_rating,
                    count,
                    popularity: g.total_raters / count,
                    density: if view_size == 0 {
                        0.0
                    } else {
                        count / view_size as f64 * 100.0
                    },
                },
            )
        })
        .collect();

    let max_rating = column_max(&raw, |m| m.mean_rating);
    let max_count = column_max(&raw, |m| m.count);
    let max_popularity = column_max(&raw, |m| m.popularity);
    let max_density = column_max(&raw, |m| m.density);

    raw.into_iter()
        .map(|(genre, m)| GenreProfile {
            genre,
            scaled: GenreMetrics {
                mean_rating: scale(m.mean_rating, max_rating),
                count: scale(m.count, max_count),
                popularity: scale(m.popularity, max_popularity),
                density: scale(m.density, max_density),
            },
            raw: m,
        })
        .collect()
}

fn column_max(raw: &[(String, GenreMetrics)], metric: impl Fn(&GenreMetrics) -> f64) -> f64 {
    raw.iter()
        .map(|(_, m)| metric(m))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// `value / max * 10`, or 0 when the maximum is not positive.
fn scale(value: f64, max: f64) -> f64 {
    if max > 0.0 && max.is_finite() {
        value / max * 10.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

const LABEL_MAX_CHARS: usize = 30;

/// Highest-rated named titles, best first. Equal ratings keep view order.
pub fn top_rated<'a>(view: &[&'a AnimeRecord]) -> Vec<&'a AnimeRecord> {
    let mut rated: Vec<&AnimeRecord> = view
        .iter()
        .copied()
        .filter(|r| r.is_rated() && !r.name.trim().is_empty())
        .collect();
    rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rated.truncate(LEADERBOARD_SIZE);
    rated
}

fn leaderboard_entries(view: &[&AnimeRecord]) -> Vec<LeaderboardEntry> {
    top_rated(view)
        .into_iter()
        .map(|rec| LeaderboardEntry {
            label: short_label(&rec.name),
            name: rec.name.clone(),
            rating: rec.rating,
        })
        .collect()
}

fn short_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head: String = name.chars().take(LABEL_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn refs(records: &[AnimeRecord]) -> Vec<&AnimeRecord> {
        records.iter().collect()
    }

    fn studio_titles(studio: &str, ratings: &[f64]) -> Vec<AnimeRecord> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| AnimeRecord::named(&format!("{studio}{i}"), 2000, r).with_studios(&[studio]))
            .collect()
    }

    #[test]
    fn studio_support_threshold() {
        let mut records = studio_titles("Two Studio", &[9.9, 9.9]);
        records.extend(studio_titles("Three Studio", &[6.0, 7.0, 8.0]));
        // Unrated titles do not count towards support.
        records.extend(studio_titles("Padded", &[9.0, 9.0, 0.0, 0.0]));

        let ranking = studio_ranking(&refs(&records));
        assert_eq!(
            ranking,
            vec![StudioQuality {
                studio: "Three Studio".into(),
                mean_rating: 7.0,
                count: 3
            }]
        );
    }

    #[test]
    fn studio_ranking_sorted_and_capped() {
        let mut records = Vec::new();
        for i in 0..12 {
            records.extend(studio_titles(&format!("Studio {i:02}"), &[5.0 + i as f64 * 0.25; 3]));
        }
        let ranking = studio_ranking(&refs(&records));
        assert_eq!(ranking.len(), TOP_STUDIOS);
        assert_eq!(ranking[0].studio, "Studio 11");
        assert!(ranking.windows(2).all(|w| w[0].mean_rating >= w[1].mean_rating));
    }

    #[test]
    fn equal_means_keep_first_seen_order() {
        let mut records = studio_titles("Later", &[7.0; 3]);
        records.extend(studio_titles("Earlier", &[7.0; 3]));
        let ranking = studio_ranking(&refs(&records));
        let names: Vec<_> = ranking.iter().map(|r| r.studio.as_str()).collect();
        assert_eq!(names, vec!["Later", "Earlier"]);
    }

    #[test]
    fn year_trend_threshold_and_range() {
        let mut records = Vec::new();
        for _ in 0..5 {
            records.push(AnimeRecord::named("x", 2002, 8.0));
            records.push(AnimeRecord::named("y", 2001, 6.0));
        }
        for _ in 0..4 {
            records.push(AnimeRecord::named("z", 2003, 9.0));
        }
        let trend = year_trend(&refs(&records)).unwrap();
        let years: Vec<_> = trend.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2001, 2002]);
        assert!((trend.range.min - 5.7).abs() < 1e-9);
        assert!((trend.range.max - 8.3).abs() < 1e-9);
    }

    #[test]
    fn year_trend_without_support_is_none() {
        let records = vec![AnimeRecord::named("x", 2002, 8.0)];
        assert_eq!(year_trend(&refs(&records)), None);
    }

    fn genre_titles(genre: &str, years: &[i32], rating: f64) -> Vec<AnimeRecord> {
        years
            .iter()
            .map(|&y| {
                AnimeRecord::named(genre, y, rating)
                    .with_genres(&[genre])
                    .with_rated_by(10.0)
            })
            .collect()
    }

    #[test]
    fn genre_volume_counts_unrated_titles() {
        let mut records = genre_titles("Drama", &[2000; 5], 8.0);
        records.extend(genre_titles("Drama", &[2000], 0.0));
        records.extend(genre_titles("Mecha", &[2000; 4], 9.0));

        let volume = genre_volume(&refs(&records));
        assert_eq!(volume.len(), 1);
        assert_eq!(volume[0].genre, "Drama");
        assert_eq!(volume[0].count, 6);
        assert!((volume[0].mean_rating - 40.0 / 6.0).abs() < 1e-9);
        assert_eq!(volume[0].total_raters, 60.0);
    }

    #[test]
    fn evolution_needs_three_years() {
        let mut records = genre_titles("Drama", &[2000, 2001, 2002, 2002, 2002], 8.0);
        records.extend(genre_titles("Comedy", &[2000, 2000, 2000, 2001, 2001], 7.0));
        let view = refs(&records);
        let volume = genre_volume(&view);
        assert_eq!(volume.len(), 2);

        let evolution = genre_evolution(&view, &volume).unwrap();
        assert_eq!(evolution.series.len(), 1);
        assert_eq!(evolution.series[0].genre, "Drama");
        let years: Vec<_> = evolution.series[0].points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(evolution.series[0].points[2].count, 3);
    }

    #[test]
    fn comparison_is_scaled_per_metric() {
        let volume = vec![
            GenreVolume {
                genre: "Drama".into(),
                count: 10,
                mean_rating: 8.0,
                total_raters: 1000.0,
            },
            GenreVolume {
                genre: "Comedy".into(),
                count: 5,
                mean_rating: 4.0,
                total_raters: 1000.0,
            },
        ];
        let profiles = genre_comparison(&volume, 20);

        assert_eq!(profiles[0].raw.density, 50.0);
        assert_eq!(profiles[0].raw.popularity, 100.0);
        assert_eq!(profiles[0].scaled.mean_rating, 10.0);
        assert_eq!(profiles[0].scaled.count, 10.0);
        assert_eq!(profiles[0].scaled.popularity, 5.0);
        assert_eq!(profiles[1].scaled.mean_rating, 5.0);
        assert_eq!(profiles[1].scaled.popularity, 10.0);
        assert_eq!(profiles[1].scaled.density, 5.0);
    }

    #[test]
    fn comparison_with_zero_maximum_scales_to_zero() {
        let volume = vec![GenreVolume {
            genre: "Drama".into(),
            count: 5,
            mean_rating: 0.0,
            total_raters: 0.0,
        }];
        let profiles = genre_comparison(&volume, 5);
        assert_eq!(profiles[0].scaled.mean_rating, 0.0);
        assert_eq!(profiles[0].scaled.popularity, 0.0);
        assert_eq!(profiles[0].scaled.count, 10.0);
    }

    #[test]
    fn leaderboard_orders_and_truncates_labels() {
        let long = "A".repeat(35);
        let records = vec![
            AnimeRecord::named("Mid", 2000, 7.0),
            AnimeRecord::named(&long, 2000, 9.0),
            AnimeRecord::named("Unrated", 2000, 0.0),
        ];
        let entries = leaderboard_entries(&refs(&records));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, format!("{}...", "A".repeat(30)));
        assert_eq!(entries[1].name, "Mid");
    }

    #[test]
    fn empty_view_is_all_no_data() {
        assert_eq!(compute_charts(&[]), ChartSet::no_data());
    }

    #[test]
    fn sparse_view_marks_unsupported_charts() {
        let records = vec![AnimeRecord::named("Solo", 2000, 8.0).with_genres(&["Drama"])];
        let charts = compute_charts(&refs(&records));
        assert!(charts.studio_ranking.is_no_data());
        assert!(charts.year_trend.is_no_data());
        assert!(charts.genre_volume.is_no_data());
        assert!(charts.genre_evolution.is_no_data());
        assert!(charts.genre_comparison.is_no_data());
        assert_eq!(charts.leaderboard.ready().map(Vec::len), Some(1));
    }
}
