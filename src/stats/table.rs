use serde::Serialize;

use super::charts::top_rated;
use crate::data::model::AnimeRecord;
use crate::data::taxonomy::valid_genres;

/// One display-ready row of the top-rated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub year: i32,
    /// First two genres joined with `", "`, or `-`.
    pub genres: String,
    /// Rating with two decimals.
    pub rating: String,
    /// Rater count with thousands separators, or `-`.
    pub rated_by: String,
}

/// Table rows for the highest-rated titles of `view`.
pub fn leaderboard_rows(view: &[&AnimeRecord]) -> Vec<LeaderboardRow> {
    top_rated(view)
        .into_iter()
        .map(|rec| {
            let genres: Vec<&str> = valid_genres(&rec.genres).take(2).collect();
            LeaderboardRow {
                name: rec.name.clone(),
                year: rec.year,
                genres: if genres.is_empty() {
                    "-".to_string()
                } else {
                    genres.join(", ")
                },
                rating: format!("{:.2}", rec.rating),
                rated_by: if rec.rated_by > 0.0 {
                    group_thousands(rec.rated_by)
                } else {
                    "-".to_string()
                },
            }
        })
        .collect()
}

/// `1234567.0` → `"1,234,567"`. Fractions are rounded away.
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain-text rendering of the table for terminals.
pub fn render_text(rows: &[LeaderboardRow]) -> String {
    if rows.is_empty() {
        return "No rated titles to display.\n".to_string();
    }

    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let genre_width = rows
        .iter()
        .map(|r| r.genres.chars().count())
        .max()
        .unwrap_or(0)
        .max("Genres".len());

    let mut out = format!(
        "{:<name_width$}  {:>4}  {:<genre_width$}  {:>6}  {:>12}\n",
        "Name", "Year", "Genres", "Rating", "Rated by"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<name_width$}  {:>4}  {:<genre_width$}  {:>6}  {:>12}\n",
            row.name, row.year, row.genres, row.rating, row.rated_by
        ));
    }
    out
}
