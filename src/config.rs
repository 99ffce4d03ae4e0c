use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::source::Source;

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_PRIMARY: &str =
    "https://matheusfernandescarillo.github.io/analise-animes/animes_limpo.csv";
pub const DEFAULT_FALLBACK: &str = "./data/animes_limpo.csv";

/// Top-level configuration, read from an optional JSON file.
///
/// ```json
/// {
///   "sources": { "primary": "https://…/animes.csv", "fallback": "data/animes.csv" },
///   "columns": { "name": "Title", "rating": "Score" },
///   "year_options": { "after": 1960, "before": 2030 }
/// }
/// ```
///
/// Every field is optional and falls back to the defaults of the published
/// export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourceConfig,
    pub columns: ColumnMap,
    pub year_options: YearWindow,
}

impl Config {
    /// Read a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Where the export is fetched from: primary first, fallback on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub primary: String,
    pub fallback: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn primary_source(&self) -> Source {
        Source::parse(&self.primary)
    }

    pub fn fallback_source(&self) -> Source {
        Source::parse(&self.fallback)
    }
}

/// Header names of the columns the pipeline interprets. Any other column
/// is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub rating: String,
    pub rated_by: String,
    pub episodes: String,
    pub air_date: String,
    pub genres: String,
    pub studios: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "Nome".to_string(),
            rating: "Nota".to_string(),
            rated_by: "Avaliado por".to_string(),
            episodes: "Episodio".to_string(),
            air_date: "Data de Exibição".to_string(),
            genres: "Genero".to_string(),
            studios: "Estudio".to_string(),
        }
    }
}

/// Exclusive year bounds for the year selection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct YearWindow {
    pub after: i32,
    pub before: i32,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            after: 1960,
            before: 2030,
        }
    }
}

impl YearWindow {
    pub fn contains(&self, year: i32) -> bool {
        year > self.after && year < self.before
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "columns": {{ "name": "Title" }}, "year_options": {{ "before": 2025 }} }}"#)
            .unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.columns.name, "Title");
        assert_eq!(config.columns.rating, "Nota");
        assert_eq!(config.year_options, YearWindow { after: 1960, before: 2025 });
        assert_eq!(config.sources.fallback, DEFAULT_FALLBACK);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::from_path(file.path()).is_err());
    }

    #[test]
    fn year_window_is_exclusive() {
        let window = YearWindow::default();
        assert!(!window.contains(1960));
        assert!(window.contains(1961));
        assert!(!window.contains(2030));
    }
}
