use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Client;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Byte sources for the raw export
// ---------------------------------------------------------------------------

/// A place the raw export text can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `http://` or `https://` URL.
    Remote(String),
    /// Local file path.
    Local(PathBuf),
}

impl Source {
    /// Interpret a configured location: URLs are remote, anything else is a
    /// path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Remote(location.to_string())
        } else {
            Source::Local(PathBuf::from(location))
        }
    }

    /// Read the whole source as text.
    pub async fn fetch(&self) -> Result<String> {
        match self {
            Source::Remote(url) => {
                let client = Client::builder()
                    .build()
                    .context("Failed to build HTTP client")?;
                client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("GET {url}"))?
                    .text()
                    .await
                    .with_context(|| format!("reading body of {url}"))
            }
            Source::Local(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display())),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Text read from one of the sources.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub text: String,
    pub source: Source,
}

/// Try `primary`, then `fallback`. Exactly two attempts, no retry policy.
pub async fn fetch_with_fallback(primary: &Source, fallback: &Source) -> Result<Fetched, LoadError> {
    let primary_error = match primary.fetch().await {
        Ok(text) => {
            return Ok(Fetched {
                text,
                source: primary.clone(),
            })
        }
        Err(e) => e,
    };
    log::warn!("Primary source failed, trying fallback {fallback}: {primary_error:#}");

    match fallback.fetch().await {
        Ok(text) => Ok(Fetched {
            text,
            source: fallback.clone(),
        }),
        Err(fallback_error) => Err(LoadError::AllSourcesFailed {
            primary: primary.to_string(),
            primary_error,
            fallback: fallback.to_string(),
            fallback_error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn locations_are_classified() {
        assert_eq!(
            Source::parse("https://example.org/a.csv"),
            Source::Remote("https://example.org/a.csv".into())
        );
        assert_eq!(
            Source::parse("data/a.csv"),
            Source::Local(PathBuf::from("data/a.csv"))
        );
    }

    #[tokio::test]
    async fn falls_back_when_primary_is_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hello").unwrap();

        let primary = Source::Local(PathBuf::from("/definitely/not/here.csv"));
        let fallback = Source::Local(file.path().to_path_buf());
        let fetched = fetch_with_fallback(&primary, &fallback).await.unwrap();

        assert_eq!(fetched.text, "hello");
        assert_eq!(fetched.source, fallback);
    }

    #[tokio::test]
    async fn both_missing_is_terminal() {
        let primary = Source::Local(PathBuf::from("/definitely/not/here.csv"));
        let fallback = Source::Local(PathBuf::from("/also/not/here.csv"));
        let err = fetch_with_fallback(&primary, &fallback).await.unwrap_err();

        assert!(matches!(err, LoadError::AllSourcesFailed { .. }));
        assert!(err.to_string().contains("/also/not/here.csv"));
    }
}
