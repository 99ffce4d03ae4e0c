use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Noise-token exclusion for genre / studio values
// ---------------------------------------------------------------------------
//
// Malformed export rows leak status and source fragments ("Status: Finished
// Airing", "Source: Manga", bare numbers) into the list columns. Every place
// that enumerates, counts or displays genres and studios goes through these
// predicates so that all views agree on what a real value is.

static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

const GENRE_NOISE: &[&str] = &["Status", "Source"];
const STUDIO_NOISE: &[&str] = &["Status", "Finish", "Airing"];

/// Tokens of this many characters or fewer are never real values.
const MIN_EXCLUSIVE_LEN: usize = 2;

fn is_placeholder(token: &str) -> bool {
    token.trim().is_empty() || token == "null" || token == "undefined"
}

/// Whether `token` is a genre worth counting or showing.
pub fn is_valid_genre(token: &str) -> bool {
    !is_placeholder(token)
        && token.chars().count() > MIN_EXCLUSIVE_LEN
        && !GENRE_NOISE.iter().any(|noise| token.contains(noise))
}

/// Whether `token` is a studio worth counting or showing.
pub fn is_valid_studio(token: &str) -> bool {
    !is_placeholder(token)
        && token.chars().count() > MIN_EXCLUSIVE_LEN
        && !STUDIO_NOISE.iter().any(|noise| token.contains(noise))
        && !DIGITS_ONLY.is_match(token)
}

/// Iterate the genres of a record that pass [`is_valid_genre`].
pub fn valid_genres(genres: &[String]) -> impl Iterator<Item = &str> {
    genres.iter().map(String::as_str).filter(|g| is_valid_genre(g))
}

/// Iterate the studios of a record that pass [`is_valid_studio`].
pub fn valid_studios(studios: &[String]) -> impl Iterator<Item = &str> {
    studios.iter().map(String::as_str).filter(|s| is_valid_studio(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_are_rejected() {
        assert!(!is_valid_genre("TV"));
        assert!(!is_valid_studio("TV"));
        assert!(is_valid_genre("Gag"));
    }

    #[test]
    fn placeholders_are_rejected() {
        for token in ["", "   ", "null", "undefined"] {
            assert!(!is_valid_genre(token), "{token:?}");
            assert!(!is_valid_studio(token), "{token:?}");
        }
    }

    #[test]
    fn studio_status_fragments_are_rejected() {
        assert!(!is_valid_studio("Status: Finished Airing"));
        assert!(!is_valid_studio("Currently Airing"));
        assert!(!is_valid_studio("Finished"));
        assert!(!is_valid_studio("2004"));
        assert!(is_valid_studio("Madhouse"));
        assert!(is_valid_studio("4Kids Entertainment"));
    }

    #[test]
    fn genre_source_fragments_are_rejected() {
        assert!(!is_valid_genre("Source: Manga"));
        assert!(!is_valid_genre("Status"));
        assert!(is_valid_genre("Comedy"));
        // Airing is only noise for studios.
        assert!(is_valid_genre("Airing Soon"));
    }

    #[test]
    fn iterators_keep_order() {
        let genres = vec!["Drama".to_string(), "TV".to_string(), "Action".to_string()];
        assert_eq!(valid_genres(&genres).collect::<Vec<_>>(), vec!["Drama", "Action"]);
    }
}
