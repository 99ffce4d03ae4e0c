/// Data layer: sources, parsing, normalization, filtering.
///
/// Architecture:
/// ```text
///  remote URL / local .csv
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  primary, then fallback → raw text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │ normalize │──▶│  parser   │  one line → fields
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<AnimeRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView
///   └──────────┘
/// ```
///
/// `taxonomy` decides which genre / studio tokens are real values; every
/// consumer that lists or counts them goes through it.

pub mod filter;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod source;
pub mod taxonomy;
