use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use super::model::{AnimeRecord, Dataset};
use super::parser::split_line;
use crate::config::ColumnMap;
use crate::error::{FieldFallback, SkipReason};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Signature of a known corruption in the source export.
pub const CORRUPTION_MARKER: &str = "Present (Music";

/// Year used whenever the air date is missing, unparsable or too old.
pub const DEFAULT_YEAR: i32 = 2000;

const MIN_YEAR: i32 = 1900;

/// Outcome of normalizing one document.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub dataset: Dataset,
    /// `(line number, reason)` for every dropped row; line numbers count
    /// non-blank lines with the header as line 0.
    pub skipped: Vec<(usize, SkipReason)>,
}

/// Normalize a whole export into a [`Dataset`].
///
/// A leading byte-order mark and blank lines are ignored. The first
/// remaining line is the header; a document without at least one data row
/// yields an empty dataset.
pub fn normalize_document(text: &str, columns: &ColumnMap) -> Normalized {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Normalized::default();
    }

    let header: Vec<String> = lines[0].split(',').map(|h| h.trim().to_string()).collect();

    let mut records = Vec::with_capacity(lines.len() - 1);
    let mut skipped = Vec::new();

    for (line_no, line) in lines.iter().enumerate().skip(1) {
        match normalize_row(line, &header, columns) {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::debug!("Skipping line {line_no}: {reason}");
                skipped.push((line_no, reason));
            }
        }
    }

    Normalized {
        dataset: Dataset::from_records(records),
        skipped,
    }
}

/// Build one record from a raw data line, or say why it was dropped.
pub fn normalize_row(
    line: &str,
    header: &[String],
    columns: &ColumnMap,
) -> Result<AnimeRecord, SkipReason> {
    if line.contains(CORRUPTION_MARKER) {
        return Err(SkipReason::CorruptionMarker(CORRUPTION_MARKER));
    }

    let fields = split_line(line);

    let mut name = String::new();
    let mut year = None;
    let mut rating = 0.0;
    let mut rated_by = 0.0;
    let mut episodes = 0.0;
    let mut genres = Vec::new();
    let mut studios = Vec::new();
    let mut extra = BTreeMap::new();

    for (idx, column) in header.iter().enumerate() {
        let value = clean_field(fields.get(idx).map(String::as_str).unwrap_or(""));

        if *column == columns.rating {
            rating = or_default(parse_number(value), 0.0);
        } else if *column == columns.rated_by {
            rated_by = or_default(parse_number(value), 0.0);
        } else if *column == columns.episodes {
            episodes = or_default(parse_number(value), 0.0);
        } else if *column == columns.air_date {
            year = Some(or_default(parse_year(value), DEFAULT_YEAR));
        } else if *column == columns.genres {
            genres = parse_list(value);
        } else if *column == columns.studios {
            studios = parse_list(value);
        } else if *column == columns.name {
            name = value.to_string();
        } else {
            extra.insert(column.clone(), value.to_string());
        }
    }

    if name.trim().is_empty() {
        return Err(SkipReason::BlankName);
    }

    Ok(AnimeRecord {
        name,
        year: or_default(validate_year(year.unwrap_or(0)), DEFAULT_YEAR),
        rating,
        rated_by,
        episodes,
        genres,
        studios,
        extra,
    })
}

fn or_default<T>(result: Result<T, FieldFallback>, default: T) -> T {
    result.unwrap_or_else(|fallback| {
        log::trace!("{fallback}");
        default
    })
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Trim a raw field and strip one leading and one trailing quote character.
fn clean_field(raw: &str) -> &str {
    let value = raw.trim();
    let value = value.strip_prefix(['\'', '"']).unwrap_or(value);
    value.strip_suffix(['\'', '"']).unwrap_or(value)
}

/// Parse the leading numeric literal of `value`, ignoring trailing garbage
/// (`"8.5 stars"` → 8.5).
pub fn parse_number(value: &str) -> Result<f64, FieldFallback> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return Err(FieldFallback::NotANumber(value.to_string()));
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldFallback::NotANumber(value.to_string()))
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y",
];

/// Extract the year from an air-date value.
///
/// Accepts ISO dates and timestamps, a handful of common written forms
/// (`Apr 3, 1998`, `04/03/1998`), month-year (`Apr 1998`) and a bare year.
pub fn parse_year(value: &str) -> Result<i32, FieldFallback> {
    let s = value.trim();
    let no_year = || FieldFallback::NoYear(value.to_string());
    if s.is_empty() {
        return Err(no_year());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.year());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.year());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date.year());
        }
    }
    // Month and year only: anchor to the first day of the month.
    for fmt in ["%d %b %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {s}"), fmt) {
            return Ok(date.year());
        }
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_err(|_| no_year());
    }

    Err(no_year())
}

/// Reject missing (0) and pre-1900 years.
fn validate_year(year: i32) -> Result<i32, FieldFallback> {
    if year < MIN_YEAR {
        Err(FieldFallback::YearOutOfRange(year))
    } else {
        Ok(year)
    }
}

/// Parse the bracketed pseudo-list encoding used by the genre and studio
/// columns (`['Action', 'Drama']`).
///
/// Values without brackets become a one-element list, empty values an
/// empty list.
pub fn parse_list(value: &str) -> Vec<String> {
    let value = value.trim();
    if let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return inner
            .split(',')
            .map(|item| item.trim().replace(['\'', '"'], ""))
            .filter(|item| !item.is_empty() && item != "null" && item != "undefined")
            .collect();
    }

    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}
