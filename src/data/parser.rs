// ---------------------------------------------------------------------------
// Line tokenizer for the export's simplified CSV dialect
// ---------------------------------------------------------------------------

/// Split one raw line into fields.
///
/// Commas delimit fields except inside a quoted span. A `"` only toggles the
/// quoted state and is dropped from the output; `""` is not an escape. An
/// unbalanced quote never fails: everything after it is read as quoted.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }

    fields.push(current);
    fields
}
