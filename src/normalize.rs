//! Text normalization.
//!
//! Pure functions, no I/O. `normalize` is idempotent: applying it to its own
//! output is a no-op. Original casing is preserved; keyword matching uses
//! the separate lowercase form from `matching_form`.

/// Canonicalize email text: trim, collapse whitespace runs within lines,
/// collapse runs of blank lines, and drop a trailing signature block
/// (everything from a `-- ` delimiter line on).
pub fn normalize(text: &str) -> String {
    let body = strip_signature(text);

    let mut out: Vec<String> = Vec::new();
    let mut prev_blank = true; // leading blank lines are dropped
    for raw_line in body.lines() {
        let line = collapse_spaces(raw_line.trim());
        if line.is_empty() {
            if !prev_blank {
                out.push(String::new());
            }
            prev_blank = true;
        } else {
            out.push(line);
            prev_blank = false;
        }
    }
    while matches!(out.last(), Some(line) if line.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// Lowercase working copy used only for keyword matching. Reply generation
/// always sees the original casing.
pub fn matching_form(text: &str) -> String {
    text.to_lowercase()
}

/// Collapse runs of horizontal whitespace to a single space.
fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !prev_space && !out.is_empty() {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim_end().to_string()
}

/// Cut the text at the first signature delimiter line (`-- ` per RFC 3676;
/// a bare `--` line counts too since line trimming erases the space).
fn strip_signature(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim() == "--" {
            return &text[..offset];
        }
        offset += line.len();
    }
    text
}
