use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_CELL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s\-:]+$").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static UNDERLINE_BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static STAR_EM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w*])\*([^*\s](?:[^*]*[^*\s])?)\*($|[^\w*])").unwrap());
static UNDERSCORE_EM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w_])_([^_\s](?:[^_]*[^_\s])?)_($|[^\w_])").unwrap());

/// A pipe-delimited markdown table. Headers are lowercased; data rows keep
/// their original casing and may be ragged.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub data: Vec<Vec<String>>,
}

impl Table {
    /// Cell at (`row`, `col`), or `""` when either index is missing.
    pub fn cell<'a>(row: &'a [String], col: Option<usize>) -> &'a str {
        col.and_then(|c| row.get(c)).map(|s| s.as_str()).unwrap_or("")
    }
}

/// Scan `text` for runs of `|...|` lines and turn each qualifying run into a
/// [`Table`]. A run needs at least three lines (header, separator, one row) and
/// at least two rows left once alignment separators are dropped.
pub fn extract_tables(text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if is_table_line(trimmed) {
            run.push(trimmed);
            continue;
        }
        if let Some(table) = close_run(&run) {
            tables.push(table);
        }
        run.clear();
    }
    if let Some(table) = close_run(&run) {
        tables.push(table);
    }

    tables
}

fn is_table_line(line: &str) -> bool {
    line.len() > 2 && line.starts_with('|') && line.ends_with('|')
}

fn close_run(run: &[&str]) -> Option<Table> {
    if run.len() < 3 {
        return None;
    }

    let mut rows: Vec<Vec<String>> = run
        .iter()
        .map(|line| split_cells(line))
        .filter(|cells| !is_separator(cells))
        .map(|cells| cells.into_iter().map(|c| strip_markers(&c)).collect())
        .collect();

    if rows.len() < 2 {
        return None;
    }

    let headers = rows.remove(0).into_iter().map(|h| h.to_lowercase()).collect();
    Some(Table { headers, data: rows })
}

/// Split a `|a|b|` line into its interior cells, dropping the empty artifacts
/// before the first and after the last pipe.
fn split_cells(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1].iter().map(|s| s.to_string()).collect()
}

fn is_separator(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| SEPARATOR_CELL_RE.is_match(c))
}

/// Remove bold, emphasis and strikethrough markers, then trim.
///
/// Single `*`/`_` emphasis is only unwrapped when the markers are not glued to
/// word characters, so `snake_case_name` and `2*3*4` survive untouched.
pub fn strip_markers(cell: &str) -> String {
    let mut out = BOLD_RE.replace_all(cell, "$1").into_owned();
    out = UNDERLINE_BOLD_RE.replace_all(&out, "$1").into_owned();
    out = STRIKE_RE.replace_all(&out, "$1").into_owned();

    // Adjacent emphasised spans share a boundary character, so one pass can miss
    // the second span.
    for _ in 0..4 {
        let next = STAR_EM_RE.replace_all(&out, "$1$2$3");
        let next = UNDERSCORE_EM_RE.replace_all(&next, "$1$2$3").into_owned();
        if next == out {
            break;
        }
        out = next;
    }

    out.trim().to_string()
}

// ── Tests ──
