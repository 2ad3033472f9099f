use std::sync::LazyLock;

use regex::Regex;

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap());
static SUMMARY_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(total|sum|average|subtotal|overall|grand total)\b").unwrap()
});

/// Decoration that AI responses wrap around numbers: emphasis, percent signs,
/// multipliers, currency and ordinal hashes.
const NUMBER_NOISE: &[char] = &['*', '_', '~', '%', 'x', '×', '+', '$', '#'];

/// Resolve the column whose header best matches `patterns`.
///
/// Patterns are a priority list. The first pass looks for a whole-word match
/// (optionally pluralised) of each pattern in turn across every header; only
/// when no pattern matches that way does a second pass fall back to plain
/// substring containment in the same order.
pub fn find_col(headers: &[String], patterns: &[&str]) -> Option<usize> {
    for pattern in patterns {
        let re = match Regex::new(&format!(r"(?i)\b{}s?\b", regex::escape(pattern))) {
            Ok(re) => re,
            Err(_) => continue,
        };
        if let Some(idx) = headers.iter().position(|h| re.is_match(h)) {
            return Some(idx);
        }
    }

    for pattern in patterns {
        let needle = pattern.to_lowercase();
        if let Some(idx) = headers.iter().position(|h| h.to_lowercase().contains(&needle)) {
            return Some(idx);
        }
    }

    None
}

/// Parse a table cell as a number. Returns `NaN` when no leading number can
/// be read; use [`parse_or`] at call sites that need a value.
pub fn parse_num(cell: &str) -> f64 {
    let cleaned: String = cell.chars().filter(|c| !NUMBER_NOISE.contains(c)).collect();
    let cleaned = strip_thousands_commas(&cleaned);
    let cleaned = cleaned.trim();

    LEADING_NUMBER_RE
        .find(cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// [`parse_num`], with `default` standing in for anything non-finite.
pub fn parse_or(cell: &str, default: f64) -> f64 {
    let n = parse_num(cell);
    if n.is_finite() {
        n
    } else {
        default
    }
}

/// Drop every comma that is directly followed by three ASCII digits.
fn strip_thousands_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == ',' {
            let followed = chars
                .get(i + 1..i + 4)
                .is_some_and(|next| next.iter().all(|d| d.is_ascii_digit()));
            if followed {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

/// True for "Total", "Average", "Grand total" and similar arithmetic rows.
pub fn is_summary_row(label: &str) -> bool {
    SUMMARY_ROW_RE.is_match(label.trim())
}

// ── Tests ──
