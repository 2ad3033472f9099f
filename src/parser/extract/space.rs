use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{ScoredFactor, SpaceData};
use crate::parser::cells::{find_col, parse_num};
use crate::parser::sections::split_sections;
use crate::parser::tables::{extract_tables, Table};

const FACTOR_PATTERNS: &[&str] = &["factor", "dimension", "variable", "criterion"];
const SCORE_PATTERNS: &[&str] = &["score", "rating", "value"];
const DIMENSION_COLUMN_PATTERNS: &[&str] = &["dimension", "category", "axis"];
const FALLBACK_FACTOR_PATTERNS: &[&str] = &["factor", "variable", "criterion"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Fs,
    Ca,
    Es,
    Is,
}

const DIMENSIONS: [Dimension; 4] = [Dimension::Fs, Dimension::Ca, Dimension::Es, Dimension::Is];

static ABBREVIATION_RES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    DIMENSIONS.map(|d| Regex::new(&format!(r"\b{}\b", d.abbreviation())).unwrap())
});

impl Dimension {
    fn full_name(self) -> &'static str {
        match self {
            Dimension::Fs => "financial strength",
            Dimension::Ca => "competitive advantage",
            Dimension::Es => "environmental stability",
            Dimension::Is => "industry strength",
        }
    }

    /// Upper-case on purpose: "is" and "es" are ordinary words in lower case.
    fn abbreviation(self) -> &'static str {
        match self {
            Dimension::Fs => "FS",
            Dimension::Ca => "CA",
            Dimension::Es => "ES",
            Dimension::Is => "IS",
        }
    }

    /// Looser stems accepted when classifying a dimension cell.
    fn stem(self) -> &'static str {
        match self {
            Dimension::Fs => "financial",
            Dimension::Ca => "competitive",
            Dimension::Es => "environment",
            Dimension::Is => "industry",
        }
    }

    fn index(self) -> usize {
        match self {
            Dimension::Fs => 0,
            Dimension::Ca => 1,
            Dimension::Es => 2,
            Dimension::Is => 3,
        }
    }

    /// CA and ES are expressed as negative magnitudes, FS and IS as positive.
    fn normalize(self, score: f64) -> f64 {
        match self {
            Dimension::Ca | Dimension::Es => -score.abs(),
            Dimension::Fs | Dimension::Is => score.abs(),
        }
    }

    fn from_heading(heading: &str) -> Option<Dimension> {
        let lower = heading.to_lowercase();
        DIMENSIONS.into_iter().find(|d| {
            lower.contains(d.full_name()) || ABBREVIATION_RES[d.index()].is_match(heading)
        })
    }

    fn from_cell(cell: &str) -> Option<Dimension> {
        let lower = cell.trim().to_lowercase();
        if let Some(d) = DIMENSIONS.into_iter().find(|d| lower.contains(d.full_name())) {
            return Some(d);
        }
        if let Some(d) = DIMENSIONS.into_iter().find(|d| lower.contains(d.stem())) {
            return Some(d);
        }
        let token = lower.trim_matches(|c: char| !c.is_alphanumeric());
        DIMENSIONS
            .into_iter()
            .find(|d| token.eq_ignore_ascii_case(d.abbreviation()))
    }
}

pub fn parse_space_data(text: &str) -> Option<SpaceData> {
    let mut dims: [Vec<ScoredFactor>; 4] = Default::default();

    for section in split_sections(text) {
        let Some(dim) = Dimension::from_heading(&section.heading) else {
            continue;
        };
        for table in extract_tables(&section.content) {
            dims[dim.index()].extend(section_rows(&table, dim));
        }
    }

    if dims.iter().all(|d| d.is_empty()) {
        debug!("no SPACE dimension sections, scanning flat tables");
        for table in extract_tables(text) {
            flat_rows(&table, &mut dims);
        }
    }

    if dims.iter().all(|d| d.is_empty()) {
        return None;
    }

    let [fs, ca, es, is] = dims;
    Some(SpaceData {
        fs: or_default(fs, Dimension::Fs),
        ca: or_default(ca, Dimension::Ca),
        es: or_default(es, Dimension::Es),
        is: or_default(is, Dimension::Is),
    })
}

fn section_rows(table: &Table, dim: Dimension) -> Vec<ScoredFactor> {
    let factor_col = find_col(&table.headers, FACTOR_PATTERNS).or(Some(0));
    let score_col = find_col(&table.headers, SCORE_PATTERNS)
        .or_else(|| table.headers.len().checked_sub(1));

    table
        .data
        .iter()
        .filter_map(|row| scored(Table::cell(row, factor_col), Table::cell(row, score_col), dim))
        .collect()
}

/// Rows of a `Dimension | Factor | Score` table, each filed under the
/// dimension named in its own row.
fn flat_rows(table: &Table, dims: &mut [Vec<ScoredFactor>; 4]) {
    let Some(dim_col) = find_col(&table.headers, DIMENSION_COLUMN_PATTERNS) else {
        return;
    };
    let Some(score_col) = find_col(&table.headers, SCORE_PATTERNS) else {
        return;
    };
    let factor_col = find_col(&table.headers, FALLBACK_FACTOR_PATTERNS).filter(|c| *c != dim_col);

    for row in &table.data {
        let dim_cell = Table::cell(row, Some(dim_col));
        let Some(dim) = Dimension::from_cell(dim_cell) else {
            continue;
        };
        let factor = match factor_col {
            Some(_) => Table::cell(row, factor_col),
            None => dim_cell,
        };
        if let Some(f) = scored(factor, Table::cell(row, Some(score_col)), dim) {
            dims[dim.index()].push(f);
        }
    }
}

fn scored(factor: &str, score: &str, dim: Dimension) -> Option<ScoredFactor> {
    let factor = factor.trim();
    if factor.is_empty() {
        return None;
    }
    let score = parse_num(score);
    if !score.is_finite() {
        return None;
    }
    Some(ScoredFactor {
        factor: factor.to_string(),
        score: dim.normalize(score),
    })
}

fn or_default(rows: Vec<ScoredFactor>, dim: Dimension) -> Vec<ScoredFactor> {
    if !rows.is_empty() {
        return rows;
    }
    vec![ScoredFactor {
        factor: "Factor 1".to_string(),
        score: dim.normalize(3.0),
    }]
}

// ── Tests ──
