use tracing::debug;

use super::{PorterData, RatedFactor};
use crate::parser::cells::{find_col, parse_num};
use crate::parser::sections::split_sections;
use crate::parser::tables::{extract_tables, Table};

const FACTOR_PATTERNS: &[&str] = &["factor", "variable", "criterion", "element", "driver"];
const RATING_PATTERNS: &[&str] = &["rating", "score", "level", "intensity"];
const FORCE_COLUMN_PATTERNS: &[&str] = &["force"];
const FLAT_FACTOR_PATTERNS: &[&str] = &["key factors", "key factor", "factor", "driver"];

const DEFAULT_RATING: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Force {
    Rivalry,
    NewEntrants,
    Substitutes,
    Buyers,
    Suppliers,
}

const FORCES: [Force; 5] = [
    Force::Rivalry,
    Force::NewEntrants,
    Force::Substitutes,
    Force::Buyers,
    Force::Suppliers,
];

impl Force {
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Force::Rivalry => &[
                "rivalr",
                "competitive rivalry",
                "competition among",
                "industry rivalry",
            ],
            Force::NewEntrants => &["new entrant", "entry", "entrants"],
            Force::Substitutes => &["substitut"],
            Force::Buyers => &["buyer", "customer"],
            Force::Suppliers => &["supplier"],
        }
    }

    fn default_factor(self) -> &'static str {
        match self {
            Force::Rivalry => "Competition",
            Force::NewEntrants => "Entry barriers",
            Force::Substitutes => "Substitutes",
            Force::Buyers => "Buyer power",
            Force::Suppliers => "Supplier power",
        }
    }

    fn index(self) -> usize {
        match self {
            Force::Rivalry => 0,
            Force::NewEntrants => 1,
            Force::Substitutes => 2,
            Force::Buyers => 3,
            Force::Suppliers => 4,
        }
    }

    fn classify(text: &str) -> Option<Force> {
        let lower = text.to_lowercase();
        FORCES
            .into_iter()
            .find(|f| f.keywords().iter().any(|kw| lower.contains(kw)))
    }
}

/// Rating on the 1..=5 intensity scale. Worded levels ("High", "very low")
/// map onto the scale when the cell holds no number.
fn rating(cell: &str) -> i64 {
    let n = parse_num(cell);
    let raw = if n.is_finite() {
        n.trunc() as i64
    } else {
        worded_level(cell).unwrap_or(DEFAULT_RATING)
    };
    raw.clamp(1, 5)
}

fn worded_level(cell: &str) -> Option<i64> {
    let lower = cell.to_lowercase();
    if lower.contains("very high") {
        Some(5)
    } else if lower.contains("very low") {
        Some(1)
    } else if lower.contains("high") {
        Some(4)
    } else if lower.contains("low") {
        Some(2)
    } else if lower.contains("moderate") || lower.contains("medium") {
        Some(3)
    } else {
        None
    }
}

pub fn parse_porter_data(text: &str) -> Option<PorterData> {
    let mut forces: [Vec<RatedFactor>; 5] = Default::default();

    for section in split_sections(text) {
        let Some(force) = Force::classify(&section.heading) else {
            continue;
        };
        for table in extract_tables(&section.content) {
            forces[force.index()].extend(section_rows(&table));
        }
    }

    if forces.iter().all(|f| f.is_empty()) {
        debug!("no force sections, scanning flat tables");
        for table in extract_tables(text) {
            flat_rows(&table, &mut forces);
        }
    }

    if forces.iter().all(|f| f.is_empty()) {
        return None;
    }

    for force in FORCES {
        let rows = &mut forces[force.index()];
        if rows.is_empty() {
            rows.push(RatedFactor {
                factor: force.default_factor().to_string(),
                rating: DEFAULT_RATING,
            });
        }
    }

    let [rivalry, new_entrants, substitutes, buyers, suppliers] = forces;
    Some(PorterData {
        rivalry,
        new_entrants,
        substitutes,
        buyers,
        suppliers,
    })
}

fn section_rows(table: &Table) -> Vec<RatedFactor> {
    let factor_col = find_col(&table.headers, FACTOR_PATTERNS).or(Some(0));
    let rating_col = find_col(&table.headers, RATING_PATTERNS).filter(|c| Some(*c) != factor_col);

    table
        .data
        .iter()
        .filter_map(|row| rated(Table::cell(row, factor_col), Table::cell(row, rating_col)))
        .collect()
}

/// Rows of a `Force | Intensity | Key Factors` summary table.
fn flat_rows(table: &Table, forces: &mut [Vec<RatedFactor>; 5]) {
    let Some(force_col) = find_col(&table.headers, FORCE_COLUMN_PATTERNS) else {
        return;
    };
    let rating_col = find_col(&table.headers, RATING_PATTERNS).filter(|c| *c != force_col);
    let factor_col = find_col(&table.headers, FLAT_FACTOR_PATTERNS)
        .filter(|c| *c != force_col && Some(*c) != rating_col);

    for row in &table.data {
        let force_cell = Table::cell(row, Some(force_col));
        let Some(force) = Force::classify(force_cell) else {
            continue;
        };
        let factor = match Table::cell(row, factor_col).trim() {
            "" => force_cell,
            f => f,
        };
        if let Some(r) = rated(factor, Table::cell(row, rating_col)) {
            forces[force.index()].push(r);
        }
    }
}

fn rated(factor: &str, rating_cell: &str) -> Option<RatedFactor> {
    let factor = factor.trim();
    if factor.is_empty() {
        return None;
    }
    Some(RatedFactor {
        factor: factor.to_string(),
        rating: rating(rating_cell),
    })
}

// ── Tests ──
