use super::{BcgData, BusinessUnit};
use crate::parser::cells::{find_col, parse_num};
use crate::parser::tables::{extract_tables, Table};

const NAME_PATTERNS: &[&str] = &[
    "name",
    "product",
    "business unit",
    "unit",
    "brand",
    "division",
    "segment",
];
const GROWTH_PATTERNS: &[&str] = &["market growth", "growth rate", "growth"];
const SHARE_PATTERNS: &[&str] = &["market share", "relative", "share"];
const QUADRANT_PATTERNS: &[&str] = &["quadrant", "category", "classification", "position"];

const DEFAULT_GROWTH: f64 = 10.0;
const DEFAULT_SHARE: f64 = 1.0;

/// Growth and share implied by a quadrant label when the row lacks them.
fn quadrant_defaults(label: &str) -> Option<(f64, f64)> {
    let lower = label.to_lowercase();
    if lower.contains("cash cow") || lower.contains("cow") {
        Some((5.0, 2.0))
    } else if lower.contains("question") || lower.contains("problem child") || lower.contains('?') {
        Some((15.0, 0.4))
    } else if lower.contains("star") {
        Some((15.0, 2.0))
    } else if lower.contains("dog") {
        Some((5.0, 0.4))
    } else {
        None
    }
}

pub fn parse_bcg_data(text: &str) -> Option<BcgData> {
    extract_tables(text)
        .iter()
        .map(units_from)
        .find(|units| !units.is_empty())
        .map(|units| BcgData { units })
}

fn units_from(table: &Table) -> Vec<BusinessUnit> {
    let headers = &table.headers;
    let growth_col = find_col(headers, GROWTH_PATTERNS);
    let share_col = find_col(headers, SHARE_PATTERNS);
    let quadrant_col = find_col(headers, QUADRANT_PATTERNS);
    let name_col = find_col(headers, NAME_PATTERNS).or(Some(0));

    table
        .data
        .iter()
        .filter_map(|row| {
            let name = Table::cell(row, name_col).trim();
            if name.is_empty() {
                return None;
            }

            let growth = parse_num(Table::cell(row, growth_col));
            let share = parse_num(Table::cell(row, share_col));
            let implied = quadrant_defaults(Table::cell(row, quadrant_col));
            if !growth.is_finite() && !share.is_finite() && implied.is_none() {
                return None;
            }

            let (implied_growth, implied_share) = implied.unwrap_or((DEFAULT_GROWTH, DEFAULT_SHARE));
            Some(BusinessUnit {
                name: name.to_string(),
                growth: if growth.is_finite() { growth } else { implied_growth },
                share: if share.is_finite() { share } else { implied_share },
            })
        })
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(name: &str, growth: f64, share: f64) -> BusinessUnit {
        BusinessUnit {
            name: name.to_string(),
            growth,
            share,
        }
    }

    #[test]
    fn literal_bcg_scenario() {
        let md = "| Product | Market Growth | Market Share |\n|---|---|---|\n| Widget A | 15 | 2.0 |\n| Widget B | 5 | 0.5 |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(data.units, vec![unit("Widget A", 15.0, 2.0), unit("Widget B", 5.0, 0.5)]);
    }

    #[test]
    fn quadrant_only_row() {
        let md = "| Name | Quadrant |\n|---|---|\n| X | Cash Cow |\n| Y | Question Mark |\n| Z | ⭐ Star |\n| W | Dog |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(
            data.units,
            vec![
                unit("X", 5.0, 2.0),
                unit("Y", 15.0, 0.4),
                unit("Z", 15.0, 2.0),
                unit("W", 5.0, 0.4),
            ]
        );
    }

    #[test]
    fn quadrant_fills_only_missing_field() {
        let md = "| Business Unit | Growth Rate (%) | Category |\n|---|---|---|\n| Cloud | 22% | Star |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(data.units, vec![unit("Cloud", 22.0, 2.0)]);
    }

    #[test]
    fn plain_defaults_when_no_quadrant() {
        let md = "| Unit | Relative Market Share |\n|---|---|\n| Retail | 0.8x |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(data.units, vec![unit("Retail", 10.0, 0.8)]);
    }

    #[test]
    fn first_usable_table_wins() {
        let md = "| Metric | Value |\n|---|---|\n| Revenue | n/a |\n\n| Product | Growth | Share |\n|---|---|---|\n| A | 12 | 1.5 |\n\n| Product | Growth | Share |\n|---|---|---|\n| B | 3 | 0.2 |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(data.units, vec![unit("A", 12.0, 1.5)]);
    }

    #[test]
    fn rows_without_numbers_or_quadrant_skipped() {
        let md = "| Product | Growth | Share |\n|---|---|---|\n| A | high | big |\n| B | | |";
        assert!(parse_bcg_data(md).is_none());
    }

    #[test]
    fn unit_named_like_a_summary_row_is_kept() {
        let md = "| Product | Growth | Share |\n|---|---|---|\n| Total Gym Pro | 12 | 1.5 |";
        let data = parse_bcg_data(md).unwrap();
        assert_eq!(data.units, vec![unit("Total Gym Pro", 12.0, 1.5)]);
    }
}
