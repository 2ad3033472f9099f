//! Weighted-factor worksheets: IFE (strengths/weaknesses) and EFE
//! (opportunities/threats). Both share one extractor driven by a
//! [`Vocabulary`]; only keywords, column names and rating ranges differ.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{EfeData, IfeData, WeightedFactor};
use crate::parser::cells::{find_col, is_summary_row, parse_num, parse_or};
use crate::parser::sections::{split_sections, Section};
use crate::parser::tables::{extract_tables, Table};

const DEFAULT_WEIGHT: f64 = 0.1;

static IFE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bIFE\b|internal\s+factor\s+evaluation").unwrap());
static EFE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bEFE\b|external\s+factor\s+evaluation").unwrap());
static IFE_FOREIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(efe|external factor|space|bcg|porter|five forces|growth[\s-]share)\b").unwrap()
});
static EFE_FOREIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ife|internal factor|space|bcg|porter|five forces|growth[\s-]share)\b").unwrap()
});

/// One side of a weighted-factor worksheet.
struct Category {
    label: &'static str,
    keywords: &'static [&'static str],
    default_rating: i64,
    min_rating: i64,
    max_rating: i64,
}

impl Category {
    fn rating(&self, cell: &str) -> i64 {
        let raw = parse_or(cell, self.default_rating as f64).trunc() as i64;
        raw.clamp(self.min_rating, self.max_rating)
    }

    fn placeholder(&self) -> WeightedFactor {
        WeightedFactor {
            factor: String::new(),
            weight: DEFAULT_WEIGHT,
            rating: self.default_rating,
        }
    }

    fn named_in(&self, heading: &str) -> bool {
        self.keywords.iter().any(|kw| heading.contains(kw))
    }
}

struct Vocabulary {
    name: &'static str,
    name_re: &'static LazyLock<Regex>,
    foreign_re: &'static LazyLock<Regex>,
    positive: Category,
    negative: Category,
    factor_patterns: &'static [&'static str],
    rating_patterns: &'static [&'static str],
}

static IFE: Vocabulary = Vocabulary {
    name: "ife",
    name_re: &IFE_NAME_RE,
    foreign_re: &IFE_FOREIGN_RE,
    positive: Category {
        label: "strengths",
        keywords: &["strength"],
        default_rating: 3,
        min_rating: 3,
        max_rating: 4,
    },
    negative: Category {
        label: "weaknesses",
        keywords: &["weakness"],
        default_rating: 2,
        min_rating: 1,
        max_rating: 2,
    },
    factor_patterns: &[
        "factor",
        "key factor",
        "internal factor",
        "critical",
        "strength",
        "weakness",
        "description",
        "item",
        "element",
    ],
    rating_patterns: &["rating", "rate", "score"],
};

static EFE: Vocabulary = Vocabulary {
    name: "efe",
    name_re: &EFE_NAME_RE,
    foreign_re: &EFE_FOREIGN_RE,
    positive: Category {
        label: "opportunities",
        keywords: &["opportunit"],
        default_rating: 3,
        min_rating: 1,
        max_rating: 4,
    },
    negative: Category {
        label: "threats",
        keywords: &["threat"],
        default_rating: 2,
        min_rating: 1,
        max_rating: 4,
    },
    factor_patterns: &[
        "factor",
        "key factor",
        "external factor",
        "critical",
        "opportunity",
        "threat",
        "description",
        "item",
        "element",
    ],
    rating_patterns: &["rating", "rate", "response", "score"],
};

/// Column layout of one weighted-factor table.
struct Columns {
    factor: Option<usize>,
    weight: Option<usize>,
    rating: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String], vocab: &Vocabulary) -> Self {
        let rating = find_col(headers, vocab.rating_patterns);
        // Blank out the rating column and any "weighted ..." header so a
        // weighted-score column can never be read as the weight.
        let weight_candidates: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if Some(i) == rating || h.contains("weighted") {
                    String::new()
                } else {
                    h.clone()
                }
            })
            .collect();
        let weight = find_col(&weight_candidates, &["weight"]);
        let factor = find_col(headers, vocab.factor_patterns);
        Columns {
            factor,
            weight,
            rating,
        }
    }

    fn complete(&self) -> bool {
        self.factor.is_some() && self.weight.is_some() && self.rating.is_some()
    }
}

/// Which worksheet side a section's tables belong to.
enum Target {
    Positive,
    Negative,
    /// Heading names both sides; rows are split by their own rating.
    Both,
}

pub fn parse_ife_data(text: &str) -> Option<IfeData> {
    let (strengths, weaknesses) = parse_weighted(text, &IFE)?;
    Some(IfeData {
        strengths,
        weaknesses,
    })
}

pub fn parse_efe_data(text: &str) -> Option<EfeData> {
    let (opportunities, threats) = parse_weighted(text, &EFE)?;
    Some(EfeData {
        opportunities,
        threats,
    })
}

fn parse_weighted(
    text: &str,
    vocab: &Vocabulary,
) -> Option<(Vec<WeightedFactor>, Vec<WeightedFactor>)> {
    let sections = split_sections(text);
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for section in &sections {
        let heading = section.heading_lower();
        let target = match (vocab.positive.named_in(&heading), vocab.negative.named_in(&heading)) {
            (true, true) => Target::Both,
            (true, false) => Target::Positive,
            (false, true) => Target::Negative,
            (false, false) => continue,
        };

        for table in extract_tables(&section.content) {
            let cols = Columns::resolve(&table.headers, vocab);
            match target {
                Target::Positive => {
                    positive.extend(rows_for(&table, &cols, &vocab.positive));
                }
                Target::Negative => {
                    negative.extend(rows_for(&table, &cols, &vocab.negative));
                }
                Target::Both => split_by_rating(&table, &cols, vocab, &mut positive, &mut negative),
            }
        }
    }

    if positive.is_empty() && negative.is_empty() && vocab.name_re.is_match(text) {
        debug!(framework = vocab.name, "no categorised sections, trying combined tables");
        for section in sections.iter().filter(|s| !names_foreign_framework(s, vocab)) {
            for table in extract_tables(&section.content) {
                let cols = Columns::resolve(&table.headers, vocab);
                if cols.complete() {
                    split_by_rating(&table, &cols, vocab, &mut positive, &mut negative);
                }
            }
        }
    }

    if positive.is_empty() && negative.is_empty() {
        return None;
    }

    for (rows, category) in [(&mut positive, &vocab.positive), (&mut negative, &vocab.negative)] {
        if rows.is_empty() {
            debug!(framework = vocab.name, category = category.label, "no rows, adding placeholder");
            rows.push(category.placeholder());
        }
    }

    Some((positive, negative))
}

fn names_foreign_framework(section: &Section, vocab: &Vocabulary) -> bool {
    vocab.foreign_re.is_match(&section.heading)
}

/// Rows of `table` as factors of a single category.
fn rows_for(table: &Table, cols: &Columns, category: &Category) -> Vec<WeightedFactor> {
    let factor_col = cols.factor.or(Some(0));
    table
        .data
        .iter()
        .filter_map(|row| {
            let factor = factor_label(row, factor_col)?;
            Some(WeightedFactor {
                factor,
                weight: parse_or(Table::cell(row, cols.weight), DEFAULT_WEIGHT),
                rating: category.rating(Table::cell(row, cols.rating)),
            })
        })
        .collect()
}

/// Classify each row by its own rating: 3 and above goes to the positive side.
fn split_by_rating(
    table: &Table,
    cols: &Columns,
    vocab: &Vocabulary,
    positive: &mut Vec<WeightedFactor>,
    negative: &mut Vec<WeightedFactor>,
) {
    let factor_col = cols.factor.or(Some(0));
    for row in &table.data {
        let Some(factor) = factor_label(row, factor_col) else {
            continue;
        };
        let rating_cell = Table::cell(row, cols.rating);
        let (category, out) = if parse_num(rating_cell) >= 3.0 {
            (&vocab.positive, &mut *positive)
        } else {
            (&vocab.negative, &mut *negative)
        };
        out.push(WeightedFactor {
            factor,
            weight: parse_or(Table::cell(row, cols.weight), DEFAULT_WEIGHT),
            rating: category.rating(rating_cell),
        });
    }
}

fn factor_label(row: &[String], col: Option<usize>) -> Option<String> {
    let label = Table::cell(row, col).trim();
    if label.is_empty() || is_summary_row(label) {
        return None;
    }
    Some(label.to_string())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wf(factor: &str, weight: f64, rating: i64) -> WeightedFactor {
        WeightedFactor {
            factor: factor.to_string(),
            weight,
            rating,
        }
    }

    #[test]
    fn literal_ife_scenario() {
        let md = "### Strengths\n| Factor | Weight | Rating |\n|--------|--------|--------|\n| Strong brand | 0.15 | 4 |\n### Weaknesses\n| Factor | Weight | Rating |\n|--------|--------|--------|\n| Limited R&D | 0.12 | 1 |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.strengths, vec![wf("Strong brand", 0.15, 4)]);
        assert_eq!(data.weaknesses, vec![wf("Limited R&D", 0.12, 1)]);
    }

    #[test]
    fn total_row_excluded() {
        let md = "## Strengths\n| Factor | Weight | Rating | Weighted Score |\n|---|---|---|---|\n| Brand | 0.5 | 4 | 2.0 |\n| Total | 1.00 | | 2.55 |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.strengths, vec![wf("Brand", 0.5, 4)]);
    }

    #[test]
    fn ife_ratings_clamped_per_side() {
        let md = "## Strengths\n| Factor | Weight | Rating |\n|---|---|---|\n| Brand | 0.2 | 1 |\n| Team | 0.2 | 9 |\n## Weaknesses\n| Factor | Weight | Rating |\n|---|---|---|\n| Debt | 0.2 | 4 |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.strengths[0].rating, 3);
        assert_eq!(data.strengths[1].rating, 4);
        assert_eq!(data.weaknesses[0].rating, 2);
    }

    #[test]
    fn efe_clamps_full_range() {
        let md = "## Opportunities\n| Factor | Weight | Rating |\n|---|---|---|\n| Export | 0.2 | 1 |\n## Threats\n| Factor | Weight | Rating |\n|---|---|---|\n| Tariffs | 0.2 | 4 |\n| Rivals | 0.1 | 7 |";
        let data = parse_efe_data(md).unwrap();
        assert_eq!(data.opportunities, vec![wf("Export", 0.2, 1)]);
        assert_eq!(data.threats, vec![wf("Tariffs", 0.2, 4), wf("Rivals", 0.1, 4)]);
    }

    #[test]
    fn missing_weight_and_rating_use_defaults() {
        let md = "## Weaknesses\n| Weakness | Notes |\n|---|---|\n| Old plant | costly |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.weaknesses, vec![wf("Old plant", 0.1, 2)]);
        // Strengths side gets a placeholder row.
        assert_eq!(data.strengths, vec![wf("", 0.1, 3)]);
    }

    #[test]
    fn weighted_score_never_read_as_weight() {
        let md = "## Strengths\n| Factor | Weighted Score | Rating |\n|---|---|---|\n| Brand | 0.6 | 4 |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.strengths, vec![wf("Brand", 0.1, 4)]);
    }

    #[test]
    fn efe_response_column() {
        let md = "## Threats\n| External Factor | Weight | Response |\n|---|---|---|\n| New regulation | 0.1 | 2 |";
        let data = parse_efe_data(md).unwrap();
        assert_eq!(data.threats, vec![wf("New regulation", 0.1, 2)]);
    }

    #[test]
    fn combined_fallback_requires_framework_name() {
        let table = "| Factor | Weight | Rating |\n|---|---|---|\n| Brand | 0.3 | 4 |\n| Debt | 0.2 | 1 |";
        assert!(parse_ife_data(table).is_none());

        let md = format!("Here is your IFE Matrix:\n\n{}", table);
        let data = parse_ife_data(&md).unwrap();
        assert_eq!(data.strengths, vec![wf("Brand", 0.3, 4)]);
        assert_eq!(data.weaknesses, vec![wf("Debt", 0.2, 1)]);
    }

    #[test]
    fn combined_fallback_needs_all_three_columns() {
        let md = "Internal Factor Evaluation\n| Factor | Rating |\n|---|---|\n| Brand | 4 |";
        assert!(parse_ife_data(md).is_none());
    }

    #[test]
    fn combined_fallback_skips_other_frameworks() {
        let md = "IFE summary below.\n## EFE Matrix\n| Factor | Weight | Rating |\n|---|---|---|\n| Export | 0.3 | 4 |";
        assert!(parse_ife_data(md).is_none());
    }

    #[test]
    fn efe_fallback_splits_on_rating_three() {
        // Known quirk: EFE ratings measure response quality, yet the combined
        // fallback still splits on rating >= 3.
        let md = "EFE Matrix\n| Factor | Weight | Rating |\n|---|---|---|\n| Cloud demand | 0.3 | 3 |\n| Tariffs | 0.2 | 2 |";
        let data = parse_efe_data(md).unwrap();
        assert_eq!(data.opportunities, vec![wf("Cloud demand", 0.3, 3)]);
        assert_eq!(data.threats, vec![wf("Tariffs", 0.2, 2)]);
    }

    #[test]
    fn heading_naming_both_sides_splits_by_rating() {
        let md = "## Strengths and Weaknesses\n| Factor | Weight | Rating |\n|---|---|---|\n| Brand | 0.3 | 4 |\n| Debt | 0.2 | 1 |";
        let data = parse_ife_data(md).unwrap();
        assert_eq!(data.strengths.len(), 1);
        assert_eq!(data.weaknesses.len(), 1);
    }

    #[test]
    fn no_tables_is_none() {
        assert!(parse_ife_data("## Strengths\nJust prose.").is_none());
        assert!(parse_efe_data("no tables or headings here").is_none());
    }
}
