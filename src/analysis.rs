//! Worksheet scoring: the totals, averages and classifications a strategist
//! reads off each framework once its rows are filled in.

use std::fmt::Write as _;

use itertools::Itertools;
use serde::Serialize;

use crate::parser::extract::{
    BcgData, BusinessUnit, EfeData, IfeData, PorterData, RatedFactor, ScoredFactor, SpaceData,
    WeightedFactor,
};
use crate::parser::FrameworkResult;

/// Totals of an IFE or EFE worksheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedSummary {
    pub total_weight: f64,
    pub total_score: f64,
    /// Weights should sum to 1.0; set when they are off by more than 0.01.
    pub weight_warning: bool,
    pub interpretation: &'static str,
}

fn weighted_summary(rows: &[&WeightedFactor], bands: [&'static str; 4]) -> WeightedSummary {
    let total_weight: f64 = rows.iter().map(|r| r.weight).sum();
    let total_score: f64 = rows.iter().map(|r| r.weight * r.rating as f64).sum();
    let interpretation = if total_score >= 3.0 {
        bands[0]
    } else if total_score >= 2.5 {
        bands[1]
    } else if total_score >= 2.0 {
        bands[2]
    } else {
        bands[3]
    };
    WeightedSummary {
        total_weight,
        total_score,
        weight_warning: (total_weight - 1.0).abs() > 0.01,
        interpretation,
    }
}

pub fn ife_summary(data: &IfeData) -> WeightedSummary {
    let rows: Vec<&WeightedFactor> = data.strengths.iter().chain(&data.weaknesses).collect();
    weighted_summary(
        &rows,
        ["Major Strength", "Above Average", "Below Average", "Major Weakness"],
    )
}

pub fn efe_summary(data: &EfeData) -> WeightedSummary {
    let rows: Vec<&WeightedFactor> = data.opportunities.iter().chain(&data.threats).collect();
    weighted_summary(
        &rows,
        ["Superior Response", "Above Average", "Below Average", "Poor Response"],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpaceQuadrant {
    Aggressive,
    Conservative,
    Defensive,
    Competitive,
}

impl SpaceQuadrant {
    pub fn advice(self) -> &'static str {
        match self {
            SpaceQuadrant::Aggressive => "Use internal strengths to exploit opportunities, overcome weaknesses and avoid threats.",
            SpaceQuadrant::Conservative => "Stay close to basic competencies and avoid excessive risk; focus on market penetration and product development.",
            SpaceQuadrant::Defensive => "Rectify internal weaknesses and avoid external threats; consider retrenchment or divestiture.",
            SpaceQuadrant::Competitive => "Attractive industry, competitive disadvantage; consider integration and market penetration.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceSummary {
    pub fs_avg: f64,
    pub ca_avg: f64,
    pub es_avg: f64,
    pub is_avg: f64,
    /// CA + IS.
    pub x_axis: f64,
    /// FS + ES.
    pub y_axis: f64,
    pub quadrant: SpaceQuadrant,
}

fn average(scores: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = scores.len();
    if n == 0 {
        return 0.0;
    }
    scores.sum::<f64>() / n as f64
}

fn space_avg(rows: &[ScoredFactor]) -> f64 {
    average(rows.iter().map(|r| r.score))
}

pub fn space_summary(data: &SpaceData) -> SpaceSummary {
    let fs_avg = space_avg(&data.fs);
    let ca_avg = space_avg(&data.ca);
    let es_avg = space_avg(&data.es);
    let is_avg = space_avg(&data.is);
    let x_axis = ca_avg + is_avg;
    let y_axis = fs_avg + es_avg;
    let quadrant = match (x_axis >= 0.0, y_axis >= 0.0) {
        (true, true) => SpaceQuadrant::Aggressive,
        (false, true) => SpaceQuadrant::Conservative,
        (false, false) => SpaceQuadrant::Defensive,
        (true, false) => SpaceQuadrant::Competitive,
    };
    SpaceSummary {
        fs_avg,
        ca_avg,
        es_avg,
        is_avg,
        x_axis,
        y_axis,
        quadrant,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BcgQuadrant {
    Star,
    QuestionMark,
    CashCow,
    Dog,
}

impl BcgQuadrant {
    pub fn label(self) -> &'static str {
        match self {
            BcgQuadrant::Star => "Star",
            BcgQuadrant::QuestionMark => "Question Mark",
            BcgQuadrant::CashCow => "Cash Cow",
            BcgQuadrant::Dog => "Dog",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            BcgQuadrant::Star => "invest to maintain leadership",
            BcgQuadrant::QuestionMark => "decide to invest or divest",
            BcgQuadrant::CashCow => "harvest profits",
            BcgQuadrant::Dog => "consider divestiture",
        }
    }
}

/// High growth means 10% or more; high share means relative share of 1.0 or more.
pub fn classify_unit(unit: &BusinessUnit) -> BcgQuadrant {
    match (unit.growth >= 10.0, unit.share >= 1.0) {
        (true, true) => BcgQuadrant::Star,
        (true, false) => BcgQuadrant::QuestionMark,
        (false, true) => BcgQuadrant::CashCow,
        (false, false) => BcgQuadrant::Dog,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForceSummary {
    pub force: &'static str,
    pub average: f64,
    pub threat_level: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PorterSummary {
    pub forces: Vec<ForceSummary>,
    pub overall: f64,
    pub interpretation: &'static str,
}

pub fn threat_level(avg: f64) -> &'static str {
    if avg >= 4.0 {
        "Very High"
    } else if avg >= 3.0 {
        "High"
    } else if avg >= 2.0 {
        "Moderate"
    } else {
        "Low"
    }
}

fn force_avg(rows: &[RatedFactor]) -> f64 {
    average(rows.iter().map(|r| r.rating as f64))
}

pub fn porter_summary(data: &PorterData) -> PorterSummary {
    let forces: Vec<ForceSummary> = data
        .forces()
        .into_iter()
        .map(|(force, rows)| {
            let average = force_avg(rows);
            ForceSummary {
                force,
                average,
                threat_level: threat_level(average),
            }
        })
        .collect();
    let overall = average(forces.iter().map(|f| f.average));
    let interpretation = if overall >= 3.5 {
        "Highly Competitive: difficult industry environment"
    } else if overall >= 2.5 {
        "Moderately Competitive: manageable challenges"
    } else {
        "Low Competition: favorable industry environment"
    };
    PorterSummary {
        forces,
        overall,
        interpretation,
    }
}

/// Markdown report of a parsed worksheet and its scores.
pub fn render_markdown(result: &FrameworkResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}\n", result.kind().display_name());

    match result {
        FrameworkResult::Ife(data) => {
            push_weighted_table(&mut out, "Strengths", &data.strengths);
            push_weighted_table(&mut out, "Weaknesses", &data.weaknesses);
            push_weighted_summary(&mut out, &ife_summary(data));
        }
        FrameworkResult::Efe(data) => {
            push_weighted_table(&mut out, "Opportunities", &data.opportunities);
            push_weighted_table(&mut out, "Threats", &data.threats);
            push_weighted_summary(&mut out, &efe_summary(data));
        }
        FrameworkResult::Space(data) => push_space(&mut out, data),
        FrameworkResult::Bcg(data) => push_bcg(&mut out, data),
        FrameworkResult::Porter(data) => push_porter(&mut out, data),
    }

    out
}

fn push_weighted_table(out: &mut String, title: &str, rows: &[WeightedFactor]) {
    let _ = writeln!(out, "### {}\n", title);
    out.push_str("| Factor | Weight | Rating | Score |\n|---|---|---|---|\n");
    for r in rows {
        let _ = writeln!(
            out,
            "| {} | {:.2} | {} | {:.2} |",
            r.factor,
            r.weight,
            r.rating,
            r.weight * r.rating as f64
        );
    }
    out.push('\n');
}

fn push_weighted_summary(out: &mut String, s: &WeightedSummary) {
    let _ = writeln!(
        out,
        "- Total weight: {:.2}{}\n- Total weighted score: {:.2} ({})",
        s.total_weight,
        if s.weight_warning { " (weights should sum to 1.00)" } else { "" },
        s.total_score,
        s.interpretation
    );
}

fn push_space(out: &mut String, data: &SpaceData) {
    for (title, rows) in [
        ("Financial Strength", &data.fs),
        ("Competitive Advantage", &data.ca),
        ("Environmental Stability", &data.es),
        ("Industry Strength", &data.is),
    ] {
        let factors = rows
            .iter()
            .map(|r| format!("{} ({})", r.factor, r.score))
            .join(", ");
        let _ = writeln!(out, "- {}: {}", title, factors);
    }
    let s = space_summary(data);
    let _ = writeln!(
        out,
        "\n- X axis (CA + IS): {:.2}\n- Y axis (FS + ES): {:.2}\n- Posture: {:?}: {}",
        s.x_axis,
        s.y_axis,
        s.quadrant,
        s.quadrant.advice()
    );
}

fn push_bcg(out: &mut String, data: &BcgData) {
    out.push_str("| Unit | Growth % | Relative Share | Quadrant |\n|---|---|---|---|\n");
    for u in &data.units {
        let q = classify_unit(u);
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} ({}) |",
            u.name,
            u.growth,
            u.share,
            q.label(),
            q.advice()
        );
    }
}

fn push_porter(out: &mut String, data: &PorterData) {
    let summary = porter_summary(data);
    for ((_, rows), f) in data.forces().into_iter().zip(&summary.forces) {
        let factors = rows
            .iter()
            .map(|r| format!("{} ({})", r.factor, r.rating))
            .join(", ");
        let _ = writeln!(
            out,
            "- {}: {:.1} {}: {}",
            f.force, f.average, f.threat_level, factors
        );
    }
    let _ = writeln!(
        out,
        "\n- Overall: {:.2} ({})",
        summary.overall, summary.interpretation
    );
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn wf(weight: f64, rating: i64) -> WeightedFactor {
        WeightedFactor {
            factor: "f".into(),
            weight,
            rating,
        }
    }

    #[test]
    fn ife_totals_and_bands() {
        let data = IfeData {
            strengths: vec![wf(0.3, 4), wf(0.2, 3)],
            weaknesses: vec![wf(0.3, 2), wf(0.2, 1)],
        };
        let s = ife_summary(&data);
        assert!((s.total_weight - 1.0).abs() < 1e-9);
        assert!((s.total_score - 2.6).abs() < 1e-9);
        assert!(!s.weight_warning);
        assert_eq!(s.interpretation, "Above Average");
    }

    #[test]
    fn efe_weight_warning() {
        let data = EfeData {
            opportunities: vec![wf(0.5, 4)],
            threats: vec![wf(0.1, 1)],
        };
        let s = efe_summary(&data);
        assert!(s.weight_warning);
        assert_eq!(s.interpretation, "Below Average");
    }

    #[test]
    fn space_quadrants() {
        let sf = |score: f64| vec![ScoredFactor { factor: "f".into(), score }];
        let data = SpaceData {
            fs: sf(4.0),
            ca: sf(-2.0),
            es: sf(-3.0),
            is: sf(5.0),
        };
        let s = space_summary(&data);
        assert_eq!(s.x_axis, 3.0);
        assert_eq!(s.y_axis, 1.0);
        assert_eq!(s.quadrant, SpaceQuadrant::Aggressive);

        let weak = SpaceData {
            fs: sf(1.0),
            ca: sf(-5.0),
            es: sf(-4.0),
            is: sf(2.0),
        };
        assert_eq!(space_summary(&weak).quadrant, SpaceQuadrant::Defensive);
    }

    #[test]
    fn bcg_classification_boundaries() {
        let u = |growth, share| BusinessUnit {
            name: "u".into(),
            growth,
            share,
        };
        assert_eq!(classify_unit(&u(10.0, 1.0)), BcgQuadrant::Star);
        assert_eq!(classify_unit(&u(15.0, 0.4)), BcgQuadrant::QuestionMark);
        assert_eq!(classify_unit(&u(5.0, 2.0)), BcgQuadrant::CashCow);
        assert_eq!(classify_unit(&u(9.9, 0.99)), BcgQuadrant::Dog);
    }

    #[test]
    fn porter_levels() {
        let rf = |rating| vec![RatedFactor { factor: "f".into(), rating }];
        let data = PorterData {
            rivalry: rf(5),
            new_entrants: rf(4),
            substitutes: rf(3),
            buyers: rf(2),
            suppliers: rf(1),
        };
        let s = porter_summary(&data);
        assert_eq!(s.forces[0].threat_level, "Very High");
        assert_eq!(s.forces[4].threat_level, "Low");
        assert_eq!(s.overall, 3.0);
        assert!(s.interpretation.starts_with("Moderately Competitive"));
    }

    #[test]
    fn markdown_report_mentions_rows_and_summary() {
        let result = FrameworkResult::Bcg(BcgData {
            units: vec![BusinessUnit {
                name: "Widget A".into(),
                growth: 15.0,
                share: 2.0,
            }],
        });
        let md = render_markdown(&result);
        assert!(md.starts_with("## BCG Matrix"));
        assert!(md.contains("| Widget A | 15 | 2 | Star (invest to maintain leadership) |"));
    }
}
