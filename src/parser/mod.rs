pub mod cells;
pub mod extract;
pub mod sections;
pub mod tables;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use extract::{BcgData, EfeData, IfeData, PorterData, SpaceData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    Ife,
    Efe,
    Space,
    Bcg,
    Porter,
}

impl FrameworkKind {
    pub const ALL: [FrameworkKind; 5] = [
        FrameworkKind::Ife,
        FrameworkKind::Efe,
        FrameworkKind::Space,
        FrameworkKind::Bcg,
        FrameworkKind::Porter,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FrameworkKind::Ife => "ife",
            FrameworkKind::Efe => "efe",
            FrameworkKind::Space => "space",
            FrameworkKind::Bcg => "bcg",
            FrameworkKind::Porter => "porter",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FrameworkKind::Ife => "IFE Matrix",
            FrameworkKind::Efe => "EFE Matrix",
            FrameworkKind::Space => "SPACE Matrix",
            FrameworkKind::Bcg => "BCG Matrix",
            FrameworkKind::Porter => "Porter's Five Forces",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FrameworkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        FrameworkKind::ALL
            .into_iter()
            .find(|k| k.key() == key)
            .ok_or_else(|| Error::UnknownFramework(s.to_string()))
    }
}

/// Worksheet recovered from one AI response. Serialises as
/// `{"kind": "ife", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum FrameworkResult {
    Ife(IfeData),
    Efe(EfeData),
    Space(SpaceData),
    Bcg(BcgData),
    Porter(PorterData),
}

impl FrameworkResult {
    pub fn kind(&self) -> FrameworkKind {
        match self {
            FrameworkResult::Ife(_) => FrameworkKind::Ife,
            FrameworkResult::Efe(_) => FrameworkKind::Efe,
            FrameworkResult::Space(_) => FrameworkKind::Space,
            FrameworkResult::Bcg(_) => FrameworkKind::Bcg,
            FrameworkResult::Porter(_) => FrameworkKind::Porter,
        }
    }
}

/// Parse `text` for the framework named by `key` ("ife", "efe", "space",
/// "bcg", "porter"). `None` for blank text, unknown keys, or when the text
/// holds no usable data for that framework.
pub fn parse_framework_data(text: &str, key: &str) -> Option<FrameworkResult> {
    let kind = key.parse::<FrameworkKind>().ok()?;
    parse(text, kind)
}

/// Typed form of [`parse_framework_data`].
pub fn parse(text: &str, kind: FrameworkKind) -> Option<FrameworkResult> {
    if text.trim().is_empty() {
        return None;
    }

    let result = match kind {
        FrameworkKind::Ife => extract::parse_ife_data(text).map(FrameworkResult::Ife),
        FrameworkKind::Efe => extract::parse_efe_data(text).map(FrameworkResult::Efe),
        FrameworkKind::Space => extract::parse_space_data(text).map(FrameworkResult::Space),
        FrameworkKind::Bcg => extract::parse_bcg_data(text).map(FrameworkResult::Bcg),
        FrameworkKind::Porter => extract::parse_porter_data(text).map(FrameworkResult::Porter),
    };
    debug!(framework = kind.key(), found = result.is_some(), "parsed framework data");
    result
}

/// Run every extractor over `text` in parallel and keep those that found
/// data, in canonical framework order.
pub fn probe_all(text: &str) -> Vec<FrameworkResult> {
    FrameworkKind::ALL
        .par_iter()
        .filter_map(|kind| parse(text, *kind))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const IFE_MD: &str = "### Strengths\n| Factor | Weight | Rating |\n|--------|--------|--------|\n| Strong brand | 0.15 | 4 |\n### Weaknesses\n| Factor | Weight | Rating |\n|--------|--------|--------|\n| Limited R&D | 0.12 | 1 |";

    #[test]
    fn dispatch_by_key() {
        let r = parse_framework_data(IFE_MD, "ife").unwrap();
        assert_eq!(r.kind(), FrameworkKind::Ife);
        assert!(parse_framework_data(IFE_MD, " IFE ").is_some());
    }

    #[test]
    fn blank_and_unknown() {
        assert!(parse_framework_data("", "ife").is_none());
        assert!(parse_framework_data("  \n ", "bcg").is_none());
        assert!(parse_framework_data(IFE_MD, "swot").is_none());
        assert!(parse_framework_data("no tables or headings here", "ife").is_none());
    }

    #[test]
    fn key_round_trip() {
        for kind in FrameworkKind::ALL {
            assert_eq!(kind.key().parse::<FrameworkKind>().unwrap(), kind);
        }
        assert!(matches!(
            "pestel".parse::<FrameworkKind>(),
            Err(Error::UnknownFramework(k)) if k == "pestel"
        ));
    }

    #[test]
    fn tagged_json_shape() {
        let r = parse(IFE_MD, FrameworkKind::Ife).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["kind"], "ife");
        assert_eq!(json["data"]["strengths"][0]["factor"], "Strong brand");
        let back: FrameworkResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn idempotent() {
        for kind in FrameworkKind::ALL {
            assert_eq!(parse(IFE_MD, kind), parse(IFE_MD, kind));
        }
    }

    #[test]
    fn probe_keeps_canonical_order() {
        let md = format!(
            "{}\n\n## Competitive Rivalry\n| Factor | Rating |\n|---|---|\n| Price wars | 4 |",
            IFE_MD
        );
        let kinds: Vec<FrameworkKind> = probe_all(&md).iter().map(|r| r.kind()).collect();
        assert_eq!(kinds.first(), Some(&FrameworkKind::Ife));
        assert_eq!(kinds.last(), Some(&FrameworkKind::Porter));
    }
}
