use std::sync::LazyLock;

use regex::Regex;

use crate::parser::FrameworkKind;

static FRAMEWORK_PATTERNS: LazyLock<Vec<(Regex, FrameworkKind)>> = LazyLock::new(|| {
    [
        (r"\bIFE\s+Matrix\b", FrameworkKind::Ife),
        (r"\bInternal\s+Factor\s+Evaluation\b", FrameworkKind::Ife),
        (r"\bEFE\s+Matrix\b", FrameworkKind::Efe),
        (r"\bExternal\s+Factor\s+Evaluation\b", FrameworkKind::Efe),
        (r"\bSPACE\s+Matrix\b", FrameworkKind::Space),
        (r"\bStrategic\s+Position\s+and\s+Action\s+Evaluation\b", FrameworkKind::Space),
        (r"\bBCG\s+Matrix\b", FrameworkKind::Bcg),
        (r"\bBoston\s+Consulting\s+Group\s+Matrix\b", FrameworkKind::Bcg),
        (r"\bGrowth[\s-]+Share\s+Matrix\b", FrameworkKind::Bcg),
        (r"\bPorter'?s?\s+Five\s+Forces\b", FrameworkKind::Porter),
        (r"\bFive\s+Forces\s+(?:Analysis|Model|Framework)\b", FrameworkKind::Porter),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(&format!("(?i){}", pattern)).unwrap(), kind))
    .collect()
});

/// Frameworks mentioned by name in `text`, deduplicated, in canonical order.
pub fn detect_frameworks(text: &str) -> Vec<FrameworkKind> {
    if text.is_empty() {
        return Vec::new();
    }
    FrameworkKind::ALL
        .into_iter()
        .filter(|kind| {
            FRAMEWORK_PATTERNS
                .iter()
                .any(|(re, k)| k == kind && re.is_match(text))
        })
        .collect()
}

// ── Tests ──
