pub mod bcg;
pub mod factors;
pub mod porter;
pub mod space;

use serde::{Deserialize, Serialize};

pub use bcg::parse_bcg_data;
pub use factors::{parse_efe_data, parse_ife_data};
pub use porter::parse_porter_data;
pub use space::parse_space_data;

/// IFE/EFE line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedFactor {
    pub factor: String,
    pub weight: f64,
    pub rating: i64,
}

/// SPACE line item; the sign follows the dimension, not the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFactor {
    pub factor: String,
    pub score: f64,
}

/// BCG business unit: market growth in percent, relative market share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessUnit {
    pub name: String,
    pub growth: f64,
    pub share: f64,
}

/// Porter line item rated 1..=5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedFactor {
    pub factor: String,
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfeData {
    pub strengths: Vec<WeightedFactor>,
    pub weaknesses: Vec<WeightedFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfeData {
    pub opportunities: Vec<WeightedFactor>,
    pub threats: Vec<WeightedFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceData {
    pub fs: Vec<ScoredFactor>,
    pub ca: Vec<ScoredFactor>,
    pub es: Vec<ScoredFactor>,
    pub is: Vec<ScoredFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BcgData {
    pub units: Vec<BusinessUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PorterData {
    pub rivalry: Vec<RatedFactor>,
    pub new_entrants: Vec<RatedFactor>,
    pub substitutes: Vec<RatedFactor>,
    pub buyers: Vec<RatedFactor>,
    pub suppliers: Vec<RatedFactor>,
}

impl PorterData {
    /// Forces in canonical order with their display names.
    pub fn forces(&self) -> [(&'static str, &[RatedFactor]); 5] {
        [
            ("Competitive Rivalry", self.rivalry.as_slice()),
            ("Threat of New Entrants", self.new_entrants.as_slice()),
            ("Threat of Substitutes", self.substitutes.as_slice()),
            ("Bargaining Power of Buyers", self.buyers.as_slice()),
            ("Bargaining Power of Suppliers", self.suppliers.as_slice()),
        ]
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porter_serialises_camel_case() {
        let data = PorterData {
            rivalry: vec![],
            new_entrants: vec![RatedFactor {
                factor: "Capital".into(),
                rating: 4,
            }],
            substitutes: vec![],
            buyers: vec![],
            suppliers: vec![],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["newEntrants"][0]["rating"], 4);
        assert!(json.get("new_entrants").is_none());
    }

    #[test]
    fn forces_in_canonical_order() {
        let data = parse_porter_data("## Buyer Power\n| Factor | Rating |\n|---|---|\n| Price | 4 |")
            .unwrap();
        let names: Vec<&str> = data.forces().iter().map(|(n, _)| *n).collect();
        assert_eq!(names[0], "Competitive Rivalry");
        assert_eq!(data.forces()[3].1[0].factor, "Price");
    }
}
