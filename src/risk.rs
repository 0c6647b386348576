use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

/// How loudly a front-end should present a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Alert,
}

impl RiskTier {
    pub fn name(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::High => "High Risk",
            RiskTier::Critical => "Critical Risk",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            RiskTier::Low => Severity::Ok,
            RiskTier::Moderate => Severity::Warning,
            RiskTier::High | RiskTier::Critical => Severity::Alert,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label semantics for the classifier output.
///
/// `Binary` reads the dataset outcome as 0 = low, 1 = high. `FourTier` reads
/// labels 0..=3 as low, moderate, high and critical; on a binary dataset it
/// will only ever report low or moderate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSchema {
    #[default]
    Binary,
    FourTier,
}

const BINARY: &[(u32, RiskTier, &[&str])] = &[
    (0, RiskTier::Low, &["Keep maintaining a healthy lifestyle"]),
    (
        1,
        RiskTier::High,
        &[
            "Maintain a healthy diet",
            "Regular exercise",
            "Avoid smoking and alcohol",
            "Consult a doctor",
        ],
    ),
];

const FOUR_TIER: &[(u32, RiskTier, &[&str])] = &[
    (0, RiskTier::Low, &["Keep maintaining a healthy lifestyle."]),
    (1, RiskTier::Moderate, &["Consider making small lifestyle changes."]),
    (2, RiskTier::High, &["Immediate lifestyle changes recommended."]),
    (3, RiskTier::Critical, &["Seek medical attention immediately!"]),
];

impl RiskSchema {
    fn table(self) -> &'static [(u32, RiskTier, &'static [&'static str])] {
        match self {
            RiskSchema::Binary => BINARY,
            RiskSchema::FourTier => FOUR_TIER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskSchema::Binary => "binary",
            RiskSchema::FourTier => "four_tier",
        }
    }

    /// Look a label up in this schema's table.
    pub fn classify(self, label: u32) -> Result<PredictionResult> {
        self.table()
            .iter()
            .find(|(l, _, _)| *l == label)
            .map(|&(label, tier, advice)| PredictionResult { label, tier, advice })
            .ok_or(PipelineError::UnmappedLabel(label))
    }
}

impl FromStr for RiskSchema {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(RiskSchema::Binary),
            "four_tier" | "four-tier" | "fourtier" => Ok(RiskSchema::FourTier),
            other => Err(format!("unknown risk schema '{}' (expected binary or four_tier)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub label: u32,
    pub tier: RiskTier,
    pub advice: &'static [&'static str],
}

impl PredictionResult {
    pub fn severity(&self) -> Severity {
        self.tier.severity()
    }
}

/// Shown when the classifier emits a label the schema does not cover.
pub const UNKNOWN_TIER: &str = "Unknown";
pub const UNKNOWN_ADVICE: &str = "No data available.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_mapping() {
        let low = RiskSchema::Binary.classify(0).unwrap();
        assert_eq!(low.tier, RiskTier::Low);
        assert_eq!(low.advice.len(), 1);

        let high = RiskSchema::Binary.classify(1).unwrap();
        assert_eq!(high.tier, RiskTier::High);
        assert_eq!(high.tier.name(), "High Risk");
        assert!(high.advice.contains(&"Consult a doctor"));
    }

    #[test]
    fn test_four_tier_mapping() {
        let tiers: Vec<RiskTier> = (0..4)
            .map(|l| RiskSchema::FourTier.classify(l).unwrap().tier)
            .collect();
        assert_eq!(
            tiers,
            vec![RiskTier::Low, RiskTier::Moderate, RiskTier::High, RiskTier::Critical]
        );
    }

    #[test]
    fn test_unmapped_label() {
        assert!(matches!(
            RiskSchema::Binary.classify(2),
            Err(PipelineError::UnmappedLabel(2))
        ));
        assert!(matches!(
            RiskSchema::FourTier.classify(4),
            Err(PipelineError::UnmappedLabel(4))
        ));
    }

    #[test]
    fn test_severity() {
        assert_eq!(RiskTier::Low.severity(), Severity::Ok);
        assert_eq!(RiskTier::Moderate.severity(), Severity::Warning);
        assert_eq!(RiskTier::Critical.severity(), Severity::Alert);
    }

    #[test]
    fn test_schema_parse() {
        assert_eq!("Binary".parse::<RiskSchema>().unwrap(), RiskSchema::Binary);
        assert_eq!("four-tier".parse::<RiskSchema>().unwrap(), RiskSchema::FourTier);
        assert!("three".parse::<RiskSchema>().is_err());
    }
}
