use serde::{Deserialize, Serialize};

/// Severity sent to the webhook when the risk label is not recognised.
pub const UNKNOWN_RISK_SEVERITY: u8 = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Average,
    Medium,
    High,
    Degen,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Low,
        RiskLevel::Average,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Degen,
    ];

    /// Numeric 0-100 encoding expected by the strategy webhook.
    pub fn severity(self) -> u8 {
        match self {
            RiskLevel::Low => 20,
            RiskLevel::Average => 40,
            RiskLevel::Medium => 60,
            RiskLevel::High => 80,
            RiskLevel::Degen => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Average => "Average Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Degen => "Degen Risk",
        }
    }

    /// Accepts `low`, `Low Risk`, `LOW` and so on. The UI historically sent
    /// `Hight Risk`, which still maps to `High`.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        let key = key.strip_suffix(" risk").unwrap_or(&key).trim();
        match key {
            "low" => Some(RiskLevel::Low),
            "average" => Some(RiskLevel::Average),
            "medium" => Some(RiskLevel::Medium),
            "high" | "hight" => Some(RiskLevel::High),
            "degen" => Some(RiskLevel::Degen),
            _ => None,
        }
    }
}

/// Severity for a possibly unrecognised risk level.
pub fn risk_severity(risk: Option<RiskLevel>) -> u8 {
    risk.map(RiskLevel::severity).unwrap_or(UNKNOWN_RISK_SEVERITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_levels_map_to_fixed_severities() {
        let got: Vec<u8> = RiskLevel::ALL.iter().map(|r| r.severity()).collect();
        assert_eq!(got, vec![20, 40, 60, 80, 100]);
    }

    #[test]
    fn unrecognised_labels_fall_back_to_fifty() {
        for raw in ["", "extreme", "lowish", "42", "risky risk"] {
            assert_eq!(risk_severity(RiskLevel::parse(raw)), 50, "label {raw:?}");
        }
    }

    #[test]
    fn parse_accepts_labels_and_short_keys() {
        assert_eq!(RiskLevel::parse("Low Risk"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::parse("  average "), Some(RiskLevel::Average));
        assert_eq!(RiskLevel::parse("Hight Risk"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("DEGEN"), Some(RiskLevel::Degen));
        for level in RiskLevel::ALL {
            assert_eq!(RiskLevel::parse(level.label()), Some(level));
        }
    }
}
