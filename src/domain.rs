use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;
use crate::risk::RiskLevel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FarmCategory {
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    #[serde(rename = "RWA")]
    Rwa,
    #[serde(rename = "DePin")]
    DePin,
    #[serde(rename = "Borrowing/Lending")]
    BorrowingLending,
    #[serde(rename = "Stable Coins")]
    StableCoins,
    #[serde(rename = "Meme Finance")]
    MemeFinance,
    #[serde(rename = "Restaking Protocols")]
    RestakingProtocols,
}

impl FarmCategory {
    pub const ALL: [FarmCategory; 7] = [
        FarmCategory::ArtificialIntelligence,
        FarmCategory::Rwa,
        FarmCategory::DePin,
        FarmCategory::BorrowingLending,
        FarmCategory::StableCoins,
        FarmCategory::MemeFinance,
        FarmCategory::RestakingProtocols,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FarmCategory::ArtificialIntelligence => "Artificial Intelligence",
            FarmCategory::Rwa => "RWA",
            FarmCategory::DePin => "DePin",
            FarmCategory::BorrowingLending => "Borrowing/Lending",
            FarmCategory::StableCoins => "Stable Coins",
            FarmCategory::MemeFinance => "Meme Finance",
            FarmCategory::RestakingProtocols => "Restaking Protocols",
        }
    }

    /// Case-insensitive match on the label or a short key (`ai`, `lending`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if let Some(hit) = Self::ALL.iter().find(|c| c.label().to_lowercase() == key) {
            return Some(*hit);
        }
        match key.as_str() {
            "ai" => Some(FarmCategory::ArtificialIntelligence),
            "rwa" => Some(FarmCategory::Rwa),
            "depin" => Some(FarmCategory::DePin),
            "lending" | "borrowing" => Some(FarmCategory::BorrowingLending),
            "stables" | "stablecoins" => Some(FarmCategory::StableCoins),
            "meme" => Some(FarmCategory::MemeFinance),
            "restaking" => Some(FarmCategory::RestakingProtocols),
            _ => None,
        }
    }
}

impl fmt::Display for FarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the user asked for. Validated once at construction and read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRequest {
    chains: Vec<String>,
    categories: BTreeSet<FarmCategory>,
    risk: Option<RiskLevel>,
    amount: f64,
    months: u32,
}

impl InvestmentRequest {
    pub fn new(
        chains: impl IntoIterator<Item = String>,
        categories: impl IntoIterator<Item = FarmCategory>,
        risk: Option<RiskLevel>,
        amount: f64,
        months: u32,
    ) -> Result<Self, AdvisorError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AdvisorError::InvalidRequest(format!(
                "amount must be a positive number, got {amount}"
            )));
        }
        if months == 0 {
            return Err(AdvisorError::InvalidRequest(
                "time horizon must be at least one month".into(),
            ));
        }

        // Deduplicated, caller order kept.
        let mut unique: Vec<String> = Vec::new();
        for chain in chains {
            let chain = chain.trim();
            if !chain.is_empty() && !unique.iter().any(|c| c == chain) {
                unique.push(chain.to_string());
            }
        }

        Ok(Self {
            chains: unique,
            categories: categories.into_iter().collect(),
            risk,
            amount,
            months,
        })
    }

    pub fn chains(&self) -> &[String] {
        &self.chains
    }

    pub fn categories(&self) -> &BTreeSet<FarmCategory> {
        &self.categories
    }

    /// `None` when the caller supplied a label outside the known levels.
    pub fn risk(&self) -> Option<RiskLevel> {
        self.risk
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn months(&self) -> u32 {
        self.months
    }
}

/// One recommended yield position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyAllocation {
    pub chain: String,
    pub protocol: String,
    pub pool: String,
    /// Percent; 0 when the provider did not report one.
    #[serde(rename = "APR")]
    pub apr: f64,
    /// Absolute capital allocated, same unit as the request amount.
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdviceSource {
    Remote,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub source: AdviceSource,
    pub allocations: Vec<StrategyAllocation>,
}

impl Advice {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AdviceSource::Fallback { .. })
    }
}
