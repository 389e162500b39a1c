pub mod advisor;
pub mod config;
pub mod domain;
pub mod error;
pub mod journal;
pub mod monitoring;
pub mod notifier;
pub mod retry;
pub mod risk;
pub mod strategy;
pub mod webhook;

pub use advisor::StrategyAdvisor;
pub use config::Config;
pub use domain::{Advice, AdviceSource, FarmCategory, InvestmentRequest, StrategyAllocation};
pub use error::{AdvisorError, FetchError};
pub use risk::RiskLevel;
