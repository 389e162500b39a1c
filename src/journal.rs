use anyhow::Result;
use chrono::{DateTime, Local};
use std::{fs::OpenOptions, io::Write, path::Path};

use crate::domain::{Advice, AdviceSource, InvestmentRequest};
use crate::risk::risk_severity;

/// Appends one markdown block per advice run.
pub fn append_advice(
    journal_path: impl AsRef<Path>,
    req: &InvestmentRequest,
    advice: &Advice,
) -> Result<()> {
    let now: DateTime<Local> = Local::now();

    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(journal_path)?;

    let chains: Vec<&str> = req.chains().iter().map(String::as_str).collect();
    let categories: Vec<&str> = req.categories().iter().map(|c| c.label()).collect();

    writeln!(f, "## Plan {}\n", now.to_rfc3339())?;
    writeln!(f, "- Chains: {}", join_or_any(&chains))?;
    writeln!(f, "- Categories: {}", join_or_any(&categories))?;
    writeln!(f, "- Risk severity: {}", risk_severity(req.risk()))?;
    writeln!(f, "- Capital: {:.2}", req.amount())?;
    writeln!(f, "- Horizon: {} months", req.months())?;
    match &advice.source {
        AdviceSource::Remote => writeln!(f, "- Source: webhook\n")?,
        AdviceSource::Fallback { reason } => writeln!(f, "- Source: fallback ({reason})\n")?,
    }

    writeln!(f, "| Chain | Protocol | Pool | APR % | Amount |")?;
    writeln!(f, "|---|---|---|---|---|")?;
    for a in &advice.allocations {
        writeln!(
            f,
            "| {} | {} | {} | {:.2} | {:.2} |",
            a.chain, a.protocol, a.pool, a.apr, a.amount
        )?;
    }
    writeln!(f, "\n---\n")?;

    Ok(())
}

fn join_or_any(items: &[&str]) -> String {
    if items.is_empty() {
        "any".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FarmCategory;
    use crate::risk::RiskLevel;
    use crate::strategy::fallback_allocations;

    #[test]
    fn appends_plan_blocks() {
        let path = std::env::temp_dir().join(format!("advisor-journal-{}.md", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let req = InvestmentRequest::new(
            vec!["ethereum".into()],
            vec![FarmCategory::StableCoins],
            Some(RiskLevel::Low),
            1000.0,
            3,
        )
        .unwrap();
        let advice = Advice {
            source: AdviceSource::Fallback { reason: "webhook timed out".into() },
            allocations: fallback_allocations(1000.0),
        };

        append_advice(&path, &req, &advice).unwrap();
        append_advice(&path, &req, &advice).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(body.matches("## Plan ").count(), 2);
        assert!(body.contains("- Risk severity: 20"));
        assert!(body.contains("- Source: fallback (webhook timed out)"));
        assert!(body.contains("| polygon | Curve | 3pool | 4.20 | 500.00 |"));
    }
}
