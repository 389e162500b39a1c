use std::fmt::Write as _;

use crate::domain::StrategyAllocation;

const ICON_CDN: &str = "https://icons.llamao.fi/icons";
pub const FALLBACK_ICON: &str = "/fallback-icon.png";

fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

pub fn protocol_icon_url(protocol: &str) -> String {
    if protocol.trim().is_empty() {
        return FALLBACK_ICON.to_string();
    }
    format!("{ICON_CDN}/protocols/{}", slug(protocol))
}

pub fn chain_icon_url(chain: &str) -> String {
    if chain.trim().is_empty() {
        return FALLBACK_ICON.to_string();
    }
    format!("{ICON_CDN}/chains/rsz_{}", slug(chain))
}

/// Percent of the plan's total held by each entry. Computed from the
/// allocations themselves, not the requested amount.
pub fn allocation_shares(allocations: &[StrategyAllocation]) -> Vec<f64> {
    let total: f64 = allocations.iter().map(|a| a.amount).sum();
    if total.is_nan() || total <= 0.0 {
        return vec![0.0; allocations.len()];
    }
    allocations.iter().map(|a| a.amount / total * 100.0).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Plain-text strategy cards, one block per allocation.
pub fn render_cards(allocations: &[StrategyAllocation]) -> String {
    let shares = allocation_shares(allocations);
    let mut out = String::new();
    for (a, share) in allocations.iter().zip(shares) {
        let _ = writeln!(out, "{}  {:.2}%", capitalize(&a.protocol), a.apr);
        let _ = writeln!(out, "  {} Chain", a.chain);
        let _ = writeln!(out, "  {}", a.pool);
        let _ = writeln!(out, "  ${:.0}", a.amount);
        let _ = writeln!(out, "  {:.1}% of total investment", share);
        let _ = writeln!(out, "  icon: {}", protocol_icon_url(&a.protocol));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::fallback_allocations;

    #[test]
    fn icon_urls_are_slugged() {
        assert_eq!(
            protocol_icon_url("Uniswap V3"),
            "https://icons.llamao.fi/icons/protocols/uniswap-v3"
        );
        assert_eq!(
            protocol_icon_url("Curve  Finance"),
            "https://icons.llamao.fi/icons/protocols/curve-finance"
        );
        assert_eq!(chain_icon_url("Arbitrum One"), "https://icons.llamao.fi/icons/chains/rsz_arbitrum-one");
        assert_eq!(protocol_icon_url(""), FALLBACK_ICON);
        assert_eq!(chain_icon_url("   "), FALLBACK_ICON);
    }

    #[test]
    fn shares_are_relative_to_plan_total() {
        let mut plan = fallback_allocations(1000.0);
        plan[1].amount = 1500.0;
        assert_eq!(allocation_shares(&plan), vec![25.0, 75.0]);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let plan = fallback_allocations(0.0);
        assert_eq!(allocation_shares(&plan), vec![0.0, 0.0]);
    }

    #[test]
    fn cards_show_protocol_apr_and_share() {
        let out = render_cards(&fallback_allocations(1000.0));
        assert!(out.contains("Aave  5.50%"));
        assert!(out.contains("polygon Chain"));
        assert!(out.contains("$500"));
        assert!(out.contains("50.0% of total investment"));
        assert!(out.contains("icons/protocols/curve"));
    }
}
