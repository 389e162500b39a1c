use anyhow::Result;
use tracing::info;

use yield_advisor::config::{self, Config};
use yield_advisor::{monitoring, strategy, StrategyAdvisor};

#[tokio::main]
async fn main() -> Result<()> {
    // Load local .env if present (no-op in prod/systemd envs)
    let _ = dotenvy::dotenv();

    let cfg = Config::from_env()?;
    monitoring::init_tracing(cfg.log_json);
    info!(
        webhook_url = %cfg.webhook_url,
        execution_mode = %cfg.execution_mode,
        max_retries = cfg.max_retries,
        initial_timeout_ms = cfg.initial_timeout_ms,
        max_timeout_ms = cfg.max_timeout_ms,
        alerts = cfg.slack_webhook_url.is_some(),
        journal = cfg.journal_path.as_deref().unwrap_or(""),
        "boot"
    );

    let req = config::request_from_env()?;
    let advisor = StrategyAdvisor::new(cfg);
    let advice = advisor.advise_with_source(&req).await;

    info!(fallback = advice.is_fallback(), count = advice.allocations.len(), "advice.ready");
    print!("{}", strategy::render_cards(&advice.allocations));
    println!("{}", serde_json::to_string_pretty(&advice.allocations)?);

    Ok(())
}
