use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{Advice, AdviceSource, InvestmentRequest, StrategyAllocation};
use crate::error::AdvisorError;
use crate::journal;
use crate::notifier::{fallback_alert_text, Notifier};
use crate::retry::{call_with_retry, RetryPolicy};
use crate::strategy::{fallback_allocations, normalize};
use crate::webhook::{build_envelope, HttpTransport, Transport};

/// Turns investment requests into strategy allocations via the remote webhook.
///
/// Holds only configuration; every `advise` call is independent.
#[derive(Clone)]
pub struct StrategyAdvisor<T = HttpTransport> {
    pub cfg: Config,
    policy: RetryPolicy,
    transport: T,
    notifier: Notifier,
}

impl StrategyAdvisor<HttpTransport> {
    pub fn new(cfg: Config) -> Self {
        Self::with_transport(cfg, HttpTransport::new())
    }
}

impl<T: Transport> StrategyAdvisor<T> {
    pub fn with_transport(cfg: Config, transport: T) -> Self {
        let policy = cfg.retry_policy();
        let notifier = Notifier::new(cfg.slack_webhook_url.clone());
        Self { cfg, policy, transport, notifier }
    }

    /// Envelope -> retrying POST -> normalize. Every failure is returned as-is.
    pub async fn fetch_strategies(
        &self,
        req: &InvestmentRequest,
    ) -> Result<Vec<StrategyAllocation>, AdvisorError> {
        let envelope = build_envelope(req, &self.cfg.webhook_url, &self.cfg.execution_mode);
        let payload = envelope.to_payload().map_err(encoding_error)?;

        info!(
            url = %envelope.webhook_url,
            risk = %envelope.body.risk,
            amount = %envelope.body.amount,
            timeframe = %envelope.body.timeframe,
            "advisor.request"
        );

        let resp = call_with_retry(&self.transport, &envelope.webhook_url, &payload, &self.policy).await?;
        if !resp.is_ok() {
            return Err(AdvisorError::HttpStatus { status: resp.status });
        }

        normalize(&resp.body, req.amount())
    }

    /// Never fails: anything short of a usable webhook answer yields the
    /// fallback plan.
    pub async fn advise_with_source(&self, req: &InvestmentRequest) -> Advice {
        let advice = match self.fetch_strategies(req).await {
            Ok(allocations) => {
                info!(count = allocations.len(), "advisor.remote_plan");
                Advice { source: AdviceSource::Remote, allocations }
            }
            Err(err) => self.substitute_fallback(req, err).await,
        };

        if let Some(path) = self.cfg.journal_path.as_deref() {
            if let Err(e) = journal::append_advice(path, req, &advice) {
                warn!(error = %e, path, "advisor.journal_failed");
            }
        }

        advice
    }

    pub async fn advise(&self, req: &InvestmentRequest) -> Vec<StrategyAllocation> {
        self.advise_with_source(req).await.allocations
    }

    /// The single place where failures become fallback data.
    async fn substitute_fallback(&self, req: &InvestmentRequest, err: AdvisorError) -> Advice {
        let reason = err.to_string();
        warn!(error = %reason, amount = req.amount(), "advisor.fallback");

        if self.notifier.is_enabled() {
            let limit = self.cfg.alert_timeout();
            let text = fallback_alert_text(&reason, req.amount());
            match timeout(limit, self.notifier.alert(&text)).await {
                Ok(Ok(())) => info!("advisor.alert_sent"),
                Ok(Err(e)) => warn!(error = %e, "advisor.alert_failed"),
                Err(_) => warn!(
                    timeout_ms = limit.as_millis() as u64,
                    error = "alert timed out",
                    "advisor.alert_failed"
                ),
            }
        }

        Advice {
            source: AdviceSource::Fallback { reason },
            allocations: fallback_allocations(req.amount()),
        }
    }
}

fn encoding_error(e: anyhow::Error) -> AdvisorError {
    AdvisorError::InvalidRequest(format!("envelope encoding: {e:#}"))
}
