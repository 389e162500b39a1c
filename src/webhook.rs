use std::future::Future;

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::InvestmentRequest;
use crate::risk::risk_severity;

pub const DEFAULT_WEBHOOK_URL: &str =
    "http://rag.defibuilder.com:5678/webhook-test/9a5ceb5e-5f1c-480f-bb39-1a194f991050";
pub const DEFAULT_EXECUTION_MODE: &str = "test";

/// Status and body of a finished webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound seam for the orchestrator. The returned future resolves once the
/// whole body has been read; dropping it cancels the request.
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<WebhookResponse>> + Send;
}

#[derive(Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<WebhookResponse> {
        let resp = self.http.post(url).json(payload).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(WebhookResponse { status, body })
    }
}

/// Header block the receiving workflow was recorded against. It is echoed
/// inside the JSON body, not sent as real HTTP headers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeHeaders {
    #[serde(rename = "content-transfer-encoding")]
    pub content_transfer_encoding: String,
    #[serde(rename = "user-agent")]
    pub user_agent: String,
    pub accept: String,
    #[serde(rename = "postman-token")]
    pub postman_token: String,
    pub host: String,
    #[serde(rename = "accept-encoding")]
    pub accept_encoding: String,
    pub connection: String,
    #[serde(rename = "content-type")]
    pub content_type: String,
    #[serde(rename = "content-length")]
    pub content_length: String,
}

impl Default for EnvelopeHeaders {
    fn default() -> Self {
        Self {
            content_transfer_encoding: "application/json".into(),
            user_agent: "PostmanRuntime/7.42.0".into(),
            accept: "*/*".into(),
            postman_token: "034e79cf-ed58-4808-b6be-f5790bcaab16".into(),
            host: "rag.defibuilder.com:5678".into(),
            accept_encoding: "gzip, deflate, br".into(),
            connection: "keep-alive".into(),
            content_type:
                "multipart/form-data; boundary=--------------------------164951995062469606115444"
                    .into(),
            content_length: "532".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeBody {
    pub chains: Vec<String>,
    pub category: Vec<String>,
    /// Severity 0-100 as a decimal string.
    pub risk: String,
    pub amount: String,
    /// `"<N> months"`
    pub timeframe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookEnvelope {
    pub headers: EnvelopeHeaders,
    pub params: Map<String, Value>,
    pub query: Map<String, Value>,
    pub body: EnvelopeBody,
    #[serde(rename = "webhookUrl")]
    pub webhook_url: String,
    #[serde(rename = "executionMode")]
    pub execution_mode: String,
}

impl WebhookEnvelope {
    /// Wire payload: the receiver expects a one-element array.
    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value([self])?)
    }
}

pub fn build_envelope(
    req: &InvestmentRequest,
    webhook_url: &str,
    execution_mode: &str,
) -> WebhookEnvelope {
    WebhookEnvelope {
        headers: EnvelopeHeaders::default(),
        params: Map::new(),
        query: Map::new(),
        body: EnvelopeBody {
            chains: req.chains().to_vec(),
            category: req.categories().iter().map(|c| c.label().to_string()).collect(),
            risk: risk_severity(req.risk()).to_string(),
            amount: format_amount(req.amount()),
            timeframe: format!("{} months", req.months()),
        },
        webhook_url: webhook_url.to_string(),
        execution_mode: execution_mode.to_string(),
    }
}

/// Shortest decimal rendering: `1000`, `1000.5`.
fn format_amount(amount: f64) -> String {
    format!("{amount}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FarmCategory;
    use crate::risk::RiskLevel;

    fn request(risk: Option<RiskLevel>, amount: f64) -> InvestmentRequest {
        InvestmentRequest::new(
            vec!["polygon".into(), "ethereum".into()],
            vec![FarmCategory::StableCoins, FarmCategory::BorrowingLending],
            risk,
            amount,
            6,
        )
        .unwrap()
    }

    #[test]
    fn body_carries_severity_amount_and_timeframe() {
        let env = build_envelope(&request(Some(RiskLevel::Medium), 1000.0), "http://hook", "test");
        assert_eq!(env.body.risk, "60");
        assert_eq!(env.body.amount, "1000");
        assert_eq!(env.body.timeframe, "6 months");
        assert_eq!(env.body.chains, vec!["polygon", "ethereum"]);
        assert_eq!(env.body.category, vec!["Borrowing/Lending", "Stable Coins"]);
        assert_eq!(env.webhook_url, "http://hook");
        assert_eq!(env.execution_mode, "test");
    }

    #[test]
    fn unknown_risk_is_sent_as_fifty() {
        let env = build_envelope(&request(None, 250.5), "http://hook", "test");
        assert_eq!(env.body.risk, "50");
        assert_eq!(env.body.amount, "250.5");
    }

    #[test]
    fn payload_is_single_element_array_with_wire_keys() {
        let env = build_envelope(&request(Some(RiskLevel::Degen), 10.0), "http://hook", "production");
        let payload = env.to_payload().unwrap();
        let arr = payload.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        let first = &arr[0];
        assert_eq!(first["webhookUrl"], "http://hook");
        assert_eq!(first["executionMode"], "production");
        assert_eq!(first["headers"]["user-agent"], "PostmanRuntime/7.42.0");
        assert_eq!(first["headers"]["content-length"], "532");
        assert_eq!(first["params"], serde_json::json!({}));
        assert_eq!(first["query"], serde_json::json!({}));
        assert_eq!(first["body"]["risk"], "100");
    }

    #[test]
    fn ok_means_2xx() {
        let mk = |status| WebhookResponse { status, body: String::new() };
        assert!(mk(200).is_ok());
        assert!(mk(204).is_ok());
        assert!(!mk(199).is_ok());
        assert!(!mk(301).is_ok());
        assert!(!mk(500).is_ok());
    }
}
