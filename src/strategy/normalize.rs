use serde_json::Value;

use crate::domain::StrategyAllocation;
use crate::error::AdvisorError;

const DEFAULT_CHAIN: &str = "ethereum";
const DEFAULT_PROTOCOL: &str = "Unknown Protocol";
const DEFAULT_POOL: &str = "Default Pool";
const DEFAULT_ALLOCATION: f64 = 0.5;

/// Fixed two-entry plan used whenever the webhook gives nothing usable.
pub fn fallback_allocations(amount: f64) -> Vec<StrategyAllocation> {
    vec![
        StrategyAllocation {
            chain: "ethereum".into(),
            protocol: "Aave".into(),
            pool: "USDC Lending".into(),
            apr: 5.5,
            amount: amount * 0.5,
        },
        StrategyAllocation {
            chain: "polygon".into(),
            protocol: "Curve".into(),
            pool: "3pool".into(),
            apr: 4.2,
            amount: amount * 0.5,
        },
    ]
}

/// Maps `{ "investments": [...] }` to allocations of `amount`.
///
/// A body that is not JSON, or whose `investments` is missing or empty, is
/// `MalformedResponse`. Individual records never fail: missing fields take
/// defaults. Allocation fractions are passed through without checking they
/// sum to 1.
pub fn normalize(raw: &str, amount: f64) -> Result<Vec<StrategyAllocation>, AdvisorError> {
    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| AdvisorError::MalformedResponse(format!("body is not JSON: {e}")))?;

    let investments = match parsed.get("investments").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        Some(_) => return Err(AdvisorError::MalformedResponse("investments is empty".into())),
        None => {
            return Err(AdvisorError::MalformedResponse(
                "investments list is missing".into(),
            ))
        }
    };

    Ok(investments
        .iter()
        .map(|record| map_record(record, amount))
        .collect())
}

fn map_record(record: &Value, amount: f64) -> StrategyAllocation {
    // A zero fraction is treated like a missing one.
    let fraction = number_field(record, "allocation")
        .filter(|f| *f != 0.0)
        .unwrap_or(DEFAULT_ALLOCATION);
    StrategyAllocation {
        chain: text_field(record, "chain").unwrap_or_else(|| DEFAULT_CHAIN.to_string()),
        protocol: text_field(record, "protocol").unwrap_or_else(|| DEFAULT_PROTOCOL.to_string()),
        pool: text_field(record, "pool").unwrap_or_else(|| DEFAULT_POOL.to_string()),
        apr: number_field(record, "apr").unwrap_or(0.0),
        amount: fraction * amount,
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Numbers and numeric strings (`"12.3"`) are accepted.
fn number_field(record: &Value, key: &str) -> Option<f64> {
    let n = match record.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
