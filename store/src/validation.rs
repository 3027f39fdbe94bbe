use catch_core::{ScoreEntry, SubmitScore};
use serde_json::Value;
use thiserror::Error;

/// Why a submitted score was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSubmission {
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Invalid score data: name is required")]
    MissingName,
    #[error("Invalid score data: score must be a non-negative whole number")]
    InvalidScore,
}

/// Read a non-negative whole number, accepting `42` and `42.0` alike
fn whole_number(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Persisted-entry predicate: an object with a non-empty string `name` and a
/// non-negative numeric `score`. Entries failing it are dropped on load.
pub fn entry_from_value(value: &Value) -> Option<ScoreEntry> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?;
    if name.trim().is_empty() {
        return None;
    }
    let score = whole_number(obj.get("score")?)?;
    let timestamp = obj
        .get("timestamp")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(ScoreEntry {
        name: name.to_string(),
        score,
        timestamp,
    })
}

/// Validate a `POST /api/high-scores` body. The name is trimmed.
pub fn submission_from_value(value: &Value) -> Result<SubmitScore, InvalidSubmission> {
    let obj = value.as_object().ok_or(InvalidSubmission::NotAnObject)?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(InvalidSubmission::MissingName)?;

    let score = obj
        .get("score")
        .and_then(whole_number)
        .ok_or(InvalidSubmission::InvalidScore)?;

    Ok(SubmitScore {
        name: name.to_string(),
        score,
    })
}
