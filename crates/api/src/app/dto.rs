use serde::Deserialize;

use tinyledger_ledger::TransactionKind;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /ledger/transactions`.
///
/// Absent or `null` fields are not a decoding error; they fail validation with
/// the specific error instead.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<f64>,
}

impl CreateTransactionRequest {
    pub fn decode(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!(error = %e, "rejecting malformed transaction body");
            ApiError::InvalidRequest
        })
    }

    /// Amount is checked before type.
    pub fn validate(&self) -> Result<(TransactionKind, f64), ApiError> {
        let amount = self.amount.unwrap_or(0.0);
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ApiError::InvalidAmount);
        }

        let kind = self
            .kind
            .as_deref()
            .and_then(TransactionKind::parse)
            .ok_or(ApiError::InvalidTransactionType)?;

        Ok((kind, amount))
    }
}
