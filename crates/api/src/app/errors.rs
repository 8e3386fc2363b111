use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use tinyledger_ledger::LedgerError;

/// Client-facing failures of the transaction endpoint.
///
/// The display string is the `message` field of the JSON body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid JSON payload")]
    InvalidRequest,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Transaction type must be 'deposit' or 'withdrawal'")]
    InvalidTransactionType,

    #[error("Not enough balance to complete withdrawal")]
    InsufficientFunds,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest => "invalid_request",
            ApiError::InvalidAmount => "invalid_amount",
            ApiError::InvalidTransactionType => "invalid_transaction_type",
            ApiError::InsufficientFunds => "insufficient_funds",
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(_) | LedgerError::BalanceOverflow { .. } => {
                ApiError::InvalidAmount
            }
            LedgerError::InsufficientFunds { .. } => ApiError::InsufficientFunds,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_error(self.status(), self.code(), self.to_string())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
