use axum::{
    Json, Router,
    body::Bytes,
    extract::{Extension, rejection::BytesRejection},
    http::StatusCode,
    routing::{get, post},
};

use tinyledger_ledger::{BalanceSnapshot, LedgerSummary, SharedLedger, Transaction};

use crate::app::{dto, errors::ApiError};

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_summary))
        .route("/transactions", post(create_transaction))
        .route("/balance", get(get_balance))
        .route("/transaction_history", get(get_transaction_history))
}

/// POST /ledger/transactions
///
/// The body is decoded from raw bytes so a missing or odd `Content-Type` is not
/// a failure by itself. A body that cannot be buffered (including one over
/// [`MAX_BODY_BYTES`](crate::app::MAX_BODY_BYTES)) is an invalid request.
/// Validation runs before the ledger lock is taken; only the balance checks
/// need the ledger.
pub async fn create_transaction(
    Extension(ledger): Extension<SharedLedger>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let body = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "request body rejected");
        ApiError::InvalidRequest
    })?;
    let request = dto::CreateTransactionRequest::decode(&body)?;
    let (kind, amount) = request.validate()?;

    let tx = ledger.record(kind, amount)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /ledger/balance
pub async fn get_balance(Extension(ledger): Extension<SharedLedger>) -> Json<BalanceSnapshot> {
    Json(ledger.balance())
}

/// GET /ledger/transaction_history
pub async fn get_transaction_history(
    Extension(ledger): Extension<SharedLedger>,
) -> Json<Vec<Transaction>> {
    Json(ledger.history())
}

/// GET /ledger
pub async fn get_summary(Extension(ledger): Extension<SharedLedger>) -> Json<LedgerSummary> {
    Json(ledger.summary())
}
