use axum::http::StatusCode;

/// Liveness check. Never touches the ledger.
pub async fn health() -> StatusCode {
    StatusCode::OK
}
