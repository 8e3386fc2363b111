//! HTTP API application wiring (Axum router + ledger wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request decoding and validation
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;

use tinyledger_ledger::SharedLedger;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Request bodies above this size are rejected before decoding.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the full HTTP router around `ledger`.
///
/// Every handler sees the same ledger; callers keep their own clone to inspect
/// state (tests) or hand it to other components.
pub fn build_app(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/", get(routes::system::health))
        .nest("/ledger", routes::ledger::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                .layer(Extension(ledger)),
        )
}
