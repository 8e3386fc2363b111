use thiserror::Error;

/// Failures the ledger itself can signal.
///
/// All are terminal for the request and leave the ledger untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LedgerError {
    #[error("amount must be a positive finite number, got {0}")]
    InvalidAmount(f64),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("deposit of {requested} would overflow balance {available}")]
    BalanceOverflow { requested: f64, available: f64 },
}

impl LedgerError {
    /// Stable machine-readable code, shared with the HTTP error body.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount(_) | LedgerError::BalanceOverflow { .. } => {
                "invalid_amount"
            }
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
        }
    }
}
