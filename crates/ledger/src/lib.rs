//! Ledger module (single-account balance + append-only transaction log).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.
//! [`SharedLedger`] is the handle request handlers share; every operation on it
//! runs inside one critical section.

pub mod error;
pub mod ledger;
pub mod shared;
pub mod transaction;

pub use error::LedgerError;
pub use ledger::{Ledger, LedgerCommand, LedgerEvent};
pub use shared::{BalanceSnapshot, LedgerSummary, SharedLedger};
pub use transaction::{Amount, Transaction, TransactionId, TransactionKind};
