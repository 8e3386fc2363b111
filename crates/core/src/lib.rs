//! `tinyledger-core`: domain building blocks shared by the ledger and its adapters.
//!
//! Pure domain primitives only: no IO, no HTTP.

pub mod aggregate;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use id::LedgerId;
