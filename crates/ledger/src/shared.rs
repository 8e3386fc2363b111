//! Thread-safe ledger handle.
//!
//! One `std::sync::Mutex` covers the whole aggregate (balance, history and the
//! id counter). Every operation, reads included, takes it for its full
//! duration; nothing here awaits while holding it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tinyledger_core::{AggregateRoot, LedgerId};

use crate::error::LedgerError;
use crate::ledger::{Ledger, LedgerCommand};
use crate::transaction::{Transaction, TransactionId, TransactionKind};

/// Balance as observed at `checked_at`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub balance: f64,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub id: LedgerId,
    pub balance: f64,
    pub next_id: TransactionId,
    pub transaction_count: usize,
}

/// Cloneable handle to the process-wide ledger.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::from_ledger(Ledger::new())
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    // `apply` is a push plus two scalar writes and cannot unwind halfway, so a
    // poisoned guard still protects a consistent ledger.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide and apply `build(now)` in one critical section.
    fn execute(
        &self,
        build: impl FnOnce(DateTime<Utc>) -> LedgerCommand,
    ) -> Result<Transaction, LedgerError> {
        let mut ledger = self.lock();
        let command = build(Utc::now());

        let tx = ledger.execute(&command).inspect_err(|err| {
            tracing::warn!(
                ledger_id = %ledger.id(),
                error = %err,
                "transaction rejected"
            );
        })?;
        tracing::debug!(
            ledger_id = %ledger.id(),
            tx_id = %tx.id,
            kind = %tx.kind,
            amount = tx.amount.value(),
            balance = ledger.balance(),
            "transaction recorded"
        );
        Ok(tx)
    }

    pub fn record_deposit(&self, amount: f64) -> Result<Transaction, LedgerError> {
        self.execute(|at| LedgerCommand::Deposit { amount, at })
    }

    /// Check-and-debit under the lock; on `InsufficientFunds` nothing changes.
    pub fn record_withdrawal(&self, amount: f64) -> Result<Transaction, LedgerError> {
        self.execute(|at| LedgerCommand::Withdraw { amount, at })
    }

    pub fn record(&self, kind: TransactionKind, amount: f64) -> Result<Transaction, LedgerError> {
        match kind {
            TransactionKind::Deposit => self.record_deposit(amount),
            TransactionKind::Withdrawal => self.record_withdrawal(amount),
        }
    }

    pub fn balance(&self) -> BalanceSnapshot {
        let ledger = self.lock();
        BalanceSnapshot {
            balance: ledger.balance(),
            checked_at: Utc::now(),
        }
    }

    /// Owned copy of the history; later appends are not visible in it.
    pub fn history(&self) -> Vec<Transaction> {
        self.lock().history().to_vec()
    }

    pub fn summary(&self) -> LedgerSummary {
        let ledger = self.lock();
        LedgerSummary {
            id: *ledger.id(),
            balance: ledger.balance(),
            next_id: ledger.next_id(),
            transaction_count: ledger.history().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn deposit_then_query() {
        let ledger = SharedLedger::new();
        let tx = ledger.record_deposit(100.0).unwrap();

        assert_eq!(tx.amount.value(), 100.0);
        assert_eq!(ledger.balance().balance, 100.0);
        assert_eq!(ledger.history(), vec![tx]);
    }

    #[test]
    fn insufficient_funds_leaves_everything_untouched() {
        let ledger = SharedLedger::new();

        let err = ledger.record_withdrawal(50.0).unwrap_err();
        assert_eq!(err.code(), "insufficient_funds");
        assert_eq!(ledger.balance().balance, 0.0);
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.summary().next_id, TransactionId::FIRST);
    }

    #[test]
    fn record_dispatches_on_kind() {
        let ledger = SharedLedger::new();
        ledger.record(TransactionKind::Deposit, 200.0).unwrap();
        let tx = ledger.record(TransactionKind::Withdrawal, 100.0).unwrap();

        assert_eq!(tx.kind, TransactionKind::Withdrawal);
        assert_eq!(tx.id, TransactionId(2));
        assert_eq!(ledger.balance().balance, 100.0);
    }

    #[test]
    fn history_snapshot_is_detached() {
        let ledger = SharedLedger::new();
        ledger.record_deposit(1.0).unwrap();
        let snapshot = ledger.history();
        ledger.record_deposit(2.0).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(ledger.history().len(), 2);
    }

    #[test]
    fn summary_reflects_one_consistent_state() {
        let id = LedgerId::new();
        let ledger = SharedLedger::from_ledger(Ledger::with_id(id));
        ledger.record_deposit(30.0).unwrap();
        ledger.record_withdrawal(10.0).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.id, id);
        assert_eq!(summary.balance, 20.0);
        assert_eq!(summary.next_id, TransactionId(3));
        assert_eq!(summary.transaction_count, 2);
    }

    #[test]
    fn concurrent_withdrawals_never_overdraw() {
        const START: f64 = 1_000.0;
        const AMOUNT: f64 = 30.0;
        const ATTEMPTS: usize = 64;

        let ledger = SharedLedger::new();
        ledger.record_deposit(START).unwrap();
        let barrier = Arc::new(Barrier::new(ATTEMPTS));

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| {
                let ledger = ledger.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    ledger.record_withdrawal(AMOUNT).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        let final_balance = ledger.balance().balance;
        assert!(final_balance >= 0.0);
        assert!(successes as f64 * AMOUNT <= START);
        // 1000 / 30 => exactly 33 fit.
        assert_eq!(successes, 33);
        assert_eq!(final_balance, START - successes as f64 * AMOUNT);
        assert_eq!(ledger.history().len(), successes + 1);
    }

    #[test]
    fn concurrent_snapshots_are_never_torn() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 250;

        let ledger = SharedLedger::new();
        let mut handles = Vec::new();

        for w in 0..WRITERS {
            let ledger = ledger.clone();
            handles.push(thread::spawn(move || {
                for i in 0..PER_WRITER {
                    if (w + i) % 3 == 0 {
                        let _ = ledger.record_withdrawal(1.0);
                    } else {
                        ledger.record_deposit(1.0).unwrap();
                    }
                }
            }));
        }

        let reader = {
            let ledger = ledger.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    let history = ledger.history();
                    for (i, tx) in history.iter().enumerate() {
                        assert_eq!(tx.id, TransactionId(i as i64 + 1));
                    }
                    let derived: f64 = history.iter().map(Transaction::signed_amount).sum();
                    assert!(derived >= 0.0);
                }
            })
        };

        for h in handles {
            h.join().unwrap();
        }
        reader.join().unwrap();

        let history = ledger.history();
        let derived: f64 = history.iter().map(Transaction::signed_amount).sum();
        assert_eq!(ledger.balance().balance, derived);
        assert_eq!(ledger.summary().next_id, TransactionId(history.len() as i64 + 1));
    }
}
