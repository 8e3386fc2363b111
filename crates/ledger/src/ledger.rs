use chrono::{DateTime, Utc};

use tinyledger_core::{Aggregate, AggregateRoot, LedgerId};

use crate::error::LedgerError;
use crate::transaction::{Amount, Transaction, TransactionId, TransactionKind};

/// Command: record one transaction.
///
/// `at` is stamped by the ledger's owner when the command is issued, never by
/// the client.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Deposit { amount: f64, at: DateTime<Utc> },
    Withdraw { amount: f64, at: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    TransactionRecorded(Transaction),
}

/// Aggregate root: the ledger.
///
/// Holds the balance and the append-only history it was derived from.
/// `balance == Σ deposits − Σ withdrawals` over `history`, and never drops
/// below zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    id: LedgerId,
    balance: f64,
    history: Vec<Transaction>,
    next_id: TransactionId,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_id(LedgerId::new())
    }

    pub fn with_id(id: LedgerId) -> Self {
        Self {
            id,
            balance: 0.0,
            history: Vec::new(),
            next_id: TransactionId::FIRST,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn next_id(&self) -> TransactionId {
        self.next_id
    }

    /// Run `command` to completion: `handle`, then `apply` the resulting
    /// event. On error the ledger is unchanged.
    pub fn execute(&mut self, command: &LedgerCommand) -> Result<Transaction, LedgerError> {
        let event = self.handle(command)?;
        self.apply(&event);
        let LedgerEvent::TransactionRecorded(tx) = event;
        Ok(tx)
    }
}

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = LedgerError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::TransactionRecorded(tx) => {
                self.balance += tx.signed_amount();
                self.next_id = tx.id.next();
                self.history.push(tx.clone());
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        let (kind, amount, at) = match *command {
            LedgerCommand::Deposit { amount, at } => {
                let amount = Amount::new(amount)?;
                if !(self.balance + amount.value()).is_finite() {
                    return Err(LedgerError::BalanceOverflow {
                        requested: amount.value(),
                        available: self.balance,
                    });
                }
                (TransactionKind::Deposit, amount, at)
            }
            LedgerCommand::Withdraw { amount, at } => {
                let amount = Amount::new(amount)?;
                if amount.value() > self.balance {
                    return Err(LedgerError::InsufficientFunds {
                        requested: amount.value(),
                        available: self.balance,
                    });
                }
                (TransactionKind::Withdrawal, amount, at)
            }
        };

        Ok(LedgerEvent::TransactionRecorded(Transaction {
            id: self.next_id,
            kind,
            amount,
            timestamp: at,
        }))
    }
}
