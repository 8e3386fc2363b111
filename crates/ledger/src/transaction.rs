use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Kind of a recorded transaction; decides the sign of its effect on balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }

    /// Parse the wire name. Exact, case-sensitive match.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger-assigned transaction id. Dense, starting at 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub i64);

impl TransactionId {
    pub const FIRST: TransactionId = TransactionId(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A positive, finite monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, LedgerError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(LedgerError::InvalidAmount(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = LedgerError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

/// One accepted deposit or withdrawal. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Signed effect of this transaction on the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Deposit => self.amount.value(),
            TransactionKind::Withdrawal => -self.amount.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_rejects_non_positive_and_non_finite() {
        for bad in [0.0, -0.0, -5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(Amount::new(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(Amount::new(0.01).unwrap().value(), 0.01);
    }

    #[test]
    fn kind_parse_is_exact() {
        assert_eq!(TransactionKind::parse("deposit"), Some(TransactionKind::Deposit));
        assert_eq!(TransactionKind::parse("withdrawal"), Some(TransactionKind::Withdrawal));
        assert_eq!(TransactionKind::parse("transfer"), None);
        assert_eq!(TransactionKind::parse("Deposit"), None);
        assert_eq!(TransactionKind::parse(""), None);
    }

    #[test]
    fn transaction_wire_shape() {
        let tx = Transaction {
            id: TransactionId(7),
            kind: TransactionKind::Withdrawal,
            amount: Amount::new(12.5).unwrap(),
            timestamp: "2024-05-01T10:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], "withdrawal");
        assert_eq!(json["amount"], 12.5);
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00Z");
        assert_eq!(tx.signed_amount(), -12.5);
    }

    #[test]
    fn negative_amount_does_not_deserialize() {
        let raw = r#"{"id":1,"type":"deposit","amount":-1.0,"timestamp":"2024-05-01T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Transaction>(raw).is_err());
    }
}
