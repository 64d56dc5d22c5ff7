//! Transaction intent: the proposed money movement
//!
//! An intent is immutable once submitted. Validation happens at
//! construction so a `TransactionIntent` in hand is always well-formed;
//! the orchestrator re-validates on `initiate` because intents may also
//! arrive through deserialization.

use crate::errors::{CustosError, CustosResult};
use crate::identifiers::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of money movement being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Withdrawal to an external address
    Withdrawal,
    /// Transfer between platform wallets
    Transfer,
    /// Cold-storage to hot-wallet movement
    ColdToHot,
    /// Hot-wallet to cold-storage movement
    HotToCold,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Withdrawal => write!(f, "withdrawal"),
            Self::Transfer => write!(f, "transfer"),
            Self::ColdToHot => write!(f, "cold_to_hot"),
            Self::HotToCold => write!(f, "hot_to_cold"),
        }
    }
}

/// The proposed action gated by the authorization pipeline
///
/// Field order is fixed; the canonical transaction hash commits to the
/// DAG-CBOR encoding of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    /// Unique transaction identifier
    pub id: TransactionId,
    /// Kind of movement
    pub kind: TransactionKind,
    /// Amount in `currency` units; strictly positive
    pub amount: Decimal,
    /// Source wallet or account reference
    pub source_ref: String,
    /// Destination wallet or address reference
    pub destination_ref: String,
    /// Currency code
    pub currency: String,
    /// Human-readable justification for the movement
    pub justification: String,
}

impl TransactionIntent {
    /// Build a validated intent with a fresh transaction id
    pub fn new(
        kind: TransactionKind,
        amount: Decimal,
        source_ref: impl Into<String>,
        destination_ref: impl Into<String>,
        currency: impl Into<String>,
        justification: impl Into<String>,
    ) -> CustosResult<Self> {
        let intent = Self {
            id: TransactionId::new(),
            kind,
            amount,
            source_ref: source_ref.into(),
            destination_ref: destination_ref.into(),
            currency: currency.into(),
            justification: justification.into(),
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Re-check the construction invariants
    ///
    /// `amount` must be strictly positive and both endpoint references must
    /// be present.
    pub fn validate(&self) -> CustosResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(CustosError::invalid_intent(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.source_ref.trim().is_empty() {
            return Err(CustosError::invalid_intent("source reference is missing"));
        }
        if self.destination_ref.trim().is_empty() {
            return Err(CustosError::invalid_intent(
                "destination reference is missing",
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(CustosError::invalid_intent("currency is missing"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(amount: Decimal) -> CustosResult<TransactionIntent> {
        TransactionIntent::new(
            TransactionKind::Withdrawal,
            amount,
            "wallet:ops",
            "addr:bc1q9yv",
            "BTC",
            "operations payout",
        )
    }

    #[test]
    fn test_valid_intent() {
        let intent = intent(Decimal::from(5_000)).unwrap();
        assert_eq!(intent.kind, TransactionKind::Withdrawal);
        assert_eq!(intent.amount, Decimal::from(5_000));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(matches!(
            intent(Decimal::ZERO),
            Err(CustosError::InvalidIntent { .. })
        ));
        assert!(matches!(
            intent(Decimal::from(-10)),
            Err(CustosError::InvalidIntent { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_destination() {
        let result = TransactionIntent::new(
            TransactionKind::Transfer,
            Decimal::from(100),
            "wallet:ops",
            "  ",
            "ETH",
            "rebalance",
        );
        assert!(matches!(result, Err(CustosError::InvalidIntent { .. })));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionKind::ColdToHot).unwrap();
        assert_eq!(json, "\"cold_to_hot\"");
    }
}
