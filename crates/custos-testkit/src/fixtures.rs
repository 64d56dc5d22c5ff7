//! Intent fixtures

use custos_core::{CustosResult, TransactionIntent, TransactionKind};
use rust_decimal::Decimal;

/// Builder for well-formed test intents
///
/// Defaults describe a routine treasury withdrawal; override what the test
/// cares about.
#[derive(Debug, Clone)]
pub struct IntentBuilder {
    kind: TransactionKind,
    amount: Decimal,
    source_ref: String,
    destination_ref: String,
    currency: String,
    justification: String,
}

impl Default for IntentBuilder {
    fn default() -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            amount: Decimal::from(5_000),
            source_ref: "wallet:ops".to_string(),
            destination_ref: "addr:bc1q9yv".to_string(),
            currency: "BTC".to_string(),
            justification: "operations payout".to_string(),
        }
    }
}

impl IntentBuilder {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transaction kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the amount
    pub fn amount(mut self, amount: impl Into<Decimal>) -> Self {
        self.amount = amount.into();
        self
    }

    /// Set the source reference
    pub fn source(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = source_ref.into();
        self
    }

    /// Set the destination reference
    pub fn destination(mut self, destination_ref: impl Into<String>) -> Self {
        self.destination_ref = destination_ref.into();
        self
    }

    /// Set the currency code
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Build the validated intent
    pub fn build(self) -> CustosResult<TransactionIntent> {
        TransactionIntent::new(
            self.kind,
            self.amount,
            self.source_ref,
            self.destination_ref,
            self.currency,
            self.justification,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder_is_valid() {
        let intent = IntentBuilder::new().build().unwrap();
        assert_eq!(intent.kind, TransactionKind::Withdrawal);
        assert_eq!(intent.amount, Decimal::from(5_000));
    }

    #[test]
    fn test_overrides() {
        let intent = IntentBuilder::new()
            .kind(TransactionKind::ColdToHot)
            .amount(120_000)
            .destination("addr:fresh")
            .build()
            .unwrap();
        assert_eq!(intent.kind, TransactionKind::ColdToHot);
        assert_eq!(intent.amount, Decimal::from(120_000));
        assert_eq!(intent.destination_ref, "addr:fresh");
    }
}
