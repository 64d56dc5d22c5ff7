//! Unified error system for the Custos pipeline
//!
//! A single error type covers the whole authorization taxonomy. Validation
//! and business-rule violations are ordinary `Err` values surfaced to the
//! caller; nothing in this crate is fatal at process level. Every error is
//! scoped to one transaction's authorization attempt.

use serde::{Deserialize, Serialize};

/// Unified error type for all Custos operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum CustosError {
    /// The submitted intent failed validation (non-positive amount,
    /// missing destination)
    #[error("Invalid intent: {message}")]
    InvalidIntent {
        /// Description of the validation failure
        message: String,
    },

    /// No policy rule matches the transaction
    #[error("No matching policy: {message}")]
    PolicyNotFound {
        /// Description of the unmatched lookup
        message: String,
    },

    /// The actor's role is not in the policy's eligible set
    #[error("Not eligible: {message}")]
    NotEligible {
        /// Description of the eligibility failure
        message: String,
    },

    /// The actor already voted on this transaction
    #[error("Duplicate vote: {message}")]
    DuplicateVote {
        /// Description of the duplicate attempt
        message: String,
    },

    /// The authorization's expiry window has elapsed
    #[error("Authorization expired: {message}")]
    ExpiredAuthorization {
        /// Description of the expired operation
        message: String,
    },

    /// The authorization reached a state that refuses this operation
    #[error("Lifecycle violation: {message}")]
    TerminalState {
        /// Description of the refused transition
        message: String,
    },

    /// A signature failed cryptographic verification, or a verified
    /// signature record was asked to change
    #[error("Signature verification failed: {message}")]
    SignatureVerification {
        /// Description of the verification failure
        message: String,
    },

    /// `execute` (or `sign`) was called before the required threshold was met
    #[error("Threshold not met: {message}")]
    ThresholdNotMet {
        /// Description of the unmet threshold
        message: String,
    },

    /// The referenced key does not exist in the Key Vault
    #[error("Key not found: {message}")]
    KeyNotFound {
        /// Description of the missing key
        message: String,
    },

    /// The referenced key has been revoked by Key Vault policy
    #[error("Key revoked: {message}")]
    KeyRevoked {
        /// Description of the revoked key
        message: String,
    },

    /// A conflicting concurrent write was detected; the caller should retry
    #[error("Concurrent modification: {message}")]
    ConcurrentModification {
        /// Description of the conflict
        message: String,
    },

    /// The referenced authorization does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Description of what was not found
        message: String,
    },

    /// Serialization or canonical encoding failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the encoding failure
        message: String,
    },

    /// The persistence gateway failed
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl CustosError {
    /// Create an invalid intent error
    pub fn invalid_intent(message: impl Into<String>) -> Self {
        Self::InvalidIntent {
            message: message.into(),
        }
    }

    /// Create a policy not found error
    pub fn policy_not_found(message: impl Into<String>) -> Self {
        Self::PolicyNotFound {
            message: message.into(),
        }
    }

    /// Create a not eligible error
    pub fn not_eligible(message: impl Into<String>) -> Self {
        Self::NotEligible {
            message: message.into(),
        }
    }

    /// Create a duplicate vote error
    pub fn duplicate_vote(message: impl Into<String>) -> Self {
        Self::DuplicateVote {
            message: message.into(),
        }
    }

    /// Create an expired authorization error
    pub fn expired(message: impl Into<String>) -> Self {
        Self::ExpiredAuthorization {
            message: message.into(),
        }
    }

    /// Create a terminal state error
    pub fn terminal_state(message: impl Into<String>) -> Self {
        Self::TerminalState {
            message: message.into(),
        }
    }

    /// Create a signature verification error
    pub fn signature_verification(message: impl Into<String>) -> Self {
        Self::SignatureVerification {
            message: message.into(),
        }
    }

    /// Create a threshold not met error
    pub fn threshold_not_met(message: impl Into<String>) -> Self {
        Self::ThresholdNotMet {
            message: message.into(),
        }
    }

    /// Create a key not found error
    pub fn key_not_found(message: impl Into<String>) -> Self {
        Self::KeyNotFound {
            message: message.into(),
        }
    }

    /// Create a key revoked error
    pub fn key_revoked(message: impl Into<String>) -> Self {
        Self::KeyRevoked {
            message: message.into(),
        }
    }

    /// Create a concurrent modification error
    pub fn concurrent_modification(message: impl Into<String>) -> Self {
        Self::ConcurrentModification {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller should retry the same operation
    ///
    /// Only contention conflicts are retryable. Validation and business-rule
    /// errors are final and must never be retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

/// Standard Result type for Custos operations
pub type CustosResult<T> = std::result::Result<T, CustosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CustosError::duplicate_vote("actor-1 already voted");
        assert!(matches!(err, CustosError::DuplicateVote { .. }));
        assert_eq!(err.to_string(), "Duplicate vote: actor-1 already voted");
    }

    #[test]
    fn test_only_contention_is_retryable() {
        assert!(CustosError::concurrent_modification("version 2 != 3").is_retryable());
        assert!(!CustosError::duplicate_vote("x").is_retryable());
        assert!(!CustosError::expired("x").is_retryable());
        assert!(!CustosError::storage("x").is_retryable());
    }

    #[test]
    fn test_errors_serialize() {
        let err = CustosError::threshold_not_met("3 of 4 approvals");
        let json = serde_json::to_string(&err).unwrap();
        let back: CustosError = serde_json::from_str(&json).unwrap();
        assert_eq!(err.to_string(), back.to_string());
    }
}
