use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::amount::AmountError;
use crate::model::{Action, Query};

/// Every failure the dashboard can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum BankError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("no signing key is configured for this node")]
    NoSigner,
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("allowance does not cover the requested amount, approve first")]
    InsufficientAllowance,
    #[error("{0} is already in progress")]
    Busy(Action),
    #[error("{query} query failed: {reason}")]
    Query { query: Query, reason: String },
    #[error("{action} submission failed: {reason}")]
    Submission { action: Action, reason: String },
    #[error("transaction {hash} reverted")]
    Reverted { hash: B256 },
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BankError>;

impl BankError {
    pub fn query(query: Query, reason: impl std::fmt::Display) -> Self {
        BankError::Query {
            query,
            reason: reason.to_string(),
        }
    }

    pub fn submission(action: Action, reason: impl std::fmt::Display) -> Self {
        BankError::Submission {
            action,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BankError::query(Query::Allowance, "timeout").to_string(),
            "allowance query failed: timeout"
        );
        assert_eq!(
            BankError::submission(Action::Withdraw, "user rejected").to_string(),
            "withdraw submission failed: user rejected"
        );
        assert_eq!(
            BankError::from(AmountError::Negative).to_string(),
            "amount cannot be negative"
        );
    }
}
