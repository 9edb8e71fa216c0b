use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// A state-changing operation the user can submit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Approve,
    Deposit,
    Withdraw,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Approve, Action::Deposit, Action::Withdraw];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Approve => write!(f, "approve"),
            Action::Deposit => write!(f, "deposit"),
            Action::Withdraw => write!(f, "withdraw"),
        }
    }
}

/// The four read queries that make up a balance snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    TokenBalance,
    BankBalance,
    Allowance,
    TokenMetadata,
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::TokenBalance => write!(f, "token balance"),
            Query::BankBalance => write!(f, "bank balance"),
            Query::Allowance => write!(f, "allowance"),
            Query::TokenMetadata => write!(f, "token metadata"),
        }
    }
}

/// Wallet connection as reported by the wallet provider.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Connection {
    pub account: Option<Address>,
}

impl Connection {
    pub fn connected(account: Address) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Outcome of waiting for a transaction to be included.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub hash: B256,
    pub block_number: Option<u64>,
    /// `false` when the contract reverted.
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub action: Action,
    pub hash: B256,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl PendingTransaction {
    pub fn new(action: Action, hash: B256) -> Self {
        Self {
            action,
            hash,
            submitted_at: chrono::Utc::now(),
        }
    }
}

/// Static deployment details shown on the info page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub rpc_url: String,
    pub chain_id: Option<u64>,
    pub token_address: Address,
    pub bank_address: Address,
    pub account: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let names: Vec<String> = Action::ALL.iter().map(|a| a.to_string()).collect();
        assert_eq!(names, vec!["approve", "deposit", "withdraw"]);
    }

    #[test]
    fn test_connection_default_is_disconnected() {
        let connection = Connection::default();
        assert!(!connection.is_connected());
        assert!(Connection::connected(Address::repeat_byte(0x11)).is_connected());
    }

    #[test]
    fn test_pending_transaction_serializes() {
        let tx = PendingTransaction::new(Action::Deposit, B256::repeat_byte(0xab));
        let json = serde_json::to_string(&tx).unwrap();
        let back: PendingTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
