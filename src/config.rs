//! Node configuration: where the contracts live and how to reach them.

#![cfg(feature = "server")]

use alloy_primitives::{Address, address};
use std::time::Duration;

use crate::error::{BankError, Result};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
/// First contract deployed by the default anvil account.
pub const DEFAULT_TOKEN_ADDRESS: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
/// Second contract deployed by the default anvil account.
pub const DEFAULT_BANK_ADDRESS: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub token_address: Address,
    pub bank_address: Address,
    pub private_key: Option<String>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn new(
        rpc_url: String,
        token_address: &str,
        bank_address: &str,
        private_key: Option<String>,
        poll_interval_ms: u64,
    ) -> Result<Self> {
        let token_address = parse_address("token", token_address)?;
        let bank_address = parse_address("bank", bank_address)?;
        if token_address == bank_address {
            return Err(BankError::Config(
                "token and bank addresses must differ".to_string(),
            ));
        }
        if poll_interval_ms == 0 {
            return Err(BankError::Config(
                "poll interval must be positive".to_string(),
            ));
        }

        Ok(Self {
            rpc_url,
            token_address,
            bank_address,
            private_key: private_key.filter(|k| !k.trim().is_empty()),
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            token_address: DEFAULT_TOKEN_ADDRESS,
            bank_address: DEFAULT_BANK_ADDRESS,
            private_key: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

fn parse_address(label: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|e| BankError::Config(format!("invalid {} address '{}': {}", label, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_addresses() {
        let config = Config::new(
            DEFAULT_RPC_URL.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
            Some("  ".to_string()),
            500,
        )
        .unwrap();
        assert_eq!(config.token_address, DEFAULT_TOKEN_ADDRESS);
        assert_eq!(config.bank_address, DEFAULT_BANK_ADDRESS);
        assert_eq!(config.private_key, None);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let bad_address = Config::new(DEFAULT_RPC_URL.to_string(), "0x1234", "0x1234", None, 1000);
        assert!(matches!(bad_address, Err(BankError::Config(_))));

        let same = Config::new(
            DEFAULT_RPC_URL.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            None,
            1000,
        );
        assert!(matches!(same, Err(BankError::Config(_))));

        let no_poll = Config::new(
            DEFAULT_RPC_URL.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512",
            None,
            0,
        );
        assert!(matches!(no_poll, Err(BankError::Config(_))));
    }
}
