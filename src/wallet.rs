#![cfg(feature = "server")]

use std::sync::atomic::{AtomicBool, Ordering};

use alloy::network::EthereumWallet;
use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::Address;

use crate::bank::WalletProvider;
use crate::error::{BankError, Result};
use crate::model::Connection;

/// Key-backed wallet held by the node. "Connecting" activates the key for
/// the dashboard; while disconnected no transaction is signed.
#[derive(Debug)]
pub struct LocalWallet {
    signer: Option<PrivateKeySigner>,
    connected: AtomicBool,
}

impl LocalWallet {
    pub fn new(private_key: Option<&str>) -> Result<Self> {
        let signer = match private_key {
            Some(key) => Some(
                key.trim()
                    .parse::<PrivateKeySigner>()
                    .map_err(|e| BankError::Config(format!("invalid private key: {}", e)))?,
            ),
            None => None,
        };
        Ok(Self {
            signer,
            connected: AtomicBool::new(false),
        })
    }

    pub fn address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.address())
    }

    /// The account allowed to sign right now.
    pub fn active_account(&self) -> Result<Address> {
        match self.address() {
            Some(address) if self.connected.load(Ordering::SeqCst) => Ok(address),
            _ => Err(BankError::NotConnected),
        }
    }

    pub fn ethereum_wallet(&self) -> Option<EthereumWallet> {
        self.signer.clone().map(EthereumWallet::from)
    }

    fn current(&self) -> Connection {
        Connection {
            account: self.active_account().ok(),
        }
    }
}

impl WalletProvider for LocalWallet {
    async fn connection(&self) -> Result<Connection> {
        Ok(self.current())
    }

    async fn connect(&self) -> Result<Connection> {
        let Some(address) = self.address() else {
            return Err(BankError::NoSigner);
        };
        self.connected.store(true, Ordering::SeqCst);
        log::info!("Account {} connected", address);
        Ok(Connection::connected(address))
    }

    async fn disconnect(&self) -> Result<()> {
        if self.connected.swap(false, Ordering::SeqCst) {
            log::info!("Account disconnected");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    // first default anvil account
    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ANVIL_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let wallet = LocalWallet::new(Some(ANVIL_KEY)).unwrap();
        assert_eq!(wallet.address(), Some(ANVIL_ADDRESS));
        assert!(!wallet.connection().await.unwrap().is_connected());
        assert_eq!(wallet.active_account(), Err(BankError::NotConnected));

        let connection = wallet.connect().await.unwrap();
        assert_eq!(connection.account, Some(ANVIL_ADDRESS));
        assert_eq!(wallet.active_account(), Ok(ANVIL_ADDRESS));

        wallet.disconnect().await.unwrap();
        assert!(!wallet.connection().await.unwrap().is_connected());
    }

    #[tokio::test]
    async fn test_connect_without_key() {
        let wallet = LocalWallet::new(None).unwrap();
        assert!(wallet.ethereum_wallet().is_none());
        assert_eq!(wallet.connect().await, Err(BankError::NoSigner));
    }

    #[test]
    fn test_invalid_key_is_a_config_error() {
        assert!(matches!(
            LocalWallet::new(Some("not-a-key")),
            Err(BankError::Config(_))
        ));
    }
}
