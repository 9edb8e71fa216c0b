//! JSON-RPC implementation of [`TokenBank`], used by the node.

#![cfg(feature = "server")]

use std::sync::Arc;
use std::time::Duration;

use alloy::network::ReceiptResponse;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::http::reqwest::Url;
use alloy_primitives::{Address, B256, U256};

use crate::bank::TokenBank;
use crate::config::Config;
use crate::contracts::{IERC20, ITokenBank};
use crate::error::{BankError, Result};
use crate::model::{Action, Confirmation, Query, TokenMetadata};
use crate::wallet::LocalWallet;

pub struct RpcTokenBank {
    provider: DynProvider,
    wallet: Arc<LocalWallet>,
    rpc_url: String,
    token: Address,
    bank: Address,
    poll_interval: Duration,
}

impl RpcTokenBank {
    pub fn new(config: &Config, wallet: Arc<LocalWallet>) -> Result<Self> {
        let url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| BankError::Config(format!("invalid rpc url '{}': {}", config.rpc_url, e)))?;

        let provider = match wallet.ethereum_wallet() {
            Some(signer) => ProviderBuilder::new()
                .wallet(signer)
                .connect_http(url)
                .erased(),
            None => {
                log::warn!("No private key configured, the dashboard will be read-only");
                ProviderBuilder::new().connect_http(url).erased()
            }
        };

        log::debug!(
            "Token at {}, bank at {}, rpc {}",
            config.token_address,
            config.bank_address,
            config.rpc_url
        );

        Ok(Self {
            provider,
            wallet,
            rpc_url: config.rpc_url.clone(),
            token: config.token_address,
            bank: config.bank_address,
            poll_interval: config.poll_interval,
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn token_address(&self) -> Address {
        self.token
    }

    pub fn bank_address(&self) -> Address {
        self.bank
    }

    pub async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| BankError::Rpc(e.to_string()))
    }

    fn token_contract(&self) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(self.token, self.provider.clone())
    }

    fn bank_contract(&self) -> ITokenBank::ITokenBankInstance<DynProvider> {
        ITokenBank::new(self.bank, self.provider.clone())
    }
}

impl TokenBank for RpcTokenBank {
    async fn token_balance(&self, owner: Address) -> Result<U256> {
        self.token_contract()
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| BankError::query(Query::TokenBalance, e))
    }

    async fn bank_balance(&self, owner: Address) -> Result<U256> {
        self.bank_contract()
            .balances(owner)
            .call()
            .await
            .map_err(|e| BankError::query(Query::BankBalance, e))
    }

    async fn allowance(&self, owner: Address) -> Result<U256> {
        self.token_contract()
            .allowance(owner, self.bank)
            .call()
            .await
            .map_err(|e| BankError::query(Query::Allowance, e))
    }

    async fn token_metadata(&self) -> Result<TokenMetadata> {
        let token = self.token_contract();
        let (name, symbol, decimals) = futures::try_join!(
            async { token.name().call().await },
            async { token.symbol().call().await },
            async { token.decimals().call().await },
        )
        .map_err(|e| BankError::query(Query::TokenMetadata, e))?;
        Ok(TokenMetadata {
            name,
            symbol,
            decimals,
        })
    }

    async fn approve(&self, amount: U256) -> Result<B256> {
        self.wallet.active_account()?;
        let pending = self
            .token_contract()
            .approve(self.bank, amount)
            .send()
            .await
            .map_err(|e| BankError::submission(Action::Approve, e))?;
        Ok(*pending.tx_hash())
    }

    async fn deposit(&self, amount: U256) -> Result<B256> {
        self.wallet.active_account()?;
        let pending = self
            .bank_contract()
            .deposit(amount)
            .send()
            .await
            .map_err(|e| BankError::submission(Action::Deposit, e))?;
        Ok(*pending.tx_hash())
    }

    async fn withdraw(&self, amount: U256) -> Result<B256> {
        self.wallet.active_account()?;
        let pending = self
            .bank_contract()
            .withdraw(amount)
            .send()
            .await
            .map_err(|e| BankError::submission(Action::Withdraw, e))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, hash: B256) -> Result<Confirmation> {
        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    return Ok(Confirmation {
                        hash,
                        block_number: receipt.block_number,
                        success: receipt.status(),
                    });
                }
                Ok(None) => log::debug!("{} not yet included", hash),
                Err(e) => log::warn!("Receipt poll for {} failed, retrying: {}", hash, e),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = Config {
            rpc_url: "not a url".to_string(),
            ..Config::default()
        };
        let wallet = Arc::new(LocalWallet::new(None).unwrap());
        assert!(matches!(
            RpcTokenBank::new(&config, wallet),
            Err(BankError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_writes_require_connected_wallet() {
        let wallet = Arc::new(
            LocalWallet::new(Some(
                "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            ))
            .unwrap(),
        );
        let bank = RpcTokenBank::new(&Config::default(), wallet).unwrap();

        assert_eq!(bank.token_address(), crate::config::DEFAULT_TOKEN_ADDRESS);
        assert_eq!(bank.deposit(U256::from(1u64)).await, Err(BankError::NotConnected));
        assert_eq!(bank.withdraw(U256::from(1u64)).await, Err(BankError::NotConnected));
    }
}
