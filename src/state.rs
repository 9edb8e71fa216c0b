#![cfg(feature = "server")]

// pour singleton
use lazy_static::lazy_static;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{BankError, Result};
use crate::model::DeploymentInfo;
use crate::rpc::RpcTokenBank;
use crate::wallet::LocalWallet;

/// Backend shared by the server functions and the console.
#[derive(Default)]
pub struct AppState {
    pub config: Option<Config>,
    pub wallet: Option<Arc<LocalWallet>>,
    pub bank: Option<Arc<RpcTokenBank>>,
    pub chain_id: Option<u64>,
}

impl AppState {
    pub fn install(
        &mut self,
        config: Config,
        wallet: Arc<LocalWallet>,
        bank: Arc<RpcTokenBank>,
        chain_id: Option<u64>,
    ) {
        self.config = Some(config);
        self.wallet = Some(wallet);
        self.bank = Some(bank);
        self.chain_id = chain_id;
    }

    pub fn get_bank(&self) -> Result<Arc<RpcTokenBank>> {
        self.bank.clone().ok_or_else(not_ready)
    }

    pub fn get_wallet(&self) -> Result<Arc<LocalWallet>> {
        self.wallet.clone().ok_or_else(not_ready)
    }

    pub fn deployment_info(&self) -> Result<DeploymentInfo> {
        let config = self.config.as_ref().ok_or_else(not_ready)?;
        let account = match &self.wallet {
            Some(wallet) => wallet.active_account().ok(),
            None => None,
        };
        Ok(DeploymentInfo {
            rpc_url: config.rpc_url.clone(),
            chain_id: self.chain_id,
            token_address: config.token_address,
            bank_address: config.bank_address,
            account,
        })
    }
}

fn not_ready() -> BankError {
    BankError::Config("backend is not initialised".to_string())
}

// Singleton
lazy_static! {
    pub static ref LOCAL_APP_STATE: Arc<tokio::sync::Mutex<AppState>> =
        Arc::new(tokio::sync::Mutex::new(AppState::default()));
}

pub async fn bank() -> Result<Arc<RpcTokenBank>> {
    LOCAL_APP_STATE.lock().await.get_bank()
}

pub async fn wallet() -> Result<Arc<LocalWallet>> {
    LOCAL_APP_STATE.lock().await.get_wallet()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_is_not_ready() {
        let state = AppState::default();
        assert!(state.get_bank().is_err());
        assert!(state.get_wallet().is_err());
        assert!(state.deployment_info().is_err());
    }

    #[test]
    fn test_deployment_info_after_install() {
        let config = Config::default();
        let wallet = Arc::new(LocalWallet::new(None).unwrap());
        let bank = Arc::new(RpcTokenBank::new(&config, wallet.clone()).unwrap());
        let mut state = AppState::default();
        state.install(config.clone(), wallet, bank, Some(31337));

        let info = state.deployment_info().unwrap();
        assert_eq!(info.rpc_url, config.rpc_url);
        assert_eq!(info.chain_id, Some(31337));
        assert_eq!(info.bank_address, config.bank_address);
        assert_eq!(info.account, None);
    }
}
