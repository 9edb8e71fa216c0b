//! Browser side of the contract seam.
//!
//! Each call crosses to the node through a server function. Domain errors
//! travel inside the `Ok` branch so the dashboard sees the same
//! [`BankError`] the node produced; transport failures are classified by the
//! operation that hit them.

use alloy_primitives::{Address, B256, U256};
use dioxus::prelude::*;

use crate::bank::{TokenBank, WalletProvider};
use crate::error::{BankError, Result as BankResult};
use crate::model::{Action, Confirmation, Connection, DeploymentInfo, Query, TokenMetadata};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerBank;

fn flatten<T>(
    response: Result<BankResult<T>, ServerFnError>,
    classify: impl FnOnce(String) -> BankError,
) -> BankResult<T> {
    match response {
        Ok(inner) => inner,
        Err(e) => Err(classify(e.to_string())),
    }
}

impl WalletProvider for ServerBank {
    async fn connection(&self) -> BankResult<Connection> {
        flatten(wallet_connection_server().await, BankError::Rpc)
    }

    async fn connect(&self) -> BankResult<Connection> {
        flatten(connect_wallet_server().await, BankError::Rpc)
    }

    async fn disconnect(&self) -> BankResult<()> {
        flatten(disconnect_wallet_server().await, BankError::Rpc)
    }
}

impl TokenBank for ServerBank {
    async fn token_balance(&self, owner: Address) -> BankResult<U256> {
        flatten(token_balance_server(owner).await, |e| {
            BankError::query(Query::TokenBalance, e)
        })
    }

    async fn bank_balance(&self, owner: Address) -> BankResult<U256> {
        flatten(bank_balance_server(owner).await, |e| {
            BankError::query(Query::BankBalance, e)
        })
    }

    async fn allowance(&self, owner: Address) -> BankResult<U256> {
        flatten(allowance_server(owner).await, |e| {
            BankError::query(Query::Allowance, e)
        })
    }

    async fn token_metadata(&self) -> BankResult<TokenMetadata> {
        flatten(token_metadata_server().await, |e| {
            BankError::query(Query::TokenMetadata, e)
        })
    }

    async fn approve(&self, amount: U256) -> BankResult<B256> {
        flatten(submit_server(Action::Approve, amount).await, |e| {
            BankError::submission(Action::Approve, e)
        })
    }

    async fn deposit(&self, amount: U256) -> BankResult<B256> {
        flatten(submit_server(Action::Deposit, amount).await, |e| {
            BankError::submission(Action::Deposit, e)
        })
    }

    async fn withdraw(&self, amount: U256) -> BankResult<B256> {
        flatten(submit_server(Action::Withdraw, amount).await, |e| {
            BankError::submission(Action::Withdraw, e)
        })
    }

    async fn wait_for_confirmation(&self, hash: B256) -> BankResult<Confirmation> {
        flatten(wait_for_confirmation_server(hash).await, BankError::Rpc)
    }
}

#[cfg(feature = "server")]
async fn on_bank<T, F>(call: impl FnOnce(std::sync::Arc<crate::rpc::RpcTokenBank>) -> F) -> BankResult<T>
where
    F: std::future::Future<Output = BankResult<T>>,
{
    let bank = crate::state::bank().await?;
    call(bank).await
}

#[server]
async fn wallet_connection_server() -> Result<BankResult<Connection>, ServerFnError> {
    Ok(match crate::state::wallet().await {
        Ok(wallet) => wallet.connection().await,
        Err(e) => Err(e),
    })
}

#[server]
async fn connect_wallet_server() -> Result<BankResult<Connection>, ServerFnError> {
    Ok(match crate::state::wallet().await {
        Ok(wallet) => wallet.connect().await,
        Err(e) => Err(e),
    })
}

#[server]
async fn disconnect_wallet_server() -> Result<BankResult<()>, ServerFnError> {
    Ok(match crate::state::wallet().await {
        Ok(wallet) => wallet.disconnect().await,
        Err(e) => Err(e),
    })
}

#[server]
async fn token_balance_server(owner: Address) -> Result<BankResult<U256>, ServerFnError> {
    Ok(on_bank(|bank| async move { bank.token_balance(owner).await }).await)
}

#[server]
async fn bank_balance_server(owner: Address) -> Result<BankResult<U256>, ServerFnError> {
    Ok(on_bank(|bank| async move { bank.bank_balance(owner).await }).await)
}

#[server]
async fn allowance_server(owner: Address) -> Result<BankResult<U256>, ServerFnError> {
    Ok(on_bank(|bank| async move { bank.allowance(owner).await }).await)
}

#[server]
async fn token_metadata_server() -> Result<BankResult<TokenMetadata>, ServerFnError> {
    Ok(on_bank(|bank| async move { bank.token_metadata().await }).await)
}

#[server]
async fn submit_server(
    action: Action,
    amount: U256,
) -> Result<BankResult<B256>, ServerFnError> {
    log::info!("Web request: {} {}", action, amount);
    Ok(on_bank(|bank| async move { bank.submit(action, amount).await }).await)
}

// Holds the request open until the receipt shows up.
#[server]
async fn wait_for_confirmation_server(
    hash: B256,
) -> Result<BankResult<Confirmation>, ServerFnError> {
    Ok(on_bank(|bank| async move { bank.wait_for_confirmation(hash).await }).await)
}

#[server]
pub async fn deployment_info_server() -> Result<DeploymentInfo, ServerFnError> {
    let info = crate::state::LOCAL_APP_STATE.lock().await.deployment_info()?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keeps_domain_error() {
        let response: Result<BankResult<U256>, ServerFnError> =
            Ok(Err(BankError::NotConnected));
        assert_eq!(
            flatten(response, BankError::Rpc),
            Err(BankError::NotConnected)
        );
    }

    #[test]
    fn test_flatten_classifies_transport_error() {
        let response: Result<BankResult<B256>, ServerFnError> =
            Err(ServerFnError::new("connection reset"));
        let error = flatten(response, |e| BankError::submission(Action::Deposit, e)).unwrap_err();
        assert!(matches!(
            error,
            BankError::Submission {
                action: Action::Deposit,
                ..
            }
        ));
    }
}
