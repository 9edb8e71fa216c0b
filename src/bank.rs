//! Seams between the dashboard and the outside world.
//!
//! The dashboard only ever talks to a [`WalletProvider`] for connection state
//! and to a [`TokenBank`] for the token and bank contracts. The node implements
//! both over JSON-RPC (`rpc`, `wallet`), the browser over server functions
//! (`remote`), and the tests over in-memory mocks.

use alloy_primitives::{Address, B256, U256};

use crate::error::Result;
use crate::model::{Action, Confirmation, Connection, TokenMetadata};

#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    async fn connection(&self) -> Result<Connection>;
    async fn connect(&self) -> Result<Connection>;
    async fn disconnect(&self) -> Result<()>;
}

#[allow(async_fn_in_trait)]
pub trait TokenBank {
    /// `balanceOf(owner)` on the token.
    async fn token_balance(&self, owner: Address) -> Result<U256>;
    /// `balances(owner)` on the bank.
    async fn bank_balance(&self, owner: Address) -> Result<U256>;
    /// `allowance(owner, bank)` on the token.
    async fn allowance(&self, owner: Address) -> Result<U256>;
    async fn token_metadata(&self) -> Result<TokenMetadata>;

    /// `approve(bank, amount)` on the token.
    async fn approve(&self, amount: U256) -> Result<B256>;
    async fn deposit(&self, amount: U256) -> Result<B256>;
    async fn withdraw(&self, amount: U256) -> Result<B256>;

    /// Resolves once the transaction is included, however long that takes.
    async fn wait_for_confirmation(&self, hash: B256) -> Result<Confirmation>;

    async fn submit(&self, action: Action, amount: U256) -> Result<B256> {
        match action {
            Action::Approve => self.approve(amount).await,
            Action::Deposit => self.deposit(amount).await,
            Action::Withdraw => self.withdraw(amount).await,
        }
    }
}
