//! Dashboard state and the flows that drive it.
//!
//! [`DashboardState`] is plain data: the web page keeps it in a Dioxus signal,
//! the console keeps it in a local variable. The flows below are generic over
//! a [`StateCell`] and never hold the state borrowed across an `.await`, so an
//! approve, a deposit and a withdraw can all be waiting for confirmation at
//! the same time.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::amount::{self, AmountError, DEFAULT_DECIMALS};
use crate::bank::{TokenBank, WalletProvider};
use crate::error::BankError;
use crate::model::{Action, Confirmation, Connection, PendingTransaction, Query, TokenMetadata};

const FALLBACK_NAME: &str = "Token";
const FALLBACK_SYMBOL: &str = "BERC20";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BalanceSnapshot {
    pub token_balance: Option<U256>,
    pub bank_balance: Option<U256>,
    pub allowance: Option<U256>,
    pub metadata: Option<TokenMetadata>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Lifecycle of one action: `Idle -> Submitting -> AwaitingConfirmation -> Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation(PendingTransaction),
}

static IDLE: TxPhase = TxPhase::Idle;

/// Which button the deposit card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositStep {
    Approve,
    Deposit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Wallet,
    Query,
    Submission,
    Reverted,
    Confirmation,
}

/// A user-visible error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub action: Option<Action>,
    pub message: String,
}

/// `true` while the allowance is unloaded or smaller than the requested amount.
pub fn needs_approval(allowance: Option<U256>, requested: U256) -> bool {
    match allowance {
        Some(allowance) => allowance < requested,
        None => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub connection: Connection,
    pub snapshot: BalanceSnapshot,
    pub deposit_input: String,
    pub withdraw_input: String,
    pub notices: Vec<Notice>,
    pub last_confirmed: Option<Confirmation>,
    pub refreshing: bool,
    refresh_generation: u64,
    phases: HashMap<Action, TxPhase>,
    sent_inputs: HashMap<Action, String>,
}

/// Results of the four read queries of one refresh.
#[derive(Debug)]
pub struct RefreshReads {
    pub token_balance: crate::error::Result<U256>,
    pub bank_balance: crate::error::Result<U256>,
    pub allowance: crate::error::Result<U256>,
    pub metadata: crate::error::Result<TokenMetadata>,
}

impl DashboardState {
    pub fn account(&self) -> Option<Address> {
        self.connection.account
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn decimals(&self) -> u8 {
        self.snapshot
            .metadata
            .as_ref()
            .map(|m| m.decimals)
            .unwrap_or(DEFAULT_DECIMALS)
    }

    pub fn token_name(&self) -> &str {
        self.snapshot
            .metadata
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or(FALLBACK_NAME)
    }

    pub fn token_symbol(&self) -> &str {
        self.snapshot
            .metadata
            .as_ref()
            .map(|m| m.symbol.as_str())
            .unwrap_or(FALLBACK_SYMBOL)
    }

    pub fn token_balance_display(&self) -> String {
        amount::format_or_zero(self.snapshot.token_balance, self.decimals())
    }

    pub fn bank_balance_display(&self) -> String {
        amount::format_or_zero(self.snapshot.bank_balance, self.decimals())
    }

    pub fn allowance_display(&self) -> String {
        amount::format_or_zero(self.snapshot.allowance, self.decimals())
    }

    pub fn requested_deposit(&self) -> Result<U256, AmountError> {
        amount::parse_amount(&self.deposit_input, self.decimals())
    }

    pub fn requested_withdraw(&self) -> Result<U256, AmountError> {
        amount::parse_amount(&self.withdraw_input, self.decimals())
    }

    pub fn needs_approval(&self) -> bool {
        match self.requested_deposit() {
            Ok(requested) => needs_approval(self.snapshot.allowance, requested),
            Err(_) => true,
        }
    }

    /// Empty or unparseable input keeps the (disabled) deposit button.
    pub fn deposit_step(&self) -> DepositStep {
        match self.requested_deposit() {
            Ok(requested) if needs_approval(self.snapshot.allowance, requested) => {
                DepositStep::Approve
            }
            _ => DepositStep::Deposit,
        }
    }

    /// Soft bound only: the withdraw button stays enabled.
    pub fn withdraw_exceeds_balance(&self) -> bool {
        match self.requested_withdraw() {
            Ok(requested) => requested > self.snapshot.bank_balance.unwrap_or(U256::ZERO),
            Err(_) => false,
        }
    }

    pub fn input_error(&self, action: Action) -> Option<AmountError> {
        let parsed = match action {
            Action::Approve | Action::Deposit => self.requested_deposit(),
            Action::Withdraw => self.requested_withdraw(),
        };
        match parsed {
            Err(AmountError::Empty) | Ok(_) => None,
            Err(e) => Some(e),
        }
    }

    pub fn phase(&self, action: Action) -> &TxPhase {
        self.phases.get(&action).unwrap_or(&IDLE)
    }

    pub fn is_submitting(&self) -> bool {
        self.phases.values().any(|p| *p == TxPhase::Submitting)
    }

    pub fn is_awaiting(&self, action: Action) -> bool {
        matches!(self.phase(action), TxPhase::AwaitingConfirmation(_))
    }

    pub fn awaiting(&self) -> Vec<&PendingTransaction> {
        Action::ALL
            .iter()
            .filter_map(|action| match self.phase(*action) {
                TxPhase::AwaitingConfirmation(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    fn input_for(&self, action: Action) -> &str {
        match action {
            Action::Approve | Action::Deposit => &self.deposit_input,
            Action::Withdraw => &self.withdraw_input,
        }
    }

    /// Whether the button for `action` is enabled.
    pub fn can_submit(&self, action: Action) -> bool {
        !self.is_submitting()
            && *self.phase(action) == TxPhase::Idle
            && !self.input_for(action).trim().is_empty()
    }

    pub fn set_connection(&mut self, connection: Connection) {
        if connection.account != self.connection.account {
            self.snapshot = BalanceSnapshot::default();
            self.last_confirmed = None;
        }
        if !connection.is_connected() {
            self.deposit_input.clear();
            self.withdraw_input.clear();
        }
        self.connection = connection;
    }

    pub fn push_notice(&mut self, kind: NoticeKind, action: Option<Action>, message: String) {
        self.notices.push(Notice {
            kind,
            action,
            message,
        });
    }

    pub fn dismiss_notice(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    /// Validate the input for `action` and move it to `Submitting`.
    pub fn begin(&mut self, action: Action) -> Result<U256, BankError> {
        if !self.is_connected() {
            return Err(BankError::NotConnected);
        }
        if *self.phase(action) != TxPhase::Idle {
            return Err(BankError::Busy(action));
        }
        let amount = match action {
            Action::Approve | Action::Deposit => self.requested_deposit()?,
            Action::Withdraw => self.requested_withdraw()?,
        };
        if action == Action::Deposit && needs_approval(self.snapshot.allowance, amount) {
            return Err(BankError::InsufficientAllowance);
        }

        self.notices.retain(|n| n.action != Some(action));
        self.phases.insert(action, TxPhase::Submitting);
        let sent = self.input_for(action).to_string();
        self.sent_inputs.insert(action, sent);
        Ok(amount)
    }

    /// Clears the submitted amount, unless it was edited while in flight.
    pub fn submitted(&mut self, action: Action, hash: B256) -> PendingTransaction {
        let pending = PendingTransaction::new(action, hash);
        self.phases
            .insert(action, TxPhase::AwaitingConfirmation(pending.clone()));
        let sent = self.sent_inputs.remove(&action);
        let input = match action {
            Action::Deposit => &mut self.deposit_input,
            Action::Withdraw => &mut self.withdraw_input,
            // the deposit amount is still needed for the deposit itself
            Action::Approve => return pending,
        };
        if sent.as_deref() == Some(input.as_str()) {
            input.clear();
        }
        pending
    }

    pub fn submission_failed(&mut self, action: Action, error: &BankError) {
        self.phases.insert(action, TxPhase::Idle);
        self.sent_inputs.remove(&action);
        self.push_notice(NoticeKind::Submission, Some(action), error.to_string());
    }

    pub fn confirmed(&mut self, action: Action, confirmation: Confirmation) {
        self.phases.insert(action, TxPhase::Idle);
        if confirmation.success {
            self.last_confirmed = Some(confirmation);
        } else {
            let error = BankError::Reverted {
                hash: confirmation.hash,
            };
            self.push_notice(NoticeKind::Reverted, Some(action), error.to_string());
        }
    }

    pub fn confirmation_failed(&mut self, action: Action, error: &BankError) {
        self.phases.insert(action, TxPhase::Idle);
        self.push_notice(NoticeKind::Confirmation, Some(action), error.to_string());
    }

    /// Mark a refresh as started; only the latest one may store its results.
    pub fn begin_refresh(&mut self) -> u64 {
        self.refresh_generation += 1;
        self.refreshing = true;
        self.refresh_generation
    }

    pub fn refreshed(&mut self, generation: u64, account: Address, reads: RefreshReads) {
        if generation != self.refresh_generation {
            log::debug!("Dropping results of superseded refresh {}", generation);
            return;
        }
        self.refreshing = false;
        if self.account() != Some(account) {
            log::debug!("Account changed during refresh, dropping results");
            return;
        }
        let metadata = reads.metadata.and_then(|metadata| {
            if metadata.decimals > amount::MAX_DECIMALS {
                Err(BankError::query(
                    Query::TokenMetadata,
                    format!("token reports {} decimals, unsupported", metadata.decimals),
                ))
            } else {
                Ok(metadata)
            }
        });

        self.notices.retain(|n| n.kind != NoticeKind::Query);
        self.snapshot.token_balance = self.loaded(Query::TokenBalance, reads.token_balance);
        self.snapshot.bank_balance = self.loaded(Query::BankBalance, reads.bank_balance);
        self.snapshot.allowance = self.loaded(Query::Allowance, reads.allowance);
        self.snapshot.metadata = self.loaded(Query::TokenMetadata, metadata);
        self.snapshot.updated_at = Some(chrono::Utc::now());
    }

    fn loaded<T>(&mut self, query: Query, result: crate::error::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!("Failed to load {}: {}", query, e);
                self.push_notice(NoticeKind::Query, None, e.to_string());
                None
            }
        }
    }
}

/// Scoped mutable access to a [`DashboardState`], wherever it lives.
pub trait StateCell {
    fn update<R>(&mut self, f: impl FnOnce(&mut DashboardState) -> R) -> R;
    fn inspect<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R;
}

impl StateCell for DashboardState {
    fn update<R>(&mut self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        f(self)
    }

    fn inspect<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(self)
    }
}

/// Mirror the wallet provider's current connection.
pub async fn load_connection<W: WalletProvider, S: StateCell>(
    wallet: &W,
    state: &mut S,
) -> Option<Address> {
    match wallet.connection().await {
        Ok(connection) => {
            state.update(|s| s.set_connection(connection));
            connection.account
        }
        Err(e) => {
            log::error!("Could not read wallet connection: {}", e);
            state.update(|s| s.push_notice(NoticeKind::Wallet, None, e.to_string()));
            None
        }
    }
}

/// Connect the wallet and load balances for the new account.
pub async fn connect<W: WalletProvider, B: TokenBank, S: StateCell>(
    wallet: &W,
    bank: &B,
    state: &mut S,
) {
    match wallet.connect().await {
        Ok(connection) => {
            log::info!("Wallet connected: {:?}", connection.account);
            state.update(|s| s.set_connection(connection));
            refresh(bank, state).await;
        }
        Err(e) => {
            log::error!("Wallet connection failed: {}", e);
            state.update(|s| s.push_notice(NoticeKind::Wallet, None, e.to_string()));
        }
    }
}

pub async fn disconnect<W: WalletProvider, S: StateCell>(wallet: &W, state: &mut S) {
    match wallet.disconnect().await {
        Ok(()) => {
            log::info!("Wallet disconnected");
            state.update(|s| s.set_connection(Connection::default()));
        }
        Err(e) => {
            log::error!("Wallet disconnection failed: {}", e);
            state.update(|s| s.push_notice(NoticeKind::Wallet, None, e.to_string()));
        }
    }
}

/// Re-issue the four read queries. Does nothing while disconnected.
pub async fn refresh<B: TokenBank, S: StateCell>(bank: &B, state: &mut S) {
    let Some(account) = state.inspect(|s| s.account()) else {
        log::debug!("No wallet connected, skipping refresh");
        return;
    };

    let generation = state.update(|s| s.begin_refresh());
    let (token_balance, bank_balance, allowance, metadata) = futures::join!(
        bank.token_balance(account),
        bank.bank_balance(account),
        bank.allowance(account),
        bank.token_metadata(),
    );
    let reads = RefreshReads {
        token_balance,
        bank_balance,
        allowance,
        metadata,
    };

    state.update(|s| s.refreshed(generation, account, reads));
}

pub async fn approve<B: TokenBank, S: StateCell>(bank: &B, state: &mut S) -> Option<Confirmation> {
    run_action(bank, state, Action::Approve).await
}

pub async fn deposit<B: TokenBank, S: StateCell>(bank: &B, state: &mut S) -> Option<Confirmation> {
    run_action(bank, state, Action::Deposit).await
}

pub async fn withdraw<B: TokenBank, S: StateCell>(
    bank: &B,
    state: &mut S,
) -> Option<Confirmation> {
    run_action(bank, state, Action::Withdraw).await
}

/// Submit `action`, wait for its confirmation, then refresh on success.
pub async fn run_action<B: TokenBank, S: StateCell>(
    bank: &B,
    state: &mut S,
    action: Action,
) -> Option<Confirmation> {
    let amount = match state.update(|s| s.begin(action)) {
        Ok(amount) => amount,
        Err(e) => {
            log::warn!("Not submitting {}: {}", action, e);
            state.update(|s| s.push_notice(NoticeKind::Submission, Some(action), e.to_string()));
            return None;
        }
    };

    log::info!("Submitting {} of {} base units", action, amount);
    let hash = match bank.submit(action, amount).await {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("{} failed: {}", action, e);
            state.update(|s| s.submission_failed(action, &e));
            return None;
        }
    };
    state.update(|s| s.submitted(action, hash));
    log::info!("{} submitted as {}, waiting for confirmation", action, hash);

    let confirmation = match bank.wait_for_confirmation(hash).await {
        Ok(confirmation) => confirmation,
        Err(e) => {
            log::error!("Waiting for {} ({}) failed: {}", action, hash, e);
            state.update(|s| s.confirmation_failed(action, &e));
            return None;
        }
    };
    state.update(|s| s.confirmed(action, confirmation));

    if confirmation.success {
        log::info!(
            "{} {} confirmed in block {:?}",
            action,
            hash,
            confirmation.block_number
        );
        refresh(bank, state).await;
    } else {
        log::error!("{} {} reverted", action, hash);
    }
    Some(confirmation)
}
