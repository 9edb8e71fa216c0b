use dioxus::prelude::*;

use crate::dashboard::{DashboardState, DepositStep, NoticeKind};
use crate::model::Action;
use crate::remote::ServerBank;
use crate::views::ConnectButton;

#[component]
pub fn Dashboard() -> Element {
    let state = use_context::<Signal<DashboardState>>();
    let (connected, name) = {
        let state = state.read();
        (state.is_connected(), state.token_name().to_string())
    };

    // nothing is queried until a wallet is connected
    if !connected {
        return rsx! {
            ConnectPrompt {}
        };
    }

    rsx! {
        div { id: "dashboard-page",
            p { class: "subtitle", "Manage your {name} deposits" }
            Notices {}
            div { class: "balance-grid", BalanceCards {} }
            div { class: "operation-grid",
                DepositCard {}
                WithdrawCard {}
            }
            TransactionStatus {}
        }
    }
}

#[component]
fn ConnectPrompt() -> Element {
    rsx! {
        div { id: "connect-prompt", class: "card",
            h1 { "TokenBank DApp" }
            p { "Connect your wallet to start using TokenBank" }
            ConnectButton {}
        }
    }
}

#[component]
fn BalanceCards() -> Element {
    let state = use_context::<Signal<DashboardState>>();
    let (token_balance, bank_balance, allowance, symbol) = {
        let state = state.read();
        (
            state.token_balance_display(),
            state.bank_balance_display(),
            state.allowance_display(),
            state.token_symbol().to_string(),
        )
    };

    rsx! {
        div { class: "card balance-card",
            h2 { "Wallet balance" }
            p { class: "balance wallet", "{token_balance} {symbol}" }
            p { class: "hint", "Tokens available for deposit" }
        }
        div { class: "card balance-card",
            h2 { "Bank deposit" }
            p { class: "balance bank", "{bank_balance} {symbol}" }
            p { class: "hint", "Allowance granted to the bank: {allowance} {symbol}" }
        }
    }
}

// take the deposit amount, approve first when the allowance does not cover it
#[component]
fn DepositCard() -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let step = use_memo(move || state.read().deposit_step());
    let (input, input_error, can_approve, can_deposit, approving, depositing) = {
        let state = state.read();
        (
            state.deposit_input.clone(),
            state.input_error(Action::Deposit).map(|e| e.to_string()),
            state.can_submit(Action::Approve),
            state.can_submit(Action::Deposit),
            state.is_awaiting(Action::Approve),
            state.is_awaiting(Action::Deposit),
        )
    };

    rsx! {
        div { id: "deposit-form", class: "card operation-card",
            h2 { "Deposit" }
            label { r#for: "deposit-amount", "Deposit amount" }
            input {
                r#type: "number",
                id: "deposit-amount",
                class: "input-field",
                placeholder: "Enter deposit amount",
                step: "0.01",
                min: "0",
                value: "{input}",
                oninput: move |event| {
                    state.write().deposit_input = event.value();
                },
            }
            if let Some(error) = input_error {
                p { class: "error-message", "{error}" }
            }
            match step() {
                DepositStep::Approve => rsx! {
                    button {
                        class: "button-primary",
                        disabled: !can_approve,
                        onclick: move |_| async move {
                            crate::dashboard::approve(&ServerBank, &mut state).await;
                        },
                        if approving {
                            "Approving..."
                        } else {
                            "Approve token"
                        }
                    }
                },
                DepositStep::Deposit => rsx! {
                    button {
                        class: "button-primary",
                        disabled: !can_deposit,
                        onclick: move |_| async move {
                            crate::dashboard::deposit(&ServerBank, &mut state).await;
                        },
                        if depositing {
                            "Depositing..."
                        } else {
                            "Deposit"
                        }
                    }
                },
            }
        }
    }
}

// the bank balance is only a hint, the contract does the real check
#[component]
fn WithdrawCard() -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let (input, input_error, max, symbol, exceeds, can_withdraw, withdrawing) = {
        let state = state.read();
        (
            state.withdraw_input.clone(),
            state.input_error(Action::Withdraw).map(|e| e.to_string()),
            state.bank_balance_display(),
            state.token_symbol().to_string(),
            state.withdraw_exceeds_balance(),
            state.can_submit(Action::Withdraw),
            state.is_awaiting(Action::Withdraw),
        )
    };

    rsx! {
        div { id: "withdraw-form", class: "card operation-card",
            h2 { "Withdraw" }
            label { r#for: "withdraw-amount", "Withdraw amount" }
            input {
                r#type: "number",
                id: "withdraw-amount",
                class: "input-field",
                placeholder: "Enter withdraw amount",
                step: "0.01",
                min: "0",
                max: "{max}",
                value: "{input}",
                oninput: move |event| {
                    state.write().withdraw_input = event.value();
                },
            }
            if let Some(error) = input_error {
                p { class: "error-message", "{error}" }
            }
            if exceeds {
                p { class: "warning", "More than your {max} {symbol} deposit, the bank will likely reject it" }
            }
            button {
                class: "button-primary",
                disabled: !can_withdraw,
                onclick: move |_| async move {
                    crate::dashboard::withdraw(&ServerBank, &mut state).await;
                },
                if withdrawing {
                    "Withdrawing..."
                } else {
                    "Withdraw"
                }
            }
        }
    }
}

#[component]
fn TransactionStatus() -> Element {
    let state = use_context::<Signal<DashboardState>>();
    let (pending, confirmed) = {
        let state = state.read();
        let pending: Vec<(String, String, String)> = state
            .awaiting()
            .into_iter()
            .map(|tx| {
                (
                    tx.action.to_string(),
                    tx.hash.to_string(),
                    tx.submitted_at.format("%H:%M:%S").to_string(),
                )
            })
            .collect();
        let confirmed = state.last_confirmed.map(|c| {
            let block = c
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "?".to_string());
            (c.hash.to_string(), block)
        });
        (pending, confirmed)
    };

    rsx! {
        if !pending.is_empty() {
            div { id: "tx-status", class: "card",
                p { class: "processing", "Transaction processing, please wait..." }
                ul { class: "tx-list",
                    for (action , hash , submitted) in pending {
                        li { key: "{hash}",
                            strong { "{action}" }
                            " {hash} "
                            span { class: "hint", "submitted at {submitted}" }
                        }
                    }
                }
            }
        }
        if let Some((hash, block)) = confirmed {
            p { class: "confirmed", "Last transaction {hash} confirmed in block {block}" }
        }
    }
}

#[component]
fn Notices() -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let notices: Vec<(usize, &'static str, String)> = state
        .read()
        .notices
        .iter()
        .enumerate()
        .map(|(index, notice)| (index, notice_class(notice.kind), notice.message.clone()))
        .collect();

    rsx! {
        if !notices.is_empty() {
            ul { class: "notice-list",
                for (index , class , message) in notices {
                    li { key: "{index}-{message}", class: "notice {class}",
                        span { "{message}" }
                        button {
                            class: "icon-button",
                            title: "Dismiss",
                            onclick: move |_| state.write().dismiss_notice(index),
                            "✕"
                        }
                    }
                }
            }
        }
    }
}

fn notice_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Wallet => "notice-wallet",
        NoticeKind::Query => "notice-query",
        NoticeKind::Submission => "notice-submission",
        NoticeKind::Reverted => "notice-reverted",
        NoticeKind::Confirmation => "notice-confirmation",
    }
}
