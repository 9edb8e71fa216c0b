use alloy_primitives::Address;
use dioxus::prelude::*;

use crate::dashboard::DashboardState;
use crate::remote::ServerBank;

#[component]
pub fn ConnectButton() -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let account = state.read().account();

    match account {
        Some(account) => {
            let full = account.to_string();
            let short = short_address(&account);
            rsx! {
                div { class: "wallet-control",
                    span { class: "account", title: "{full}", "{short}" }
                    button {
                        class: "button-secondary",
                        onclick: move |_| async move {
                            crate::dashboard::disconnect(&ServerBank, &mut state).await;
                        },
                        "Disconnect"
                    }
                }
            }
        }
        None => rsx! {
            button {
                class: "button-primary",
                onclick: move |_| async move {
                    crate::dashboard::connect(&ServerBank, &ServerBank, &mut state).await;
                },
                "Connect Wallet"
            }
        },
    }
}

// 0x1234…abcd
fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_short_address() {
        let account = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(short_address(&account), "0xf39F…2266");
    }
}
