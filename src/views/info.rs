use dioxus::prelude::*;

use crate::remote::deployment_info_server;

#[component]
pub fn Info() -> Element {
    let info = use_resource(move || async move { deployment_info_server().await });

    rsx! {
        div { id: "info-page",
            h1 { "Deployment" }

            match &*info.read() {
                None => rsx! {
                    p { "Loading deployment information..." }
                },
                Some(Ok(info)) => {
                    let chain = info
                        .chain_id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    let account = info
                        .account
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "not connected".to_string());
                    rsx! {
                        dl { class: "deployment",
                            dt { "RPC endpoint" }
                            dd { "{info.rpc_url}" }
                            dt { "Chain ID" }
                            dd { "{chain}" }
                            dt { "Token contract" }
                            dd { "{info.token_address}" }
                            dt { "Bank contract" }
                            dd { "{info.bank_address}" }
                            dt { "Account" }
                            dd { "{account}" }
                        }
                    }
                }
                Some(Err(e)) => rsx! {
                    p { class: "error-message", "Error loading deployment information: {e}" }
                },
            }
        }
    }
}
