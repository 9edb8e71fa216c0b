use crate::Route;
use crate::dashboard::DashboardState;
use crate::remote::ServerBank;
use crate::views::ConnectButton;
use dioxus::prelude::*;

#[component]
pub fn Navbar() -> Element {
    let mut state = use_context::<Signal<DashboardState>>();
    let (connected, refreshing) = {
        let state = state.read();
        (show_account_controls(&state), state.refreshing)
    };

    rsx! {
        div { id: "navbar",
            Link { to: Route::Dashboard {}, "Dashboard" }
            h1 { "TokenBank DApp" }
            Link { to: Route::Info {}, "Info" }
            if connected {
                button {
                    class: "icon-button",
                    title: "Refresh balances",
                    disabled: refreshing,
                    onclick: move |_| async move {
                        crate::dashboard::refresh(&ServerBank, &mut state).await;
                    },
                    "⟳"
                }
                ConnectButton {}
            }
        }
        Outlet::<Route> {}
    }
}

// Disconnected pages only carry the connect prompt of the page body.
fn show_account_controls(state: &DashboardState) -> bool {
    state.is_connected()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Connection;
    use alloy_primitives::Address;

    #[test]
    fn test_account_controls_hidden_until_connected() {
        let mut state = DashboardState::default();
        assert!(!show_account_controls(&state));

        state.set_connection(Connection::connected(Address::repeat_byte(0x42)));
        assert!(show_account_controls(&state));

        state.set_connection(Connection::default());
        assert!(!show_account_controls(&state));
    }
}
