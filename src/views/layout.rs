use dioxus::prelude::*;

use crate::dashboard::DashboardState;
use crate::remote::ServerBank;
use crate::views::Navbar;

/// Wraps every page in the dashboard context and sets the page metadata.
#[component]
pub fn Layout() -> Element {
    let mut state = use_context_provider(|| Signal::new(DashboardState::default()));

    // pick up a wallet that is already connected on the node
    use_future(move || async move {
        if crate::dashboard::load_connection(&ServerBank, &mut state)
            .await
            .is_some()
        {
            crate::dashboard::refresh(&ServerBank, &mut state).await;
        }
    });

    rsx! {
        document::Title { "TokenBank DApp" }
        document::Meta {
            name: "description",
            content: "Deposit and withdraw tokens from the TokenBank contract",
        }
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1.0",
        }
        div { class: "app-container", Navbar {} }
    }
}
