//! Web interface components for the TokenBank dashboard
//!
//! This module contains the Dioxus components that make up the web interface:
//! the root layout providing the dashboard context, the navigation bar, the
//! dashboard itself and the deployment information page.

use dioxus::prelude::*;

use crate::dashboard::{DashboardState, StateCell};

/// Root layout and context provider
mod layout;
pub use layout::Layout;

/// Navigation bar component
mod navbar;
pub use navbar::Navbar;

/// Wallet connect / disconnect control
mod wallet;
pub use wallet::ConnectButton;

/// Balances and deposit / withdraw forms
mod dashboard;
pub use dashboard::Dashboard;

/// Deployment information component
mod info;
pub use info::Info;

impl StateCell for Signal<DashboardState> {
    fn update<R>(&mut self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut state = self.write();
        f(&mut state)
    }

    fn inspect<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let state = self.read();
        f(&state)
    }
}
