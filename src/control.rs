//! Command handling and CLI interface
//!
//! This module provides the interactive console of the node. Every command
//! drives the same dashboard flows as the web interface, against the RPC
//! backend directly.

#![cfg(feature = "server")]

use crate::dashboard::{self, DashboardState};

/// Parse a line of input from the CLI and converts it to a Command
pub fn parse_command(line: Result<Option<String>, std::io::Error>) -> Command {
    match line {
        Ok(Some(cmd)) => match cmd.trim() {
            "/connect" => Command::Connect,
            "/disconnect" => Command::Disconnect,
            "/balances" => Command::Balances,
            "/approve" => Command::Approve,
            "/deposit" => Command::Deposit,
            "/withdraw" => Command::Withdraw,
            "/save" => Command::Save,
            "/info" => Command::Info,
            "/help" => Command::Help,
            other => Command::Unknown(other.to_string()),
        },
        Ok(None) => Command::Unknown("No input".to_string()),
        Err(e) => {
            log::error!("Error reading stdin: {}", e);
            Command::Error("Error reading stdin".to_string())
        }
    }
}

/// Available commands in the console
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum Command {
    /// Activate the node's signing key
    Connect,
    /// Deactivate the node's signing key
    Disconnect,
    /// Refresh and print balances
    Balances,
    /// Grant the bank an allowance
    Approve,
    /// Deposit tokens into the bank
    Deposit,
    /// Withdraw tokens from the bank
    Withdraw,
    /// Write the current balances to a JSON file
    Save,
    /// Display deployment information
    Info,
    /// Display help information
    Help,
    /// Unknown command
    Unknown(String),
    /// Error command
    Error(String),
}

/// Execute a console command against the node's backend
pub async fn process_cli_command(
    cmd: Command,
    console: &mut DashboardState,
) -> Result<(), Box<dyn std::error::Error>> {
    let bank = crate::state::bank().await?;
    let wallet = crate::state::wallet().await?;

    match cmd {
        Command::Connect => {
            dashboard::connect(wallet.as_ref(), bank.as_ref(), console).await;
            print_balances(console);
        }

        Command::Disconnect => {
            dashboard::disconnect(wallet.as_ref(), console).await;
            println!("🔌 Disconnected");
        }

        Command::Balances => {
            dashboard::load_connection(wallet.as_ref(), console).await;
            dashboard::refresh(bank.as_ref(), console).await;
            print_balances(console);
        }

        Command::Approve => {
            console.deposit_input = prompt("Amount to approve")?;
            dashboard::approve(bank.as_ref(), console).await;
        }

        Command::Deposit => {
            console.deposit_input = prompt("Deposit amount")?;
            if console.needs_approval() {
                println!(
                    "⚠️  Allowance {} {} does not cover this amount, run /approve first",
                    console.allowance_display(),
                    console.token_symbol()
                );
                console.deposit_input.clear();
                return Ok(());
            }
            dashboard::deposit(bank.as_ref(), console).await;
        }

        Command::Withdraw => {
            console.withdraw_input = prompt("Withdraw amount")?;
            if console.withdraw_exceeds_balance() {
                println!(
                    "⚠️  Only {} {} deposited, the bank will probably reject this",
                    console.bank_balance_display(),
                    console.token_symbol()
                );
            }
            dashboard::withdraw(bank.as_ref(), console).await;
        }

        Command::Save => {
            let filename = save_snapshot(console)?;
            println!("💾 Balances saved in {}", filename);
        }

        Command::Help => {
            println!("📜 Command list:");
            println!("----------------------------------------");
            println!("/connect          - Connect the node's wallet");
            println!("/disconnect       - Disconnect the wallet");
            println!("/balances         - Refresh and show balances");
            println!("/approve          - Allow the bank to spend tokens");
            println!("/deposit          - Deposit tokens into the bank");
            println!("/withdraw         - Withdraw tokens from the bank");
            println!("/save             - Save balances to a JSON file");
            println!("/info             - Show deployment information");
            println!("/help             - Show this help message");
            println!("----------------------------------------");
        }

        Command::Info => {
            let info = crate::state::LOCAL_APP_STATE.lock().await.deployment_info()?;
            println!("📊 Deployment Information:");
            println!("----------------------------------------");
            println!("RPC: {}", info.rpc_url);
            match info.chain_id {
                Some(id) => println!("Chain ID: {}", id),
                None => println!("Chain ID: unknown"),
            }
            println!("Token: {}", info.token_address);
            println!("Bank: {}", info.bank_address);
            match info.account {
                Some(account) => println!("Account: {}", account),
                None => println!("Account: not connected"),
            }
            println!("----------------------------------------");
        }

        Command::Unknown(msg) => {
            println!("❌ Unknown command: {}", msg);
        }

        Command::Error(msg) => {
            println!("❌ Error: {}", msg);
        }
    }

    report_notices(console);
    Ok(())
}

/// Run `task` unless `interrupt` completes first, in which case the task is
/// dropped and `None` is returned.
pub async fn until_interrupted<F, I>(task: F, interrupt: I) -> Option<F::Output>
where
    F: std::future::Future,
    I: std::future::Future,
{
    tokio::select! {
        output = task => Some(output),
        _ = interrupt => None,
    }
}

fn print_balances(console: &DashboardState) {
    let Some(account) = console.account() else {
        println!("🔌 No wallet connected, use /connect");
        return;
    };
    let symbol = console.token_symbol();
    println!("💰 {} ({})", console.token_name(), account);
    println!("----------------------------------------");
    println!("Wallet:    {} {}", console.token_balance_display(), symbol);
    println!("Bank:      {} {}", console.bank_balance_display(), symbol);
    println!("Allowance: {} {}", console.allowance_display(), symbol);
    println!("----------------------------------------");
}

// Notices are shown once on the console.
fn report_notices(console: &mut DashboardState) {
    for notice in console.notices.drain(..) {
        println!("❌ {}", notice.message);
    }
    if let Some(confirmation) = console.last_confirmed.take() {
        println!(
            "✅ {} confirmed in block {}",
            confirmation.hash,
            confirmation
                .block_number
                .map(|b| b.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
    }
}

fn save_snapshot(console: &DashboardState) -> std::io::Result<String> {
    use std::io::Write;

    let account = console
        .account()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "disconnected".to_string());
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("balances_{}_{}.json", account, ts);

    let json = serde_json::to_string_pretty(&console.snapshot)?;
    let mut file = std::fs::File::create(&filename)?;
    file.write_all(json.as_bytes())?;
    log::info!("Snapshot saved in {}", filename);
    Ok(filename)
}

/// Prompts the user for input with a label
fn prompt(label: &str) -> std::io::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> Result<Option<String>, std::io::Error> {
        Ok(Some(s.to_string()))
    }

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(parse_command(line("/connect")), Command::Connect);
        assert_eq!(parse_command(line("  /deposit \n")), Command::Deposit);
        assert_eq!(parse_command(line("/withdraw")), Command::Withdraw);
        assert_eq!(parse_command(line("/approve")), Command::Approve);
        assert_eq!(parse_command(line("/save")), Command::Save);
    }

    #[test]
    fn test_parse_unknown_and_errors() {
        assert_eq!(
            parse_command(line("/transfer")),
            Command::Unknown("/transfer".to_string())
        );
        assert!(matches!(parse_command(Ok(None)), Command::Unknown(_)));
        let err = std::io::Error::new(std::io::ErrorKind::Other, "closed");
        assert!(matches!(parse_command(Err(err)), Command::Error(_)));
    }

    #[tokio::test]
    async fn test_interrupt_stops_an_endless_command() {
        let endless = std::future::pending::<()>();
        assert_eq!(until_interrupted(endless, async {}).await, None);
    }

    #[tokio::test]
    async fn test_finished_command_is_not_interrupted() {
        let command = async { 42 };
        let interrupt = std::future::pending::<()>();
        assert_eq!(until_interrupted(command, interrupt).await, Some(42));
    }

    #[test]
    fn test_report_notices_drains() {
        let mut console = DashboardState::default();
        console.push_notice(
            dashboard::NoticeKind::Submission,
            None,
            "rejected".to_string(),
        );
        report_notices(&mut console);
        assert!(console.notices.is_empty());
    }
}
