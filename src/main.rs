use dioxus::prelude::*;

mod amount;
mod bank;
mod config;
mod contracts;
mod control;
mod dashboard;
mod error;
mod model;
mod remote;
mod rpc;
mod state;
mod views;
mod wallet;

use views::{Dashboard, Info, Layout};

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Layout)]
        #[route("/")]
        Dashboard {},
        #[route("/info")]
        Info {},
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[cfg(feature = "server")]
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "TOKENBANK_RPC_URL", default_value_t = String::from(config::DEFAULT_RPC_URL))]
    rpc_url: String,
    #[arg(long, env = "TOKENBANK_TOKEN_ADDRESS", default_value_t = config::DEFAULT_TOKEN_ADDRESS.to_string())]
    token_address: String,
    #[arg(long, env = "TOKENBANK_BANK_ADDRESS", default_value_t = config::DEFAULT_BANK_ADDRESS.to_string())]
    bank_address: String,
    #[arg(long, env = "TOKENBANK_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,
    #[arg(long, default_value_t = config::DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,
    /// Address of the web interface, defaults to the one given by `dx serve`
    #[arg(long)]
    addr: Option<std::net::SocketAddr>,
}

#[cfg(feature = "server")]
impl Args {
    fn to_config(&self) -> error::Result<config::Config> {
        config::Config::new(
            self.rpc_url.clone(),
            &self.token_address,
            &self.bank_address,
            self.private_key.clone(),
            self.poll_interval_ms,
        )
    }
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(App);
}

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use crate::state::LOCAL_APP_STATE;
    use clap::Parser;
    use std::io::{self as std_io, Write};
    use std::sync::Arc;
    use tokio::io::{self as tokio_io, AsyncBufReadExt, BufReader};

    env_logger::init();

    let args = Args::parse();
    let config = args.to_config()?;

    let wallet = Arc::new(wallet::LocalWallet::new(config.private_key.as_deref())?);
    let bank = Arc::new(rpc::RpcTokenBank::new(&config, wallet.clone())?);

    let chain_id = match bank.chain_id().await {
        Ok(id) => {
            log::info!("Connected to chain {} through {}", id, bank.rpc_url());
            Some(id)
        }
        Err(e) => {
            log::warn!("RPC node at {} is not reachable yet: {}", bank.rpc_url(), e);
            None
        }
    };

    {
        let mut state = LOCAL_APP_STATE.lock().await;
        state.install(config, wallet, bank, chain_id);
    }

    let web_addr = args
        .addr
        .unwrap_or_else(dioxus_cli_config::fullstack_address_or_localhost);
    let router = axum::Router::new()
        .serve_dioxus_application(ServeConfigBuilder::default(), App)
        .into_make_service();
    let listener = tokio::net::TcpListener::bind(web_addr).await?;
    let server = tokio::spawn(async move { axum::serve(listener, router).await });

    let stdin: tokio_io::Stdin = tokio_io::stdin();
    let reader: BufReader<tokio_io::Stdin> = BufReader::new(stdin);
    let mut lines: tokio_io::Lines<_> = reader.lines();

    log::info!(
        "Welcome on tokenbank, write /help to get the command list, access the web interface at {}",
        format! {"http://{}", web_addr}
    );
    print!("> ");
    std_io::stdout().flush()?;

    main_loop(&mut lines, server).await;

    Ok(())
}

#[cfg(feature = "server")]
async fn main_loop(
    lines: &mut tokio::io::Lines<tokio::io::BufReader<tokio::io::Stdin>>,
    mut server: tokio::task::JoinHandle<std::io::Result<()>>,
) {
    use crate::control::{parse_command, process_cli_command, until_interrupted};
    use std::io::{self as std_io, Write};
    use tokio::select;

    let mut console = dashboard::DashboardState::default();

    loop {
        select! {
            line = lines.next_line() => {
                let command = parse_command(line);
                // confirmations wait without a limit, ctrl-c must still get through
                let handled = until_interrupted(
                    process_cli_command(command, &mut console),
                    tokio::signal::ctrl_c(),
                )
                .await;
                match handled {
                    Some(Ok(())) => {}
                    Some(Err(e)) => log::error!("Error handling command:\n{}", e),
                    None => {
                        log::info!("👋 Bye !");
                        return;
                    }
                }
                print!("> ");
                let _ = std_io::stdout().flush();
            }
            result = &mut server => {
                match result {
                    Ok(Ok(())) => log::info!("Web server stopped"),
                    Ok(Err(e)) => log::error!("Web server failed: {}", e),
                    Err(e) => log::error!("Web server task panicked: {}", e),
                }
                return;
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("👋 Bye !");
                return;
            }
        }
    }
}
