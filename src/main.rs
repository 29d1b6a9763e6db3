//! LARUbot support chat
//!
//! `laru-chat serve` runs the backend; `laru-chat chat` drives the widget
//! from the terminal against a running backend.

#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use laru_chat::config::{AppConfig, Command, load_llm_settings};
use laru_chat::server;
use laru_chat::ui::terminal;
use laru_chat::widget::{HttpAskClient, HttpAssetSource, Widget};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let (config, cli) = match AppConfig::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    init_tracing(cli.log_json);

    match cli.command.clone().unwrap_or_default() {
        Command::Serve { .. } => {
            let settings = match load_llm_settings() {
                Ok(s) => s,
                Err(msg) => {
                    eprintln!("Configuration error: {msg}");
                    std::process::exit(1);
                }
            };
            server::start_server(Arc::new(config), settings).await
        }
        Command::Chat { server_url, .. } => {
            let mut widget = Widget::new(
                Arc::new(HttpAssetSource::new(&server_url)?),
                Arc::new(HttpAskClient::new(&server_url)?),
                config.assets.default_language.clone(),
            );
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            terminal::run(&mut widget, stdin, tokio::io::stdout()).await?;
            Ok(())
        }
    }
}
