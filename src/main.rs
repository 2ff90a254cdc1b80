//! Command-line entry point

use clap::Parser;
use nexy_tasks::inputs::load_proxy_pool;
use nexy_tasks::{Config, CycleRunner, Result, TokioClock, cancel_on_signal, run_with_shutdown};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Verify and claim Nexy AI tasks for every account in the token file
#[derive(Parser, Debug)]
#[command(name = "nexy-tasks", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Token file (one bearer token per line)
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Proxy file (one proxy URI per line)
    #[arg(long)]
    proxies: Option<PathBuf>,

    /// Route accounts through the proxy file, round-robin
    #[arg(long)]
    proxy: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(tokens) = &self.tokens {
            config.inputs.token_file = tokens.clone();
        }
        if let Some(proxies) = &self.proxies {
            config.inputs.proxy_file = proxies.clone();
        }
        if self.proxy {
            config.inputs.use_proxy = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match cli.load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let proxies = load_proxy_pool(&config.inputs).await;
    let runner = CycleRunner::new(config, Arc::new(TokioClock), proxies);

    if cli.once {
        let shutdown = CancellationToken::new();
        let listener = tokio::spawn(cancel_on_signal(shutdown.clone()));
        let summary = runner.run_cycle(&shutdown).await;
        listener.abort();

        tracing::info!(
            accounts = summary.accounts,
            processed = summary.processed,
            failed = summary.failed,
            "Single cycle finished"
        );
        if summary.accounts == 0 {
            return ExitCode::FAILURE;
        }
    } else {
        run_with_shutdown(&runner).await;
    }

    ExitCode::SUCCESS
}
