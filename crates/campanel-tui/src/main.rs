//! `campanel`: terminal admin panel for the camera appliance.
//!
//! Two tabs, Camera and Wi-Fi, each rendered from a fresh read of the
//! device. Every change to the device shows the loading placeholder, runs
//! one command, then reloads the whole tab.
//!
//! Logs are written to a file (default `/tmp/campanel.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use campanel_api::DeviceClient;
use campanel_config::{Config, StartTab};
use campanel_core::Tab;

use crate::app::App;

/// Terminal admin panel for the camera appliance.
#[derive(Parser, Debug)]
#[command(name = "campanel", version, about)]
struct Cli {
    /// Appliance URL (e.g., http://192.168.4.1:8000). Overrides the config file.
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// Tab to open on start: camera or wifi
    #[arg(short = 't', long)]
    tab: Option<Tab>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/campanel.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Stdout and stderr belong to the terminal UI.
/// The returned guard must outlive the app so buffered logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "campanel={log_level},campanel_core={log_level},campanel_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("campanel.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file, then environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => campanel_config::load_config_from(path)?,
        None => campanel_config::load_config()?,
    };
    if let Some(url) = &cli.url {
        cfg.device.url.clone_from(url);
        cfg.validate()?;
    }
    Ok(cfg)
}

fn start_tab(cli: &Cli, cfg: &Config) -> Tab {
    cli.tab.unwrap_or(match cfg.ui.start_tab {
        StartTab::Camera => Tab::Camera,
        StartTab::Wifi => Tab::Wifi,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let cfg = resolve_config(&cli)?;
    let client = DeviceClient::new(cfg.device_url()?, &cfg.transport())?;
    let tab = start_tab(&cli, &cfg);

    info!(url = %client.base_url(), %tab, "starting campanel");

    let mut app = App::new(client, tab, cfg.tick_rate());
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_tab_overrides_config() {
        let cli = Cli::try_parse_from(["campanel", "--tab", "wifi"]).unwrap();
        assert_eq!(start_tab(&cli, &Config::default()), Tab::Wifi);

        let cli = Cli::try_parse_from(["campanel"]).unwrap();
        let mut cfg = Config::default();
        cfg.ui.start_tab = StartTab::Wifi;
        assert_eq!(start_tab(&cli, &cfg), Tab::Wifi);
        assert_eq!(start_tab(&cli, &Config::default()), Tab::Camera);
    }

    #[test]
    fn unknown_tab_is_rejected() {
        assert!(Cli::try_parse_from(["campanel", "--tab", "ethernet"]).is_err());
    }

    #[test]
    fn cli_url_is_validated() {
        let dir = std::env::temp_dir().join("campanel-cli-test-absent.toml");
        let cli = Cli::try_parse_from([
            "campanel",
            "--config",
            dir.to_str().unwrap(),
            "--url",
            "ftp://device",
        ])
        .unwrap();
        assert!(resolve_config(&cli).is_err());
    }
}
