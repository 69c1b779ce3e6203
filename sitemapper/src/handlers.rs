use crate::server::{AppState, build_router};
use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_core::config::ExtractorConfig;
use sitemapper_core::extract::{Extractor, RequestKind};
use sitemapper_core::report::{ReportFormat, render_report, save_report};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides `default_directive`.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the extractor settings from `--probe-timeout` / `--probe-concurrency`,
/// falling back to the defaults for subcommands that do not take them.
pub fn extractor_config_from_args(args: &ArgMatches) -> ExtractorConfig {
    let mut config = ExtractorConfig::default();

    if let Ok(Some(secs)) = args.try_get_one::<u64>("probe-timeout") {
        config = config.with_probe_timeout_secs(*secs);
    }
    if let Ok(Some(concurrency)) = args.try_get_one::<usize>("probe-concurrency") {
        config = config.with_probe_concurrency(*concurrency);
    }

    config
}

pub fn report_format_from_args(args: &ArgMatches) -> ReportFormat {
    args.try_get_one::<String>("format")
        .ok()
        .flatten()
        .and_then(|format| ReportFormat::from_str(format))
        .unwrap_or(ReportFormat::Text)
}

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    init_tracing("info,tower_http=debug");

    let bind = *args
        .get_one::<SocketAddr>("bind")
        .context("missing bind address")?;

    let config = extractor_config_from_args(args);
    let extractor = Extractor::from_config(&config).context("Failed to build extractor")?;
    let app = build_router(AppState::new(extractor));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("Server started at {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

pub async fn handle_extract(kind: RequestKind, args: &ArgMatches) -> Result<()> {
    init_tracing("warn");

    let value_id = match kind {
        RequestKind::Domain => "DOMAIN",
        RequestKind::Sitemap => "URL",
    };
    let value = args
        .get_one::<String>(value_id)
        .with_context(|| format!("missing {}", value_id))?;
    let format = report_format_from_args(args);
    let output = args.try_get_one::<PathBuf>("output").ok().flatten();

    let extractor = Extractor::from_config(&extractor_config_from_args(args))
        .context("Failed to build extractor")?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Extracting {} {}", kind, value));

    let result = extractor.extract(kind, value).await;
    spinner.finish_and_clear();
    let response = result?;

    let report = render_report(&response, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} {} entries saved to {}",
                "✓".green().bold(),
                response.urls.len(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }

    Ok(())
}
