//! PaperHub CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use paperhub_core::config::LoggingConfig;

mod commands;
mod output;

use commands::Cli;

/// Log filter from the configured level, overridable via `RUST_LOG`.
fn log_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

fn init_tracing(logging: &LoggingConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(log_filter(logging));
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = commands::load_config(&cli.env)
        .map(|config| config.logging)
        .unwrap_or_default();
    init_tracing(&logging);

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_uses_configured_level() {
        // RUST_LOG is unset in the test environment, so the configured
        // level wins.
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(log_filter(&logging).to_string(), "debug");
        }
    }
}
