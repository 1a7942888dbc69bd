mod ui;
mod engine;
mod model;

use anyhow::Context;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::engine::config::ClientConfig;

/// `RUST_LOG` wins when it parses; `info` otherwise.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    tracing::info!(base_url = %config.base_url, "starting TextWorld adventure client");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TextWorld × LLM Adventure")
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TextWorld × LLM Adventure",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::AdventureApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_level_is_kept() {
        assert_eq!(log_filter(Some("debug".into())).to_string(), "debug");
        assert_eq!(
            log_filter(Some("textworld_adventure=trace".into())).to_string(),
            "textworld_adventure=trace"
        );
    }

    #[test]
    fn info_when_unset() {
        assert_eq!(log_filter(None).to_string(), "info");
    }
}
