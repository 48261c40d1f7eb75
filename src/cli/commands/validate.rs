//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use chartwise_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }
    let window = config.market.trading_window()?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Data source: {:?}", config.data.source);
    println!("Gemini model: {}", config.gemini.model);
    println!(
        "Gemini key ({}): {}",
        config.gemini.api_key_env,
        if std::env::var(&config.gemini.api_key_env).is_ok() {
            "set"
        } else {
            "missing"
        }
    );
    println!(
        "Market window: {} - {} ({})",
        window.open().format("%H:%M"),
        window.close().format("%H:%M"),
        window.offset()
    );
    println!("Tickers: {}", config.dashboard.tickers.join(", "));
    println!("Indicators: {}", config.dashboard.indicators.join(", "));
    println!("Live refresh: {}s", config.dashboard.refresh_secs);
    println!();
    println!("Effective settings:");
    println!("{}", config.to_toml()?);

    Ok(())
}
