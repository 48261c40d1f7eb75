//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DashboardSettings, DataSettings, DataSourceKind, GeminiSettings,
    LoggingConfig, MarketSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `CHARTWISE_DASHBOARD__REFRESH_SECS=30`.
pub const ENV_PREFIX: &str = "CHARTWISE";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("dashboard.tickers")
                .with_list_parse_key("dashboard.indicators"),
        )
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[dashboard]
tickers = ["SBIN.NS"]
indicators = ["VWAP", "MACD"]
history_days = 90
refresh_secs = 30
sentiment = false

[market]
utc_offset_minutes = 330
open = "09:15"
close = "15:30"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.dashboard.tickers, vec!["SBIN.NS"]);
        assert_eq!(config.dashboard.history_days, 90);
        assert!(!config.dashboard.sentiment);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.data.source, DataSourceKind::Yahoo);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_config(Path::new("/no/such/chartwise.toml")).is_err());
    }
}
