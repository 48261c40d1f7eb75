//! Configuration structures.

use chrono::{FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use chartwise_core::error::{ChartwiseError, ChartwiseResult};
use chartwise_core::types::TradingWindow;
use chartwise_indicators::{IndicatorKind, IndicatorRequest};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check cross-field constraints the types cannot express.
    pub fn validate(&self) -> ChartwiseResult<()> {
        self.market.trading_window()?;

        for name in &self.dashboard.indicators {
            name.parse::<IndicatorKind>()
                .map_err(|_| ChartwiseError::Config(format!("unknown indicator '{}'", name)))?;
        }
        if self.dashboard.history_days == 0 {
            return Err(ChartwiseError::Config(
                "dashboard.history_days must be positive".into(),
            ));
        }
        if self.dashboard.refresh_secs == 0 {
            return Err(ChartwiseError::Config(
                "dashboard.refresh_secs must be positive".into(),
            ));
        }
        if self.data.source == DataSourceKind::Csv && self.data.csv_dir.is_none() {
            return Err(ChartwiseError::Config(
                "data.csv_dir is required when data.source = \"csv\"".into(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> ChartwiseResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChartwiseError::Config(e.to_string()))
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "chartwise".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Gemini API configuration. The key itself is read from `api_key_env`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// Regional market window gating live mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    /// Minutes east of UTC; 330 is IST
    pub utc_offset_minutes: i32,
    /// Session open, `HH:MM`
    pub open: String,
    /// Session close, `HH:MM`
    pub close: String,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            open: "09:15".to_string(),
            close: "15:30".to_string(),
        }
    }
}

impl MarketSettings {
    pub fn offset(&self) -> ChartwiseResult<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ChartwiseError::Config(format!(
                    "market.utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }

    pub fn trading_window(&self) -> ChartwiseResult<TradingWindow> {
        TradingWindow::new(
            self.offset()?,
            parse_time("market.open", &self.open)?,
            parse_time("market.close", &self.close)?,
        )
    }
}

fn parse_time(field: &str, value: &str) -> ChartwiseResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .map_err(|_| ChartwiseError::Config(format!("{} is not HH:MM: '{}'", field, value)))
}

/// Dashboard defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub tickers: Vec<String>,
    pub indicators: Vec<String>,
    /// Historical window ending today
    pub history_days: u32,
    /// Live-mode refresh interval
    pub refresh_secs: u64,
    /// Run the sentiment call per ticker
    pub sentiment: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            tickers: ["RELIANCE.NS", "HDFCBANK.NS", "TCS.NS", "INFY.NS"]
                .into_iter()
                .map(String::from)
                .collect(),
            indicators: vec!["20-Day SMA".to_string(), "50-Day SMA".to_string()],
            history_days: 365,
            refresh_secs: 60,
            sentiment: true,
        }
    }
}

impl DashboardSettings {
    pub fn indicator_request(&self) -> IndicatorRequest {
        IndicatorRequest::from_names(&self.indicators)
    }
}

/// Where price data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Yahoo,
    Csv,
}

/// Price-data settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    /// Directory of per-ticker CSV files
    pub csv_dir: Option<String>,
}
