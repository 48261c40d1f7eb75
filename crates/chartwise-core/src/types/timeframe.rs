//! Bar granularity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Granularity of the bars in a price series. Historical mode charts daily
/// bars; live mode charts the latest session minute by minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "1d")]
    #[default]
    Daily,
}

impl Timeframe {
    /// Interval code understood by the upstream chart API.
    pub fn as_code(&self) -> &'static str {
        match self {
            Timeframe::Minute1 => "1m",
            Timeframe::Daily => "1d",
        }
    }

    pub fn is_intraday(&self) -> bool {
        *self == Timeframe::Minute1
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "minute" | "intraday" => Ok(Timeframe::Minute1),
            "1d" | "daily" => Ok(Timeframe::Daily),
            _ => Err(DataError::UnknownInterval(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_aliases() {
        assert_eq!("1m".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!(" Intraday ".parse::<Timeframe>().unwrap(), Timeframe::Minute1);
        assert_eq!("DAILY".parse::<Timeframe>().unwrap(), Timeframe::Daily);
        assert!("1wk".parse::<Timeframe>().is_err());
    }

    #[test]
    fn test_code_matches_serde_name() {
        assert_eq!(serde_json::to_string(&Timeframe::Minute1).unwrap(), "\"1m\"");
        assert_eq!(Timeframe::Daily.to_string(), "1d");
        assert!(Timeframe::Minute1.is_intraday());
        assert!(!Timeframe::default().is_intraday());
    }
}
