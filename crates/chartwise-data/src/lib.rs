//! Price-data sources, the session cache and the fetch cycle.

mod cache;
mod csv_source;
mod fetch;
mod yahoo;

pub use cache::SeriesCache;
pub use csv_source::{load_file, parse_csv, CsvDataSource};
pub use fetch::{FetchMode, FetchNotice, FetchOutcome, Fetcher, NoticeKind};
pub use yahoo::{parse_chart, YahooSource};

/// Split comma-separated ticker input into trimmed, uppercased symbols.
///
/// Empty entries and repeats are dropped; first-seen order is kept.
pub fn parse_tickers(input: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in input.split(',').map(|t| t.trim().to_uppercase()) {
        if !ticker.is_empty() && !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tickers() {
        assert_eq!(
            parse_tickers(" reliance.ns, HDFCBANK.NS ,,tcs.ns "),
            vec!["RELIANCE.NS", "HDFCBANK.NS", "TCS.NS"]
        );
        assert!(parse_tickers(" , ").is_empty());
        assert!(parse_tickers("").is_empty());
    }

    #[test]
    fn test_parse_tickers_drops_repeats() {
        assert_eq!(parse_tickers("TCS.NS, tcs.ns"), vec!["TCS.NS"]);
        assert_eq!(
            parse_tickers("infy.ns,TCS.NS, INFY.NS ,tcs.ns"),
            vec!["INFY.NS", "TCS.NS"]
        );
    }
}
