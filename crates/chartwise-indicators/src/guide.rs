//! Plain-language explanations of each indicator for the guide screen.

use crate::engine::IndicatorKind;

/// A guide section covering one or more related indicators.
#[derive(Debug, Clone, Copy)]
pub struct GuideEntry {
    pub title: &'static str,
    pub covers: &'static [IndicatorKind],
    pub points: &'static [&'static str],
}

/// Guide sections in display order. Every [`IndicatorKind`] is covered exactly once.
pub const GUIDE: &[GuideEntry] = &[
    GuideEntry {
        title: "20-Day SMA & 50-Day SMA (Simple Moving Average)",
        covers: &[IndicatorKind::Sma20, IndicatorKind::Sma50],
        points: &[
            "Plain average of the closing price over the last N days.",
            "20-day tracks the short-term move; 50-day is slower and steadier.",
            "20 crossing above 50 is a golden cross (bullish).",
            "20 crossing below 50 is a death cross (bearish).",
        ],
    },
    GuideEntry {
        title: "20-Day EMA & 50-Day EMA (Exponential Moving Average)",
        covers: &[IndicatorKind::Ema20, IndicatorKind::Ema50],
        points: &[
            "Like the SMA, but recent days count for more, so it turns sooner.",
            "20 EMA flips with short-term swings.",
            "50 EMA smooths out the medium-term trend.",
        ],
    },
    GuideEntry {
        title: "20-Day Bollinger Bands",
        covers: &[IndicatorKind::Bollinger20],
        points: &[
            "An envelope two standard deviations either side of the 20-day SMA.",
            "Price pressing the upper band may be overbought.",
            "Price pressing the lower band may be oversold.",
            "Bands squeezing together means volatility has dried up.",
        ],
    },
    GuideEntry {
        title: "MACD (Momentum)",
        covers: &[IndicatorKind::Macd],
        points: &[
            "12-period EMA minus 26-period EMA: how fast the trend is moving.",
            "Above zero leans bullish, below zero leans bearish.",
        ],
    },
    GuideEntry {
        title: "VWAP (Volume Weighted Average Price)",
        covers: &[IndicatorKind::Vwap],
        points: &[
            "Average traded price weighted by volume since the first bar shown.",
            "Price above VWAP: buyers are in control.",
            "Price below VWAP: sellers are in control.",
        ],
    },
];

/// Guide section covering an indicator.
pub fn entry_for(kind: IndicatorKind) -> Option<&'static GuideEntry> {
    GUIDE.iter().find(|entry| entry.covers.contains(&kind))
}

/// Render the whole guide as plain text.
pub fn render_text() -> String {
    let mut out = String::new();
    for entry in GUIDE {
        out.push_str(entry.title);
        out.push('\n');
        for point in entry.points {
            out.push_str("  - ");
            out.push_str(point);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
