//! Indicator guide command.

use anyhow::Result;
use chartwise_indicators::{guide, IndicatorKind};

pub fn run() -> Result<()> {
    println!("Available indicators:");
    println!();
    for kind in IndicatorKind::ALL {
        println!("  {:<24} {}", kind.label(), kind.series_names().join(", "));
    }
    println!();
    print!("{}", guide::render_text());

    Ok(())
}
