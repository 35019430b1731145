//! Command-line interface definitions and output rendering.

use std::path::PathBuf;

use chrono::DateTime;
use clap::{Parser, Subcommand};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::app::CheckReport;
use crate::domain::{Catalog, Listing, PricedListing};

/// Option catalog assembly for a decentralized options dashboard
#[derive(Parser, Debug)]
#[command(name = "strikebook")]
#[command(version)]
pub struct Cli {
    /// Path to the config file (defaults to strikebook.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level subcommands for the strikebook CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble the catalog and print it (the default)
    Load(LoadArgs),

    /// Probe the indexer and chain provider with one call each
    Check,
}

#[derive(clap::Args, Debug, Default)]
pub struct LoadArgs {
    /// JSON output for scripting
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ListingRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "symbol")]
    symbol: String,
    #[tabled(rename = "collateral")]
    collateral: &'static str,
    #[tabled(rename = "underlying")]
    underlying: &'static str,
    #[tabled(rename = "expiry")]
    expiry: String,
    #[tabled(rename = "venue")]
    venue: String,
}

#[derive(Tabled)]
struct PricedRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "strike $")]
    strike_price_usd: u32,
    #[tabled(rename = "expiry")]
    expiry: String,
    #[tabled(rename = "venue")]
    venue: String,
}

fn format_expiry(unix: u64) -> String {
    DateTime::from_timestamp(unix as i64, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| unix.to_string())
}

impl ListingRow {
    fn from_listing(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            symbol: listing.symbol.clone(),
            collateral: listing.collateral.symbol,
            underlying: listing.underlying.symbol,
            expiry: format_expiry(listing.instrument.expiry),
            venue: listing.venue.to_string(),
        }
    }
}

impl PricedRow {
    fn from_priced(priced: &PricedListing) -> Self {
        Self {
            name: priced.listing.name.clone(),
            strike_price_usd: priced.strike_price_usd,
            expiry: format_expiry(priced.listing.instrument.expiry),
            venue: priced.listing.venue.to_string(),
        }
    }
}

/// Render the catalog as three tables, one per set.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    let sections: [(&str, String); 3] = [
        (
            "insurances",
            Table::new(catalog.insurances.iter().map(ListingRow::from_listing))
                .with(Style::sharp())
                .to_string(),
        ),
        (
            "puts",
            Table::new(catalog.puts.iter().map(PricedRow::from_priced))
                .with(Style::sharp())
                .to_string(),
        ),
        (
            "calls",
            Table::new(catalog.calls.iter().map(PricedRow::from_priced))
                .with(Style::sharp())
                .to_string(),
        ),
    ];

    for (title, table) in sections {
        out.push_str(title);
        out.push('\n');
        out.push_str(&table);
        out.push_str("\n\n");
    }

    out
}

/// Render the connectivity probe, one line per collaborator.
pub fn render_check(report: &CheckReport) -> String {
    let mut out = String::new();

    match &report.indexer {
        Ok(count) => out.push_str(&format!("indexer: ok ({count} instruments)\n")),
        Err(err) => out.push_str(&format!("indexer: failed ({err})\n")),
    }
    match &report.chain {
        Ok(symbol) => out.push_str(&format!("chain provider: ok ({symbol})\n")),
        Err(err) => out.push_str(&format!("chain provider: failed ({err})\n")),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expiry_renders_date() {
        assert_eq!(format_expiry(1_610_000_000), "2021-01-07");
    }
}
