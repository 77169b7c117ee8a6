//! Output formatting and persistence for leaderboards.
//!
//! Supports pretty-printing, JSON logging, CSV export, and page files.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::leaderboard::CarrierRanking;

const EXPORT_HEADER: [&str; 5] = [
    "carrier_code",
    "rank",
    "crew_id",
    "crew_name",
    "total_quantity",
];

/// Flat row written by [`export_rankings`].
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    carrier_code: &'a str,
    rank: usize,
    crew_id: &'a str,
    crew_name: &'a str,
    total_quantity: f64,
}

/// Logs rankings using Rust's debug pretty-print format.
pub fn print_pretty(carriers: &[CarrierRanking]) {
    debug!("{:#?}", carriers);
}

/// Logs rankings as pretty-printed JSON.
pub fn print_json(carriers: &[CarrierRanking]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(carriers)?);
    Ok(())
}

/// Logs one line per podium/runner-up position for each carrier.
pub fn print_summary(carriers: &[CarrierRanking]) {
    for carrier in carriers {
        info!(
            carrier = %carrier.carrier_code,
            entries = carrier.entries.len(),
            total = carrier.total(),
            "Carrier"
        );
        for entry in carrier.entries.iter().take(crate::leaderboard::BOARD_SIZE) {
            info!(
                carrier = %carrier.carrier_code,
                rank = entry.rank,
                crew_id = %entry.crew_id,
                crew_name = %entry.crew_name,
                total = entry.total_quantity,
                "Ranked"
            );
        }
    }
}

/// Writes every ranked entry to a CSV file, replacing any previous export.
pub fn export_rankings(path: &str, carriers: &[CarrierRanking]) -> Result<()> {
    create_parent(path)?;
    debug!(path, "Writing rankings CSV");

    // Header is written by hand so an empty leaderboard still gets one.
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {path}"))?;
    writer.write_record(EXPORT_HEADER)?;

    for entry in carriers.iter().flat_map(|c| &c.entries) {
        writer.serialize(ExportRow {
            carrier_code: &entry.carrier_code,
            rank: entry.rank,
            crew_id: &entry.crew_id,
            crew_name: &entry.crew_name,
            total_quantity: entry.total_quantity,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a rendered page, creating parent directories as needed.
pub fn write_page(path: &str, html: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, html).with_context(|| format!("writing {path}"))?;
    info!(path, bytes = html.len(), "Page written");
    Ok(())
}

fn create_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}
