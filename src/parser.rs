//! CSV parser for crew sales exports.

use serde::Deserialize;
use tracing::debug;

use crate::error::DataError;
use crate::leaderboard::SalesRecord;

/// Column layout of the sales export. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct SalesRow {
    #[serde(rename = "Airline_Code")]
    carrier_code: String,
    #[serde(rename = "Crew_ID")]
    crew_id: String,
    #[serde(rename = "Crew_Name")]
    crew_name: String,
    #[serde(rename = "crew_sold_quantity")]
    quantity_sold: f64,
}

/// Parses a CSV document into sales records.
///
/// A blank document or one with only a header row yields no records.
///
/// # Errors
///
/// Fails on the first bad row: a missing column, a blank carrier, crew id or
/// crew name, a quantity that is not a number, or a negative/non-finite
/// quantity. The error carries the line.
pub fn parse_sales(text: &str) -> Result<Vec<SalesRecord>, DataError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    let mut raw = csv::StringRecord::new();

    while rdr.read_record(&mut raw)? {
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: SalesRow = raw
            .deserialize(Some(&headers))
            .map_err(|e| DataError::Malformed {
                line,
                message: match e.kind() {
                    csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
                    _ => e.to_string(),
                },
            })?;

        for (column, value) in [
            ("Airline_Code", &row.carrier_code),
            ("Crew_ID", &row.crew_id),
            ("Crew_Name", &row.crew_name),
        ] {
            if value.trim().is_empty() {
                return Err(DataError::Malformed {
                    line,
                    message: format!("blank {column}"),
                });
            }
        }

        if !row.quantity_sold.is_finite() || row.quantity_sold < 0.0 {
            return Err(DataError::InvalidQuantity {
                line,
                crew_id: row.crew_id,
                value: row.quantity_sold,
            });
        }

        records.push(SalesRecord {
            carrier_code: row.carrier_code,
            crew_id: row.crew_id,
            crew_name: row.crew_name,
            // -0 becomes 0
            quantity_sold: row.quantity_sold + 0.0,
        });
    }

    debug!(rows = records.len(), "Parsed sales records");
    Ok(records)
}
