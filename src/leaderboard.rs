//! Per-carrier sales rankings.
//!
//! Records are grouped by `(carrier, crew id, crew name)`, quantities summed,
//! and each carrier's crew sorted by total descending. Ties keep the order in
//! which the groups first appeared in the input.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Entries shown on the podium.
pub const PODIUM_SIZE: usize = 3;

/// Entries shown in total (podium plus runners-up).
pub const BOARD_SIZE: usize = 10;

/// One row of sales input.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub carrier_code: String,
    pub crew_id: String,
    pub crew_name: String,
    pub quantity_sold: f64,
}

impl SalesRecord {
    pub fn new(carrier_code: &str, crew_id: &str, crew_name: &str, quantity_sold: f64) -> Self {
        Self {
            carrier_code: carrier_code.to_string(),
            crew_id: crew_id.to_string(),
            crew_name: crew_name.to_string(),
            quantity_sold,
        }
    }
}

/// A crew member's summed sales and 1-based position within their carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub carrier_code: String,
    pub crew_id: String,
    pub crew_name: String,
    pub total_quantity: f64,
}

impl From<&RankedEntry> for SalesRecord {
    fn from(entry: &RankedEntry) -> Self {
        SalesRecord {
            carrier_code: entry.carrier_code.clone(),
            crew_id: entry.crew_id.clone(),
            crew_name: entry.crew_name.clone(),
            quantity_sold: entry.total_quantity,
        }
    }
}

/// Ranked crew for a single carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierRanking {
    pub carrier_code: String,
    pub entries: Vec<RankedEntry>,
}

/// How the top of a carrier's ranking is laid out.
#[derive(Debug, PartialEq)]
pub enum Podium<'a> {
    /// Nobody sold anything for this carrier.
    Empty,
    /// Fewer than three entries, shown one after another.
    Stacked(&'a [RankedEntry]),
    /// Exactly the top three, shown side by side.
    Ladder(&'a [RankedEntry]),
}

impl CarrierRanking {
    pub fn podium(&self) -> Podium<'_> {
        match self.entries.len() {
            0 => Podium::Empty,
            n if n < PODIUM_SIZE => Podium::Stacked(&self.entries),
            _ => Podium::Ladder(&self.entries[..PODIUM_SIZE]),
        }
    }

    /// Positions 4 through 10. Anything past the board is dropped.
    pub fn runners_up(&self) -> &[RankedEntry] {
        let end = self.entries.len().min(BOARD_SIZE);
        if end <= PODIUM_SIZE {
            return &[];
        }
        &self.entries[PODIUM_SIZE..end]
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.total_quantity).sum()
    }
}

/// Groups, sums and ranks sales records.
///
/// Carriers come back in ascending code order. Within a carrier, entries are
/// sorted by total descending; equal totals keep first-encounter order.
pub fn aggregate(records: &[SalesRecord]) -> Vec<CarrierRanking> {
    let mut carriers: BTreeMap<&str, Vec<RankedEntry>> = BTreeMap::new();
    let mut slots: HashMap<(&str, &str, &str), usize> = HashMap::new();

    for record in records {
        let entries = carriers.entry(record.carrier_code.as_str()).or_default();
        let key = (
            record.carrier_code.as_str(),
            record.crew_id.as_str(),
            record.crew_name.as_str(),
        );

        match slots.get(&key) {
            Some(&idx) => entries[idx].total_quantity += record.quantity_sold,
            None => {
                slots.insert(key, entries.len());
                entries.push(RankedEntry {
                    rank: 0,
                    carrier_code: record.carrier_code.clone(),
                    crew_id: record.crew_id.clone(),
                    crew_name: record.crew_name.clone(),
                    total_quantity: record.quantity_sold,
                });
            }
        }
    }

    carriers
        .into_iter()
        .map(|(code, mut entries)| {
            // sort_by is stable; partial_cmp keeps -0.0 and 0.0 equal
            entries.sort_by(|a, b| {
                b.total_quantity
                    .partial_cmp(&a.total_quantity)
                    .unwrap_or(Ordering::Equal)
            });
            for (i, entry) in entries.iter_mut().enumerate() {
                entry.rank = i + 1;
            }
            CarrierRanking {
                carrier_code: code.to_string(),
                entries,
            }
        })
        .collect()
}
