//! Page state derived from one fetch.

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{info, warn};

use crate::cache::{Clock, FetchCache};
use crate::error::FetchResult;
use crate::fetch::{CsvSource, FetchedCsv};
use crate::leaderboard::{CarrierRanking, aggregate};
use crate::parser::parse_sales;

#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    /// The fetch or the parse failed; nothing is ranked.
    Failed { message: String },
    /// The source held no rows.
    NoData,
    Ready {
        refreshed: String,
        carriers: Vec<CarrierRanking>,
    },
}

impl Dashboard {
    /// Turns a fetch result into a page state. `now` is used for the refresh
    /// label when the source reports no `Last-Modified`.
    #[tracing::instrument(skip_all)]
    pub fn build(fetched: &FetchResult<FetchedCsv>, now: NaiveDateTime) -> Self {
        let csv = match fetched {
            Ok(csv) => csv,
            Err(e) => {
                warn!(error = %e, "Sales fetch failed");
                return Dashboard::Failed {
                    message: e.to_string(),
                };
            }
        };

        let records = match parse_sales(&csv.body) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Sales CSV rejected");
                return Dashboard::Failed {
                    message: e.to_string(),
                };
            }
        };

        if records.is_empty() {
            info!("Sales CSV has no rows");
            return Dashboard::NoData;
        }

        let carriers = aggregate(&records);
        info!(
            rows = records.len(),
            carriers = carriers.len(),
            "Leaderboard built"
        );

        Dashboard::Ready {
            refreshed: refreshed_label(csv.last_modified.as_deref(), now),
            carriers,
        }
    }

    /// Fetches `location` through `cache` and builds the page state from it.
    #[tracing::instrument(skip(cache, source))]
    pub async fn load<K, S>(cache: &mut FetchCache<K>, source: &S, location: &str) -> Self
    where
        K: Clock,
        S: CsvSource + ?Sized,
    {
        let fetched = cache.get(source, location).await;
        Self::build(&fetched, Local::now().naive_local())
    }

    pub fn carriers(&self) -> &[CarrierRanking] {
        match self {
            Dashboard::Ready { carriers, .. } => carriers,
            _ => &[],
        }
    }
}

/// Human-readable "last refreshed" time.
///
/// Prefers the RFC 2822 `Last-Modified` header; falls back to the raw header
/// text when it does not parse, and to `now` when there is no header.
pub fn refreshed_label(last_modified: Option<&str>, now: NaiveDateTime) -> String {
    match last_modified {
        Some(raw) => match DateTime::parse_from_rfc2822(raw) {
            Ok(ts) => ts
                .naive_utc()
                .format("%B %d, %Y at %I:%M %p UTC")
                .to_string(),
            Err(_) => raw.to_string(),
        },
        None => now.format("%B %d, %Y at %I:%M %p").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SystemClock;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const HEADER: &str = "Airline_Code,Crew_ID,Crew_Name,crew_sold_quantity";

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn fetched(body: &str, last_modified: Option<&str>) -> FetchResult<FetchedCsv> {
        Ok(FetchedCsv {
            body: body.to_string(),
            last_modified: last_modified.map(str::to_string),
        })
    }

    #[test]
    fn test_fetch_error_skips_aggregation() {
        let err = Err(FetchError::Status {
            url: "http://x".into(),
            status: 500,
        });
        let dashboard = Dashboard::build(&err, now());
        assert_eq!(
            dashboard,
            Dashboard::Failed {
                message: "500 from http://x".into()
            }
        );
        assert!(dashboard.carriers().is_empty());
    }

    #[test]
    fn test_header_only_is_no_data() {
        let dashboard = Dashboard::build(&fetched(HEADER, None), now());
        assert_eq!(dashboard, Dashboard::NoData);
    }

    #[test]
    fn test_malformed_row_fails_whole_load() {
        let body = format!("{HEADER}\nAK,1,Alice,5\nAK,2,Bob,n/a\n");
        let dashboard = Dashboard::build(&fetched(&body, None), now());
        match dashboard {
            Dashboard::Failed { message } => assert!(message.starts_with("line 3:"), "{message}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_key_row_fails_whole_load() {
        let body = format!("{HEADER}\nAK,1,Alice,5\n,,,3\n");
        let dashboard = Dashboard::build(&fetched(&body, None), now());
        assert_eq!(
            dashboard,
            Dashboard::Failed {
                message: "line 3: blank Airline_Code".into()
            }
        );
        assert!(dashboard.carriers().is_empty());
    }

    struct FixtureSource {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CsvSource for FixtureSource {
        async fn fetch(&self, _location: &str) -> FetchResult<FetchedCsv> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedCsv {
                body: self.body.to_string(),
                last_modified: Some("Fri, 07 Mar 2025 09:30:00 GMT".into()),
            })
        }
    }

    #[tokio::test]
    async fn test_load_goes_through_cache() {
        let source = FixtureSource {
            body: "Airline_Code,Crew_ID,Crew_Name,crew_sold_quantity\nAK,1,Alice,5\nAK,2,Bob,9\n",
            calls: AtomicUsize::new(0),
        };
        let mut cache = FetchCache::new(Duration::from_secs(300), SystemClock);

        let first = Dashboard::load(&mut cache, &source, "sales.csv").await;
        let second = Dashboard::load(&mut cache, &source, "sales.csv").await;

        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        match first {
            Dashboard::Ready { refreshed, carriers } => {
                assert_eq!(refreshed, "March 07, 2025 at 09:30 AM UTC");
                assert_eq!(carriers[0].carrier_code, "AK");
                assert_eq!(carriers[0].entries[0].crew_name, "Bob");
            }
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn test_ready_dashboard() {
        let body = format!("{HEADER}\nBB,3,Carol,10\nAA,1,Alice,100\nAA,2,Bob,200\n");
        let dashboard = Dashboard::build(
            &fetched(&body, Some("Fri, 07 Mar 2025 09:30:00 GMT")),
            now(),
        );

        match &dashboard {
            Dashboard::Ready { refreshed, carriers } => {
                assert_eq!(refreshed, "March 07, 2025 at 09:30 AM UTC");
                assert_eq!(carriers.len(), 2);
                assert_eq!(carriers[0].carrier_code, "AA");
                assert_eq!(carriers[0].entries[0].crew_name, "Bob");
            }
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[test]
    fn test_refreshed_label_fallbacks() {
        assert_eq!(
            refreshed_label(Some("yesterday-ish"), now()),
            "yesterday-ish"
        );
        assert_eq!(refreshed_label(None, now()), "March 07, 2025 at 02:05 PM");
    }
}
