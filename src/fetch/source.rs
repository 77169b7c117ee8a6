use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, warn};

use super::client::HttpClient;
use super::{FetchedCsv, fetch_csv};
use crate::error::{FetchError, FetchResult};

/// Anything that can produce the sales CSV for a location.
#[async_trait]
pub trait CsvSource: Send + Sync {
    async fn fetch(&self, location: &str) -> FetchResult<FetchedCsv>;
}

/// Fetches `http`-prefixed locations over HTTP and reads anything else from disk.
pub struct DefaultSource<C> {
    client: C,
}

impl<C: HttpClient> DefaultSource<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: HttpClient> CsvSource for DefaultSource<C> {
    #[tracing::instrument(skip(self), fields(location = %location))]
    async fn fetch(&self, location: &str) -> FetchResult<FetchedCsv> {
        let start = Instant::now();

        let fetched = if is_remote(location) {
            fetch_csv(&self.client, location).await?
        } else {
            let body = tokio::fs::read_to_string(location)
                .await
                .map_err(|e| FetchError::Io {
                    path: location.to_string(),
                    message: e.to_string(),
                })?;
            FetchedCsv {
                body,
                last_modified: None,
            }
        };

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 15 {
            warn!(elapsed_secs = elapsed.as_secs(), "Sales fetch was slow");
        }
        debug!(
            bytes = fetched.body.len(),
            last_modified = fetched.last_modified.as_deref(),
            "Sales CSV received"
        );

        Ok(fetched)
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
