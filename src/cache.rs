//! Time-bounded memoization of fetch results, keyed by source location.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::FetchResult;
use crate::fetch::{CsvSource, FetchedCsv};

/// Default lifetime of a cached fetch.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CachedFetch {
    result: FetchResult<FetchedCsv>,
    fetched_at: Instant,
}

/// Caches the outcome of each fetch, failures included, for `ttl`.
pub struct FetchCache<K> {
    ttl: Duration,
    clock: K,
    entries: HashMap<String, CachedFetch>,
}

impl<K: Clock> FetchCache<K> {
    pub fn new(ttl: Duration, clock: K) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached result for `location`, fetching through `source`
    /// when nothing fresh is held.
    pub async fn get<S>(&mut self, source: &S, location: &str) -> FetchResult<FetchedCsv>
    where
        S: CsvSource + ?Sized,
    {
        let now = self.clock.now();
        self.evict_expired(now);

        if let Some(hit) = self.entries.get(location) {
            let age = now.saturating_duration_since(hit.fetched_at);
            debug!(location, age_secs = age.as_secs(), "Fetch cache hit");
            return hit.result.clone();
        }

        debug!(location, "Fetch cache miss");
        let result = source.fetch(location).await;
        self.entries.insert(
            location.to_string(),
            CachedFetch {
                result: result.clone(),
                fetched_at: now,
            },
        );
        result
    }

    pub fn invalidate(&mut self, location: &str) -> bool {
        self.entries.remove(location).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CsvSource for CountingSource {
        async fn fetch(&self, location: &str) -> FetchResult<FetchedCsv> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(FetchError::Status {
                    url: location.to_string(),
                    status: 503,
                });
            }
            Ok(FetchedCsv {
                body: format!("{location}#{n}"),
                last_modified: None,
            })
        }
    }

    impl CountingSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let clock = ManualClock::new();
        let source = CountingSource::default();
        let mut cache = FetchCache::new(DEFAULT_TTL, &clock);

        let first = cache.get(&source, "a").await.unwrap();
        clock.advance(Duration::from_secs(299));
        let second = cache.get(&source, "a").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_refetch_after_ttl() {
        let clock = ManualClock::new();
        let source = CountingSource::default();
        let mut cache = FetchCache::new(DEFAULT_TTL, &clock);

        cache.get(&source, "a").await.unwrap();
        clock.advance(Duration::from_secs(300));
        let refreshed = cache.get(&source, "a").await.unwrap();

        assert_eq!(refreshed.body, "a#2");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_locations_cached_independently() {
        let clock = ManualClock::new();
        let source = CountingSource::default();
        let mut cache = FetchCache::new(DEFAULT_TTL, &clock);

        cache.get(&source, "a").await.unwrap();
        cache.get(&source, "b").await.unwrap();
        cache.get(&source, "a").await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_cached() {
        let clock = ManualClock::new();
        let source = CountingSource {
            fail: true,
            ..Default::default()
        };
        let mut cache = FetchCache::new(DEFAULT_TTL, &clock);

        assert!(cache.get(&source, "a").await.is_err());
        assert!(cache.get(&source, "a").await.is_err());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let clock = ManualClock::new();
        let source = CountingSource::default();
        let mut cache = FetchCache::new(DEFAULT_TTL, &clock);

        cache.get(&source, "a").await.unwrap();
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        cache.get(&source, "a").await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_evicted() {
        let clock = ManualClock::new();
        let source = CountingSource::default();
        let mut cache = FetchCache::new(Duration::from_secs(10), &clock);

        cache.get(&source, "a").await.unwrap();
        clock.advance(Duration::from_secs(11));
        cache.get(&source, "b").await.unwrap();

        assert_eq!(cache.len(), 1);
    }
}
