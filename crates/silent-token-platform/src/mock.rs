//! Mock cache lookup for testing.
//!
//! This module provides a configurable mock implementation of [`CacheLookup`]
//! that returns a predetermined outcome and records how it was called.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use secrecy::SecretString;
use silent_token_core::{
    CacheLookup, CacheLookupError, CacheQuery, CachedTokenResult, CollaboratorError, IdentityKey,
};

/// A mock cache lookup for testing.
///
/// # Example
///
/// ```
/// use silent_token_platform::MockCacheLookup;
///
/// // A cache that never has anything
/// let empty = MockCacheLookup::miss();
///
/// // A cache that reports three candidates
/// let ambiguous = MockCacheLookup::ambiguous(3);
/// assert_eq!(ambiguous.call_count(), 0);
/// ```
pub struct MockCacheLookup {
    /// Outcome to return.
    outcome: Result<CacheQuery, CacheLookupError>,
    /// Number of times query was called.
    call_count: Arc<AtomicUsize>,
    /// Key passed to the most recent query.
    last_key: Arc<Mutex<Option<IdentityKey>>>,
    /// Delay before responding.
    delay: Option<Duration>,
}

impl MockCacheLookup {
    fn with_outcome(outcome: Result<CacheQuery, CacheLookupError>) -> Self {
        Self {
            outcome,
            call_count: Arc::new(AtomicUsize::new(0)),
            last_key: Arc::new(Mutex::new(None)),
            delay: None,
        }
    }

    /// Create a mock that finds nothing.
    pub fn miss() -> Self {
        Self::with_outcome(Ok(CacheQuery::Miss))
    }

    /// Create a mock that returns `result`.
    pub fn hit(result: CachedTokenResult) -> Self {
        Self::with_outcome(Ok(CacheQuery::Hit(result)))
    }

    /// Create a mock holding an access token for `key` valid for one hour.
    pub fn with_token(key: IdentityKey, access_token: impl Into<String>) -> Self {
        let token = SecretString::from(access_token.into());
        let expires_on = SystemTime::now() + Duration::from_secs(3600);
        Self::hit(CachedTokenResult::new(key, token, expires_on))
    }

    /// Create a mock whose single match carries a stored error.
    pub fn errored(record: CachedTokenResult, error: CollaboratorError) -> Self {
        Self::with_outcome(Ok(CacheQuery::ErroredHit { record, error }))
    }

    /// Create a mock that reports `count` matching records.
    pub fn ambiguous(count: usize) -> Self {
        Self::with_outcome(Ok(CacheQuery::Ambiguous { count }))
    }

    /// Create a mock whose lookup call fails.
    pub fn failing(error: CacheLookupError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Add a delay before responding.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times query was called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get a clone of the call counter for external tracking.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// The key passed to the most recent query, if any.
    pub fn last_key(&self) -> Option<IdentityKey> {
        self.last_key.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Default for MockCacheLookup {
    fn default() -> Self {
        Self::miss()
    }
}

impl CacheLookup for MockCacheLookup {
    fn query<'a>(
        &'a self,
        key: &'a IdentityKey,
    ) -> Pin<Box<dyn Future<Output = Result<CacheQuery, CacheLookupError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_key.lock() {
            *last = Some(key.clone());
        }

        let outcome = self.outcome.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        })
    }
}
