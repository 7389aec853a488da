//! Cached token results and a reference in-memory token cache.
//!
//! [`CachedTokenResult`] is what a silent acquisition hands back to its
//! caller. [`TokenCache`] is a plain in-memory [`CacheLookup`]
//! implementation used by tests and diagnostics; production stores live
//! outside this crate and only need to implement the trait.
//!
//! # Security
//!
//! Access and refresh tokens are held in `SecretString`, zeroed on drop and
//! redacted from `Debug` output.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::identity_key::IdentityKey;
use crate::traits::{CacheLookup, CacheLookupError, CacheQuery, CollaboratorError};

/// A token record returned from the cache.
#[derive(Clone)]
pub struct CachedTokenResult {
    /// The key this record is stored under.
    key: IdentityKey,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_on: SystemTime,
    tenant_id: Option<String>,
    /// Whether the refresh token can be redeemed for other resources.
    is_multiple_resource_refresh_token: bool,
}

impl CachedTokenResult {
    /// Create a result with an access token and its expiry.
    pub fn new(key: IdentityKey, access_token: SecretString, expires_on: SystemTime) -> Self {
        Self {
            key,
            access_token,
            refresh_token: None,
            expires_on,
            tenant_id: None,
            is_multiple_resource_refresh_token: false,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: SecretString) -> Self {
        self.refresh_token = Some(refresh_token);
        self
    }

    /// Attach the tenant the token was issued in.
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Mark the refresh token as usable for other resources.
    pub fn with_multiple_resource_refresh_token(mut self, value: bool) -> Self {
        self.is_multiple_resource_refresh_token = value;
        self
    }

    pub fn key(&self) -> &IdentityKey {
        &self.key
    }

    /// Get a reference to the access token.
    ///
    /// # Security
    ///
    /// Expose the returned secret only when attaching it to an outgoing
    /// request.
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    pub fn expires_on(&self) -> SystemTime {
        self.expires_on
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn is_multiple_resource_refresh_token(&self) -> bool {
        self.is_multiple_resource_refresh_token
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Whether the access token expires within `margin` of `now`.
    pub fn is_expired_at(&self, now: SystemTime, margin: Duration) -> bool {
        match now.checked_add(margin) {
            Some(deadline) => self.expires_on <= deadline,
            None => true,
        }
    }

    /// Time left before the access token expires, `None` if already expired.
    pub fn expires_in(&self, now: SystemTime) -> Option<Duration> {
        self.expires_on
            .duration_since(now)
            .ok()
            .filter(|remaining| !remaining.is_zero())
    }

    /// Whether the access token is unusable but a refresh token is present.
    ///
    /// This is the hint for the caller to redeem the refresh token through
    /// its network collaborator; the silent flow never does so itself.
    pub fn needs_refresh(&self, now: SystemTime, margin: Duration) -> bool {
        self.has_refresh_token() && self.is_expired_at(now, margin)
    }

    /// Whether the record can still produce a token: either the access token
    /// is valid beyond `margin`, or a refresh token can be redeemed.
    pub fn is_usable_at(&self, now: SystemTime, margin: Duration) -> bool {
        !self.is_expired_at(now, margin) || self.has_refresh_token()
    }

    /// Strip the access token, keeping only the refresh token.
    ///
    /// The result is expired, so [`needs_refresh`](Self::needs_refresh) holds
    /// whenever a refresh token is present.
    pub fn into_refresh_only(mut self) -> Self {
        self.access_token = SecretString::from(String::new());
        self.expires_on = UNIX_EPOCH;
        self
    }
}

// Manual Debug implementation to avoid exposing tokens
impl std::fmt::Debug for CachedTokenResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTokenResult")
            .field("key", &self.key)
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_on", &self.expires_on)
            .field("tenant_id", &self.tenant_id)
            .field(
                "is_multiple_resource_refresh_token",
                &self.is_multiple_resource_refresh_token,
            )
            .finish()
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    result: CachedTokenResult,
    error: Option<CollaboratorError>,
}

impl StoredRecord {
    fn to_query(&self) -> CacheQuery {
        Self::query_for(self.result.clone(), &self.error)
    }

    /// Query for a record found under another resource: only its refresh
    /// token may be used.
    fn to_refresh_only_query(&self) -> CacheQuery {
        Self::query_for(self.result.clone().into_refresh_only(), &self.error)
    }

    fn query_for(record: CachedTokenResult, error: &Option<CollaboratorError>) -> CacheQuery {
        match error {
            Some(error) => CacheQuery::ErroredHit {
                record,
                error: error.clone(),
            },
            None => CacheQuery::Hit(record),
        }
    }

    /// Records carrying an error are always reported; others only while they
    /// can still produce a token.
    fn is_live_at(&self, now: SystemTime, margin: Duration) -> bool {
        self.error.is_some() || self.result.is_usable_at(now, margin)
    }
}

/// An in-memory token cache.
///
/// Lookups try the exact key first, then a partial scan over records of the
/// same authority, client, subject type and user. A scan that finds several
/// candidates reports [`CacheQuery::Ambiguous`]; it never picks one.
///
/// Records whose access token is expired (within the configured margin) and
/// that hold no refresh token are dead and never match. A record found under
/// another resource through the multi-resource refresh token fallback is
/// returned without its access token.
///
/// # Thread Safety
///
/// Lookups only need `&self`; share the cache behind an `Arc` once it is
/// populated, or wrap it in `tokio::sync::RwLock` if it must be mutated
/// concurrently.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use secrecy::SecretString;
/// use silent_token_core::cache::{CachedTokenResult, TokenCache};
/// use silent_token_core::identity_key::IdentityKey;
/// use silent_token_core::types::SubjectType;
///
/// let key = IdentityKey::new(
///     "https://login.example.com/contoso",
///     "https://graph.example.com",
///     "client-1",
///     SubjectType::User,
///     Some("oid-1".to_string()),
///     None,
/// )
/// .unwrap();
///
/// let mut cache = TokenCache::new();
/// cache.insert(CachedTokenResult::new(
///     key.clone(),
///     SecretString::from("access-token"),
///     SystemTime::now() + Duration::from_secs(3600),
/// ));
///
/// assert!(cache.contains_key(&key));
/// ```
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: HashMap<IdentityKey, StoredRecord>,
    cross_resource_fallback: bool,
    expiration_margin: Duration,
}

impl TokenCache {
    /// Create an empty cache without cross-resource fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache configured from `config`.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            cross_resource_fallback: config.cross_resource_fallback,
            expiration_margin: config.expiration_margin(),
        }
    }

    /// Enable or disable the multi-resource refresh token fallback.
    pub fn set_cross_resource_fallback(&mut self, enabled: bool) {
        self.cross_resource_fallback = enabled;
    }

    /// Treat access tokens expiring within `margin` as expired.
    pub fn set_expiration_margin(&mut self, margin: Duration) {
        self.expiration_margin = margin;
    }

    /// Insert a usable record, replacing any record under an equal key.
    pub fn insert(&mut self, result: CachedTokenResult) {
        trace!(key = %result.key(), "Inserting token record");
        self.entries.insert(
            result.key().clone(),
            StoredRecord {
                result,
                error: None,
            },
        );
    }

    /// Insert a record together with the error recorded against it.
    pub fn insert_errored(&mut self, result: CachedTokenResult, error: CollaboratorError) {
        trace!(key = %result.key(), code = %error.code, "Inserting errored token record");
        self.entries.insert(
            result.key().clone(),
            StoredRecord {
                result,
                error: Some(error),
            },
        );
    }

    /// Remove the record stored under `key`.
    ///
    /// Returns `true` if a record was removed.
    pub fn remove(&mut self, key: &IdentityKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            trace!(key = %key, "Removed token record");
        }
        removed
    }

    /// Clear all records.
    pub fn clear_all(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count = count, "Cleared all token records");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a record is stored under a key equal to `key`.
    pub fn contains_key(&self, key: &IdentityKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Get all keys in the cache (for diagnostics).
    pub fn keys(&self) -> impl Iterator<Item = &IdentityKey> {
        self.entries.keys()
    }

    /// Resolve `key` against the stored records at the current time.
    pub fn lookup(&self, key: &IdentityKey) -> CacheQuery {
        self.lookup_at(key, SystemTime::now())
    }

    /// Resolve `key` against the stored records as of `now`.
    pub fn lookup_at(&self, key: &IdentityKey, now: SystemTime) -> CacheQuery {
        let margin = self.expiration_margin;

        if let Some(record) = self.entries.get(key) {
            if record.is_live_at(now, margin) {
                trace!(key = %key, "Exact key hit");
                return record.to_query();
            }
            debug!(key = %key, "Dropping expired token without refresh token");
        }

        let candidates: Vec<&StoredRecord> = self
            .entries
            .iter()
            .filter(|(stored, _)| key.matches_ignoring_resource(stored))
            .map(|(_, record)| record)
            .filter(|record| record.is_live_at(now, margin))
            .collect();

        let same_resource: Vec<&StoredRecord> = candidates
            .iter()
            .copied()
            .filter(|record| key.matches_resource(record.result.key().resource()))
            .collect();

        match same_resource.as_slice() {
            [] => {}
            [record] => {
                trace!(key = %key, "Partial key hit");
                return record.to_query();
            }
            records => {
                debug!(key = %key, count = records.len(), "Multiple records match key");
                return CacheQuery::Ambiguous {
                    count: records.len(),
                };
            }
        }

        if !self.cross_resource_fallback {
            return CacheQuery::Miss;
        }

        let cross_resource: Vec<&StoredRecord> = candidates
            .into_iter()
            .filter(|record| {
                record.result.is_multiple_resource_refresh_token()
                    && record.result.has_refresh_token()
            })
            .collect();

        match cross_resource.as_slice() {
            [] => CacheQuery::Miss,
            [record] => {
                debug!(
                    key = %key,
                    stored_resource = %record.result.key().resource(),
                    "Using multi-resource refresh token from another resource"
                );
                record.to_refresh_only_query()
            }
            records => CacheQuery::Ambiguous {
                count: records.len(),
            },
        }
    }
}

impl CacheLookup for TokenCache {
    fn query<'a>(
        &'a self,
        key: &'a IdentityKey,
    ) -> Pin<Box<dyn Future<Output = Result<CacheQuery, CacheLookupError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.lookup(key)) })
    }
}
