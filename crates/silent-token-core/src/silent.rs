//! Silent token acquisition decision flow.
//!
//! Given a [`SilentRequestContext`], [`SilentAcquisition`] decides without
//! any user interaction whether a cached token can be returned:
//!
//! 1. Build the [`IdentityKey`] (fails with `InvalidIdentityDescriptor` when
//!    the caller gave no way to identify the user).
//! 2. Hand the broker annotations to the platform policy, ask it whether the
//!    cache may be read, then query the [`CacheLookup`] collaborator exactly
//!    once.
//! 3. Return the single usable record, or a typed failure. A record whose
//!    access token is expired and that holds no refresh token is not usable.
//!
//! The flow never prompts, never retries, and never redeems refresh tokens.
//! Every failure is terminal for the silent path; falling back to an
//! interactive flow is the caller's decision.

use std::time::{Duration, SystemTime};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::cache::CachedTokenResult;
use crate::identity_key::{IdentityKey, IdentityKeyError};
use crate::request::{BrokerParameters, SilentRequestContext};
use crate::traits::{
    CacheLookup, CacheLookupError, CacheQuery, CollaboratorError, PlatformPolicy,
    SilentOnlyPolicy,
};

/// Failures of a silent acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SilentAcquisitionError {
    /// Neither a unique id nor a displayable id was supplied.
    #[error("silent acquisition requires a unique id or displayable id for the user")]
    InvalidIdentityDescriptor,

    /// Authority, resource or client id was empty.
    #[error("invalid silent request: {0}")]
    InvalidKey(#[from] IdentityKeyError),

    /// No token matching the request was found in the cache.
    #[error("failed to acquire token silently: no matching token in the cache")]
    NoCachedRecord,

    /// Several cached tokens match a request that should be unique.
    #[error("failed to acquire token silently: {count} cached tokens match the request")]
    AmbiguousMatch {
        /// Number of matching records reported by the cache.
        count: usize,
    },

    /// The matching record carries an earlier failure.
    #[error("failed to acquire token silently: {0}")]
    PropagatedCollaboratorError(#[source] CollaboratorError),

    /// The cache lookup itself failed.
    #[error("cache lookup failed: {0}")]
    CacheUnavailable(#[source] CacheLookupError),
}

impl SilentAcquisitionError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentityDescriptor => "invalid_identity_descriptor",
            Self::InvalidKey(_) => "invalid_request",
            Self::NoCachedRecord => "failed_to_acquire_token_silently",
            Self::AmbiguousMatch { .. } => "multiple_matching_tokens_detected",
            Self::PropagatedCollaboratorError(_) => "cached_token_error",
            Self::CacheUnavailable(_) => "cache_unavailable",
        }
    }

    /// Whether the caller may recover by running an interactive flow.
    pub fn requires_interaction(&self) -> bool {
        matches!(
            self,
            Self::NoCachedRecord | Self::PropagatedCollaboratorError(_)
        )
    }

    /// Whether repeating the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}

/// The key and broker annotations built for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub key: IdentityKey,
    pub broker_parameters: BrokerParameters,
}

/// Build the cache key and broker annotations for `ctx`.
///
/// # Errors
///
/// - `InvalidIdentityDescriptor` if the context has no resolvable user
/// - `InvalidKey` if authority, resource or client id is empty
pub fn prepare(ctx: &SilentRequestContext) -> Result<PreparedRequest, SilentAcquisitionError> {
    let user = ctx
        .user()
        .filter(|user| user.is_resolvable())
        .ok_or(SilentAcquisitionError::InvalidIdentityDescriptor)?;

    Ok(PreparedRequest {
        key: ctx.identity_key(user)?,
        broker_parameters: BrokerParameters::for_silent_request(user),
    })
}

/// The silent acquisition decision.
///
/// Holds no mutable state; one instance can serve concurrent requests.
///
/// # Example
///
/// ```
/// use silent_token_core::cache::TokenCache;
/// use silent_token_core::request::{SilentRequestContext, UserIdentifier};
/// use silent_token_core::silent::{SilentAcquisition, SilentAcquisitionError};
/// use silent_token_core::types::ClientCredential;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let silent = SilentAcquisition::new(TokenCache::new());
/// let ctx = SilentRequestContext::new(
///     "https://login.example.com/contoso",
///     "https://graph.example.com",
///     "client-1",
///     ClientCredential::Public,
///     Some(UserIdentifier::displayable("alice@contoso.com")),
/// );
///
/// let err = silent.acquire_silently(&ctx).await.unwrap_err();
/// assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
/// # }
/// ```
pub struct SilentAcquisition<C: CacheLookup, P: PlatformPolicy = SilentOnlyPolicy> {
    cache: C,
    policy: P,
    expiration_margin: Duration,
}

impl<C: CacheLookup> SilentAcquisition<C, SilentOnlyPolicy> {
    /// Create a silent-only acquisition: the cache is always consulted.
    pub fn new(cache: C) -> Self {
        Self::with_policy(cache, SilentOnlyPolicy)
    }
}

impl<C: CacheLookup, P: PlatformPolicy> SilentAcquisition<C, P> {
    /// Create an acquisition that applies `policy` before reading the cache.
    pub fn with_policy(cache: C, policy: P) -> Self {
        Self {
            cache,
            policy,
            expiration_margin: Duration::ZERO,
        }
    }

    /// Treat access tokens expiring within `margin` as expired (default: zero).
    pub fn with_expiration_margin(mut self, margin: Duration) -> Self {
        self.expiration_margin = margin;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Return a cached token for `ctx` without any user interaction.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentityDescriptor` / `InvalidKey` before any cache query
    /// - `NoCachedRecord` if nothing matches, the policy forbids reading
    ///   the cache, or the match is expired without a refresh token
    /// - `AmbiguousMatch` if the cache reports several candidates
    /// - `PropagatedCollaboratorError` with the error stored on the record
    /// - `CacheUnavailable` if the lookup call fails
    pub async fn acquire_silently(
        &self,
        ctx: &SilentRequestContext,
    ) -> Result<CachedTokenResult, SilentAcquisitionError> {
        let prepared = prepare(ctx)?;
        let key = &prepared.key;

        debug!(
            key = %key,
            subject_type = %key.subject_type(),
            platform = self.policy.name(),
            "Processing silent token request"
        );

        self.policy.annotate_broker(&prepared.broker_parameters);

        let options = ctx.options();
        if !self.policy.is_cache_load_allowed(&options) {
            debug!(
                prompt = ?options.prompt_behavior,
                platform = self.policy.name(),
                "Cache load disallowed by platform policy"
            );
            return Err(SilentAcquisitionError::NoCachedRecord);
        }

        let query = self.cache.query(key).await.map_err(|e| {
            warn!(error = %e, key = %key, "Cache lookup failed");
            SilentAcquisitionError::CacheUnavailable(e)
        })?;

        match query {
            CacheQuery::Hit(result) => {
                let now = SystemTime::now();
                if !result.is_usable_at(now, self.expiration_margin) {
                    debug!(key = %key, "Cached token expired and has no refresh token");
                    return Err(SilentAcquisitionError::NoCachedRecord);
                }
                trace!(
                    key = %key,
                    needs_refresh = result.needs_refresh(now, self.expiration_margin),
                    "Returning cached token"
                );
                Ok(result)
            }
            CacheQuery::Miss => {
                debug!(key = %key, "No token matching arguments found in the cache");
                Err(SilentAcquisitionError::NoCachedRecord)
            }
            CacheQuery::ErroredHit { record, error } => {
                debug!(
                    key = %key,
                    stored_key = %record.key(),
                    code = %error.code,
                    "Cached token carries a stored error"
                );
                Err(SilentAcquisitionError::PropagatedCollaboratorError(error))
            }
            CacheQuery::Ambiguous { count } => {
                warn!(key = %key, count = count, "Ambiguous cache match");
                Err(SilentAcquisitionError::AmbiguousMatch { count })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use secrecy::{ExposeSecret, SecretString};

    use crate::cache::TokenCache;
    use crate::request::{BrokerParameter, UserIdentifier};
    use crate::traits::RequestOptions;
    use crate::types::{ClientCredential, PromptBehavior, ProtocolPromptValue, SubjectType};

    const AUTHORITY: &str = "https://login.example.com/contoso";
    const RESOURCE: &str = "https://graph.example.com";
    const CLIENT_ID: &str = "client-1";

    /// Returns a fixed query outcome and counts calls.
    struct FixedLookup {
        outcome: Result<CacheQuery, CacheLookupError>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedLookup {
        fn new(outcome: Result<CacheQuery, CacheLookupError>) -> Self {
            Self {
                outcome,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl CacheLookup for FixedLookup {
        fn query<'a>(
            &'a self,
            _key: &'a IdentityKey,
        ) -> Pin<Box<dyn Future<Output = Result<CacheQuery, CacheLookupError>> + Send + 'a>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    /// Forbids cache load for any prompting request.
    struct NoCacheWhenPrompting;

    impl PlatformPolicy for NoCacheWhenPrompting {
        fn is_cache_load_allowed(&self, options: &RequestOptions) -> bool {
            options.prompt_behavior.is_none()
        }

        fn prompt_protocol_value(&self, _prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
            None
        }

        fn name(&self) -> &'static str {
            "test"
        }
    }

    fn ctx(user: Option<UserIdentifier>) -> SilentRequestContext {
        SilentRequestContext::new(AUTHORITY, RESOURCE, CLIENT_ID, ClientCredential::Public, user)
    }

    fn alice() -> Option<UserIdentifier> {
        Some(UserIdentifier::displayable("alice@contoso.com"))
    }

    fn record(token: &str) -> CachedTokenResult {
        let key = IdentityKey::new(
            AUTHORITY,
            RESOURCE,
            CLIENT_ID,
            SubjectType::User,
            Some("oid-1".to_string()),
            Some("alice@contoso.com".to_string()),
        )
        .unwrap();
        CachedTokenResult::new(
            key,
            SecretString::from(token),
            SystemTime::now() + Duration::from_secs(3600),
        )
    }

    #[tokio::test]
    async fn missing_descriptor_fails_without_query() {
        let lookup = FixedLookup::new(Ok(CacheQuery::Hit(record("at"))));
        let calls = Arc::clone(&lookup.calls);
        let silent = SilentAcquisition::new(lookup);

        let err = silent.acquire_silently(&ctx(None)).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::InvalidIdentityDescriptor);

        let err = silent
            .acquire_silently(&ctx(Some(UserIdentifier::unique(""))))
            .await
            .unwrap_err();
        assert_eq!(err, SilentAcquisitionError::InvalidIdentityDescriptor);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_authority_fails_without_query() {
        let lookup = FixedLookup::new(Ok(CacheQuery::Miss));
        let calls = Arc::clone(&lookup.calls);
        let silent = SilentAcquisition::new(lookup);
        let ctx = SilentRequestContext::new("", RESOURCE, CLIENT_ID, ClientCredential::Public, alice());

        let err = silent.acquire_silently(&ctx).await.unwrap_err();
        assert_eq!(
            err,
            SilentAcquisitionError::InvalidKey(IdentityKeyError::MissingField {
                field: "authority"
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_cache_yields_no_cached_record() {
        let silent = SilentAcquisition::new(TokenCache::new());
        let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
        assert!(err.requires_interaction());
        assert_eq!(err.code(), "failed_to_acquire_token_silently");
    }

    #[tokio::test]
    async fn single_hit_is_returned_unchanged() {
        let original = record("access-token-1")
            .with_refresh_token(SecretString::from("refresh-1"))
            .with_tenant_id("tenant-1");
        let silent = SilentAcquisition::new(FixedLookup::new(Ok(CacheQuery::Hit(original.clone()))));

        let result = silent.acquire_silently(&ctx(alice())).await.unwrap();
        assert_eq!(result.key(), original.key());
        assert_eq!(result.key().unique_id(), Some("oid-1"));
        assert_eq!(result.access_token().expose_secret(), "access-token-1");
        assert_eq!(
            result.refresh_token().map(|t| t.expose_secret().to_string()),
            Some("refresh-1".to_string())
        );
        assert_eq!(result.expires_on(), original.expires_on());
        assert_eq!(result.tenant_id(), Some("tenant-1"));
    }

    #[tokio::test]
    async fn errored_hit_propagates_exact_error() {
        let stored = CollaboratorError::new("interaction_required", "MFA needed");
        let silent = SilentAcquisition::new(FixedLookup::new(Ok(CacheQuery::ErroredHit {
            record: record("at"),
            error: stored.clone(),
        })));

        let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
        assert_eq!(
            err,
            SilentAcquisitionError::PropagatedCollaboratorError(stored.clone())
        );
        let source = std::error::Error::source(&err).expect("source should be kept");
        assert_eq!(source.to_string(), stored.to_string());
    }

    #[tokio::test]
    async fn ambiguous_match_fails_every_time() {
        let silent =
            SilentAcquisition::new(FixedLookup::new(Ok(CacheQuery::Ambiguous { count: 2 })));

        for _ in 0..10 {
            let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
            assert_eq!(err, SilentAcquisitionError::AmbiguousMatch { count: 2 });
            assert!(!err.requires_interaction());
        }
    }

    #[tokio::test]
    async fn ambiguous_backing_data_fails_deterministically() {
        let mut cache = TokenCache::new();
        for oid in ["oid-1", "oid-2", "oid-3"] {
            let key = IdentityKey::new(
                AUTHORITY,
                RESOURCE,
                CLIENT_ID,
                SubjectType::User,
                Some(oid.to_string()),
                Some("alice@contoso.com".to_string()),
            )
            .unwrap();
            cache.insert(CachedTokenResult::new(
                key,
                SecretString::from(oid),
                SystemTime::now() + Duration::from_secs(3600),
            ));
        }
        let silent = SilentAcquisition::new(cache);

        for _ in 0..10 {
            let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
            assert_eq!(err, SilentAcquisitionError::AmbiguousMatch { count: 3 });
        }
    }

    #[tokio::test]
    async fn lookup_failure_is_forwarded() {
        let failure = CacheLookupError::Unavailable("store locked".to_string());
        let lookup = FixedLookup::new(Err(failure.clone()));
        let calls = Arc::clone(&lookup.calls);
        let silent = SilentAcquisition::new(lookup);

        let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::CacheUnavailable(failure));
        assert!(err.is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn policy_can_forbid_cache_load() {
        let lookup = FixedLookup::new(Ok(CacheQuery::Hit(record("at"))));
        let calls = Arc::clone(&lookup.calls);
        let silent = SilentAcquisition::with_policy(lookup, NoCacheWhenPrompting);

        let prompting = ctx(alice()).with_prompt_behavior(PromptBehavior::Always);
        let err = silent.acquire_silently(&prompting).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(silent.acquire_silently(&ctx(alice())).await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(silent.policy().name(), "test");
    }

    #[tokio::test]
    async fn confidential_client_looks_up_user_plus_client_tokens() {
        let user_key = IdentityKey::new(
            AUTHORITY,
            RESOURCE,
            CLIENT_ID,
            SubjectType::User,
            Some("oid-1".to_string()),
            None,
        )
        .unwrap();
        let mut cache = TokenCache::new();
        cache.insert(CachedTokenResult::new(
            user_key,
            SecretString::from("user-token"),
            SystemTime::now() + Duration::from_secs(3600),
        ));
        let silent = SilentAcquisition::new(cache);

        let public = ctx(Some(UserIdentifier::unique("oid-1")));
        assert!(silent.acquire_silently(&public).await.is_ok());

        let confidential = SilentRequestContext::new(
            AUTHORITY,
            RESOURCE,
            CLIENT_ID,
            ClientCredential::Confidential,
            Some(UserIdentifier::unique("oid-1")),
        );
        let err = silent.acquire_silently(&confidential).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_instance() {
        let mut cache = TokenCache::new();
        cache.insert(record("shared"));
        let silent = Arc::new(SilentAcquisition::new(cache));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let silent = Arc::clone(&silent);
            handles.push(tokio::spawn(async move {
                silent
                    .acquire_silently(&ctx(alice()))
                    .await
                    .map(|r| r.access_token().expose_secret().to_string())
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
    }

    /// Records the broker annotations it is handed.
    #[derive(Default)]
    struct RecordingBroker {
        seen: std::sync::Mutex<Vec<BrokerParameters>>,
    }

    impl PlatformPolicy for RecordingBroker {
        fn is_cache_load_allowed(&self, _options: &RequestOptions) -> bool {
            true
        }

        fn prompt_protocol_value(&self, _prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
            None
        }

        fn annotate_broker(&self, parameters: &BrokerParameters) {
            self.seen.lock().unwrap().push(parameters.clone());
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[tokio::test]
    async fn broker_receives_silent_flow_annotations() {
        let silent = SilentAcquisition::with_policy(
            FixedLookup::new(Ok(CacheQuery::Hit(record("at")))),
            RecordingBroker::default(),
        );

        silent.acquire_silently(&ctx(alice())).await.unwrap();
        // Rejected descriptors never reach the broker.
        let _ = silent.acquire_silently(&ctx(None)).await;

        let seen = silent.policy().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains(BrokerParameter::SilentBrokerFlow));
        assert_eq!(seen[0].get(BrokerParameter::SilentBrokerFlow), None);
        assert_eq!(
            seen[0].get(BrokerParameter::Username),
            Some("alice@contoso.com")
        );
    }

    fn expired_record(refresh_token: Option<&str>) -> CachedTokenResult {
        let key = record("unused").key().clone();
        let result = CachedTokenResult::new(
            key,
            SecretString::from("stale"),
            SystemTime::now() - Duration::from_secs(3600),
        );
        match refresh_token {
            Some(rt) => result.with_refresh_token(SecretString::from(rt)),
            None => result,
        }
    }

    #[tokio::test]
    async fn expired_hit_without_refresh_token_is_no_cached_record() {
        let silent = SilentAcquisition::new(FixedLookup::new(Ok(CacheQuery::Hit(
            expired_record(None),
        ))));

        let err = silent.acquire_silently(&ctx(alice())).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
    }

    #[tokio::test]
    async fn expired_hit_with_refresh_token_is_returned_for_redemption() {
        let silent = SilentAcquisition::new(FixedLookup::new(Ok(CacheQuery::Hit(
            expired_record(Some("rt")),
        ))));

        let result = silent.acquire_silently(&ctx(alice())).await.unwrap();
        assert!(result.needs_refresh(SystemTime::now(), Duration::ZERO));
    }

    #[tokio::test]
    async fn expiration_margin_rejects_nearly_expired_token() {
        let nearly = CachedTokenResult::new(
            record("unused").key().clone(),
            SecretString::from("at"),
            SystemTime::now() + Duration::from_secs(60),
        );
        let lookup = FixedLookup::new(Ok(CacheQuery::Hit(nearly)));

        let lenient = SilentAcquisition::new(lookup);
        assert!(lenient.acquire_silently(&ctx(alice())).await.is_ok());

        let strict = lenient.with_expiration_margin(Duration::from_secs(300));
        let err = strict.acquire_silently(&ctx(alice())).await.unwrap_err();
        assert_eq!(err, SilentAcquisitionError::NoCachedRecord);
    }

    #[tokio::test]
    async fn other_resource_fallback_never_yields_its_access_token() {
        let mail_key = IdentityKey::new(
            AUTHORITY,
            "https://mail.example.com",
            CLIENT_ID,
            SubjectType::User,
            Some("oid-1".to_string()),
            Some("alice@contoso.com".to_string()),
        )
        .unwrap();
        let mut cache = TokenCache::new();
        cache.set_cross_resource_fallback(true);
        cache.insert(
            CachedTokenResult::new(
                mail_key,
                SecretString::from("mail-access-token"),
                SystemTime::now() + Duration::from_secs(3600),
            )
            .with_refresh_token(SecretString::from("mrrt"))
            .with_multiple_resource_refresh_token(true),
        );
        let silent = SilentAcquisition::new(cache);

        let result = silent.acquire_silently(&ctx(alice())).await.unwrap();
        assert_ne!(result.access_token().expose_secret(), "mail-access-token");
        assert!(result.needs_refresh(SystemTime::now(), Duration::ZERO));
        assert_eq!(
            result.refresh_token().map(|t| t.expose_secret()),
            Some("mrrt")
        );
    }

    #[test]
    fn prepare_builds_key_and_broker_parameters() {
        let prepared = prepare(&ctx(alice())).unwrap();
        assert_eq!(prepared.key.displayable_id(), Some("alice@contoso.com"));
        assert_eq!(prepared.key.unique_id(), None);
        assert_eq!(prepared.key.subject_type(), SubjectType::User);
        assert_eq!(
            prepared.broker_parameters.get(BrokerParameter::Username),
            Some("alice@contoso.com")
        );
        assert_eq!(
            prepared.broker_parameters.get(BrokerParameter::UsernameType),
            Some("RequiredDisplayableId")
        );
        assert!(prepared
            .broker_parameters
            .contains(BrokerParameter::SilentBrokerFlow));
    }

    #[test]
    fn error_codes_and_classification() {
        let cases = [
            (
                SilentAcquisitionError::InvalidIdentityDescriptor,
                "invalid_identity_descriptor",
                false,
                false,
            ),
            (
                SilentAcquisitionError::NoCachedRecord,
                "failed_to_acquire_token_silently",
                true,
                false,
            ),
            (
                SilentAcquisitionError::AmbiguousMatch { count: 2 },
                "multiple_matching_tokens_detected",
                false,
                false,
            ),
            (
                SilentAcquisitionError::PropagatedCollaboratorError(CollaboratorError::new(
                    "invalid_grant",
                    "expired",
                )),
                "cached_token_error",
                true,
                false,
            ),
            (
                SilentAcquisitionError::CacheUnavailable(CacheLookupError::Corrupt(
                    "bad".to_string(),
                )),
                "cache_unavailable",
                false,
                true,
            ),
        ];

        for (err, code, interactive, retryable) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.requires_interaction(), interactive, "{code}");
            assert_eq!(err.is_retryable(), retryable, "{code}");
        }
    }

    #[test]
    fn error_display() {
        assert_eq!(
            SilentAcquisitionError::AmbiguousMatch { count: 3 }.to_string(),
            "failed to acquire token silently: 3 cached tokens match the request"
        );
        assert_eq!(
            SilentAcquisitionError::PropagatedCollaboratorError(CollaboratorError::new(
                "invalid_grant",
                "expired"
            ))
            .to_string(),
            "failed to acquire token silently: invalid_grant: expired"
        );
    }
}
