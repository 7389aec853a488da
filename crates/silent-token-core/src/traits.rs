//! Trait definitions for the collaborators of the silent flow.
//!
//! These traits define the interfaces for:
//! - Cache lookup (the token store, owned outside this crate)
//! - Platform request-shaping policy (one implementation per platform)
//!
//! By using traits, the decision flow can be tested with mock
//! implementations and platform policies can be chosen at composition time.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::cache::CachedTokenResult;
use crate::identity_key::IdentityKey;
use crate::request::BrokerParameters;
use crate::types::{PromptBehavior, ProtocolPromptValue};

/// An error previously recorded against a cached token record.
///
/// Caches keep the failure of the call that produced (or last touched) a
/// record so that a later silent request can report the original cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CollaboratorError {
    /// Machine-readable error code (e.g. `invalid_grant`).
    pub code: String,
    /// Human-readable description.
    pub message: String,
}

impl CollaboratorError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Error type for a failing cache lookup call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheLookupError {
    /// The backing store could not be read.
    #[error("token store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded.
    #[error("corrupt cache record: {0}")]
    Corrupt(String),
}

/// Outcome of a cache query.
#[derive(Debug, Clone)]
pub enum CacheQuery {
    /// Nothing matched.
    Miss,

    /// Exactly one usable record matched.
    Hit(CachedTokenResult),

    /// Exactly one record matched, but it carries a stored error.
    ErroredHit {
        record: CachedTokenResult,
        error: CollaboratorError,
    },

    /// More than one record matched a key that should be unique.
    Ambiguous {
        /// Number of candidates found.
        count: usize,
    },
}

/// Options of the request as seen by the platform policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Prompt behavior of a request sharing the interactive request-shaping
    /// path; `None` for a purely silent entry point.
    pub prompt_behavior: Option<PromptBehavior>,
}

/// Trait for token cache lookups.
///
/// Implementations own the store and any synchronization it needs. When an
/// exact key misses they may fall back to partial-key scans built on the
/// [`IdentityKey`] matchers. Returning [`CacheQuery::Ambiguous`] instead of
/// picking one candidate is part of the contract.
///
/// # Example (Mock Implementation)
///
/// ```ignore
/// struct EmptyCache;
///
/// impl CacheLookup for EmptyCache {
///     async fn query(&self, key: &IdentityKey) -> Result<CacheQuery, CacheLookupError> {
///         Ok(CacheQuery::Miss)
///     }
/// }
/// ```
pub trait CacheLookup: Send + Sync {
    /// Look up the record addressed by `key`.
    ///
    /// # Errors
    ///
    /// Returns `CacheLookupError` if the store itself fails; a missing record
    /// is `Ok(CacheQuery::Miss)`.
    fn query<'a>(
        &'a self,
        key: &'a IdentityKey,
    ) -> Pin<Box<dyn Future<Output = Result<CacheQuery, CacheLookupError>> + Send + 'a>>;
}

/// Trait for per-platform request-shaping policy.
///
/// One implementation exists per target platform and is selected when the
/// client is composed.
pub trait PlatformPolicy: Send + Sync {
    /// Whether the cache may be consulted for a request with these options.
    ///
    /// Some interactive prompt modes forbid reading the cache at all.
    fn is_cache_load_allowed(&self, options: &RequestOptions) -> bool;

    /// The `prompt` parameter to send for `prompt`, if any.
    fn prompt_protocol_value(&self, prompt: PromptBehavior) -> Option<ProtocolPromptValue>;

    /// Receive the broker annotations of a silent request.
    ///
    /// Called once per request after the key is built and before the cache
    /// is consulted. Platforms without a broker ignore them.
    fn annotate_broker(&self, _parameters: &BrokerParameters) {}

    /// Short platform name for diagnostics.
    fn name(&self) -> &'static str;
}

impl<T: CacheLookup + ?Sized> CacheLookup for Arc<T> {
    fn query<'a>(
        &'a self,
        key: &'a IdentityKey,
    ) -> Pin<Box<dyn Future<Output = Result<CacheQuery, CacheLookupError>> + Send + 'a>> {
        (**self).query(key)
    }
}

impl<T: PlatformPolicy + ?Sized> PlatformPolicy for Box<T> {
    fn is_cache_load_allowed(&self, options: &RequestOptions) -> bool {
        (**self).is_cache_load_allowed(options)
    }

    fn prompt_protocol_value(&self, prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
        (**self).prompt_protocol_value(prompt)
    }

    fn annotate_broker(&self, parameters: &BrokerParameters) {
        (**self).annotate_broker(parameters)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Policy of a purely silent entry point.
///
/// The cache may always be consulted and no prompt parameter is ever sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentOnlyPolicy;

impl PlatformPolicy for SilentOnlyPolicy {
    fn is_cache_load_allowed(&self, _options: &RequestOptions) -> bool {
        true
    }

    fn prompt_protocol_value(&self, _prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
        None
    }

    fn name(&self) -> &'static str {
        "silent_only"
    }
}
