//! Core types and decision flow for silent token acquisition.
//!
//! This crate decides whether a previously cached access token can be
//! returned without prompting the user, and fails with a typed reason when
//! it cannot. It never renders UI, talks to the network, or persists tokens;
//! those concerns belong to collaborators behind the traits in [`traits`].
//!
//! # Modules
//!
//! - [`types`]: Shared enums (`SubjectType`, `UserIdentifierType`, `PromptBehavior`)
//! - [`identity_key`]: The cache key identity model (`IdentityKey`)
//! - [`request`]: Per-call request context and broker annotations
//! - [`traits`]: Collaborator traits (`CacheLookup`, `PlatformPolicy`)
//! - [`cache`]: Cached token results and an in-memory reference cache
//! - [`silent`]: The silent acquisition decision (`SilentAcquisition`)
//! - [`config`]: TOML configuration
//!
//! # Example
//!
//! ```
//! use silent_token_core::request::{SilentRequestContext, UserIdentifier};
//! use silent_token_core::silent::{prepare, SilentAcquisitionError};
//! use silent_token_core::types::{ClientCredential, SubjectType};
//!
//! let ctx = SilentRequestContext::new(
//!     "https://login.example.com/contoso",
//!     "https://graph.example.com",
//!     "client-1",
//!     ClientCredential::Public,
//!     Some(UserIdentifier::unique("oid-1")),
//! );
//! let prepared = prepare(&ctx).unwrap();
//! assert_eq!(prepared.key.subject_type(), SubjectType::User);
//!
//! // Without any user descriptor the request is rejected up front.
//! let anonymous = SilentRequestContext::new(
//!     "https://login.example.com/contoso",
//!     "https://graph.example.com",
//!     "client-1",
//!     ClientCredential::Public,
//!     None,
//! );
//! assert_eq!(
//!     prepare(&anonymous).unwrap_err(),
//!     SilentAcquisitionError::InvalidIdentityDescriptor
//! );
//! ```

pub mod cache;
pub mod config;
pub mod identity_key;
pub mod request;
pub mod silent;
pub mod traits;
pub mod types;

// Re-export commonly used types at the crate root for convenience
pub use cache::{CachedTokenResult, TokenCache};
pub use config::{CacheConfig, Config, ConfigError, Platform, PolicyConfig};
pub use identity_key::{IdentityKey, IdentityKeyError};
pub use request::{BrokerParameter, BrokerParameters, SilentRequestContext, UserIdentifier};
pub use silent::{prepare, PreparedRequest, SilentAcquisition, SilentAcquisitionError};
pub use traits::{
    CacheLookup, CacheLookupError, CacheQuery, CollaboratorError, PlatformPolicy, RequestOptions,
    SilentOnlyPolicy,
};
pub use types::{
    ClientCredential, PromptBehavior, ProtocolPromptValue, SubjectType, UserIdentifierType,
};
