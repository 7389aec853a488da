//! Platform policies and test collaborators for silent-token-core.
//!
//! This crate provides:
//!
//! - [`policy`]: One [`PlatformPolicy`] per target platform, selected from
//!   configuration when the client is composed
//! - [`mock`]: A configurable [`CacheLookup`] for tests
//!
//! # Example
//!
//! ```
//! use silent_token_core::{Platform, PromptBehavior, RequestOptions};
//! use silent_token_platform::policy::policy_for;
//!
//! let policy = policy_for(Platform::Android);
//! let options = RequestOptions {
//!     prompt_behavior: Some(PromptBehavior::Always),
//! };
//! assert!(!policy.is_cache_load_allowed(&options));
//! ```
//!
//! [`PlatformPolicy`]: silent_token_core::PlatformPolicy
//! [`CacheLookup`]: silent_token_core::CacheLookup

pub mod mock;
pub mod policy;

pub use mock::MockCacheLookup;
pub use policy::{policy_for, AndroidPolicy, DesktopPolicy};
