//! Platform policy implementations.
//!
//! - [`SilentOnlyPolicy`]: Purely silent entry point (re-exported from core)
//! - [`AndroidPolicy`]: Android request shaping
//! - [`DesktopPolicy`]: Desktop request shaping
//!
//! All implement the [`PlatformPolicy`] trait from `silent-token-core`.

mod android;
mod desktop;

pub use android::AndroidPolicy;
pub use desktop::DesktopPolicy;
pub use silent_token_core::SilentOnlyPolicy;

use silent_token_core::{Platform, PlatformPolicy, PromptBehavior};

/// Create the policy for `platform`.
pub fn policy_for(platform: Platform) -> Box<dyn PlatformPolicy> {
    tracing::info!(platform = %platform, "Using platform policy");
    match platform {
        Platform::SilentOnly => Box::new(SilentOnlyPolicy),
        Platform::Android => Box::new(AndroidPolicy),
        Platform::Desktop => Box::new(DesktopPolicy),
    }
}

/// Prompt modes that must not be served from the cache on interactive
/// platforms.
fn forbids_cache_load(prompt: PromptBehavior) -> bool {
    matches!(
        prompt,
        PromptBehavior::Always | PromptBehavior::RefreshSession | PromptBehavior::SelectAccount
    )
}
