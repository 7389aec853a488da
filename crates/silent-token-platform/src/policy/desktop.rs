//! Desktop request-shaping policy.

use silent_token_core::{PlatformPolicy, PromptBehavior, ProtocolPromptValue, RequestOptions};

use super::forbids_cache_load;

/// Policy for desktop clients.
///
/// Same cache rules as Android. `Never` is sent as `prompt=attempt_none` so
/// the authorization endpoint fails instead of showing UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPolicy;

impl PlatformPolicy for DesktopPolicy {
    fn is_cache_load_allowed(&self, options: &RequestOptions) -> bool {
        !options.prompt_behavior.is_some_and(forbids_cache_load)
    }

    fn prompt_protocol_value(&self, prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
        match prompt {
            PromptBehavior::Always => Some(ProtocolPromptValue::Login),
            PromptBehavior::SelectAccount => Some(ProtocolPromptValue::SelectAccount),
            PromptBehavior::RefreshSession => Some(ProtocolPromptValue::RefreshSession),
            PromptBehavior::Never => Some(ProtocolPromptValue::AttemptNone),
            PromptBehavior::Auto => None,
        }
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}
