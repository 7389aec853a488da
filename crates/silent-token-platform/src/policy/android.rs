//! Android request-shaping policy.

use silent_token_core::{
    BrokerParameter, BrokerParameters, PlatformPolicy, PromptBehavior, ProtocolPromptValue,
    RequestOptions,
};
use tracing::debug;

use super::forbids_cache_load;

/// Policy for Android clients.
///
/// `Never` has no protocol value on Android: the broker decides whether it
/// can avoid UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidPolicy;

impl PlatformPolicy for AndroidPolicy {
    fn is_cache_load_allowed(&self, options: &RequestOptions) -> bool {
        !options.prompt_behavior.is_some_and(forbids_cache_load)
    }

    fn prompt_protocol_value(&self, prompt: PromptBehavior) -> Option<ProtocolPromptValue> {
        match prompt {
            PromptBehavior::Always => Some(ProtocolPromptValue::Login),
            PromptBehavior::SelectAccount => Some(ProtocolPromptValue::SelectAccount),
            PromptBehavior::RefreshSession => Some(ProtocolPromptValue::RefreshSession),
            PromptBehavior::Auto | PromptBehavior::Never => None,
        }
    }

    fn annotate_broker(&self, parameters: &BrokerParameters) {
        debug!(
            parameters = parameters.len(),
            silent_flow = parameters.contains(BrokerParameter::SilentBrokerFlow),
            "Broker annotations attached"
        );
    }

    fn name(&self) -> &'static str {
        "android"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(prompt: Option<PromptBehavior>) -> RequestOptions {
        RequestOptions {
            prompt_behavior: prompt,
        }
    }

    #[test]
    fn cache_load_allowed_for_silent_and_auto() {
        let policy = AndroidPolicy;
        assert!(policy.is_cache_load_allowed(&options(None)));
        assert!(policy.is_cache_load_allowed(&options(Some(PromptBehavior::Auto))));
        assert!(policy.is_cache_load_allowed(&options(Some(PromptBehavior::Never))));
    }

    #[test]
    fn cache_load_forbidden_for_forced_prompts() {
        let policy = AndroidPolicy;
        for prompt in [
            PromptBehavior::Always,
            PromptBehavior::RefreshSession,
            PromptBehavior::SelectAccount,
        ] {
            assert!(
                !policy.is_cache_load_allowed(&options(Some(prompt))),
                "{prompt:?} should skip the cache"
            );
        }
    }

    #[test]
    fn prompt_mapping() {
        let policy = AndroidPolicy;
        assert_eq!(
            policy.prompt_protocol_value(PromptBehavior::Always),
            Some(ProtocolPromptValue::Login)
        );
        assert_eq!(
            policy.prompt_protocol_value(PromptBehavior::SelectAccount),
            Some(ProtocolPromptValue::SelectAccount)
        );
        assert_eq!(
            policy.prompt_protocol_value(PromptBehavior::RefreshSession),
            Some(ProtocolPromptValue::RefreshSession)
        );
        assert_eq!(policy.prompt_protocol_value(PromptBehavior::Auto), None);
        assert_eq!(policy.prompt_protocol_value(PromptBehavior::Never), None);
    }
}
