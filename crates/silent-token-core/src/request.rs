//! Per-call request context for silent acquisition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity_key::{IdentityKey, IdentityKeyError};
use crate::traits::RequestOptions;
use crate::types::{ClientCredential, PromptBehavior, SubjectType, UserIdentifierType};

/// Caller-supplied description of the user whose token is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentifier {
    pub id: String,
    pub kind: UserIdentifierType,
}

impl UserIdentifier {
    pub fn new(id: impl Into<String>, kind: UserIdentifierType) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Identify the user by immutable subject identifier.
    pub fn unique(id: impl Into<String>) -> Self {
        Self::new(id, UserIdentifierType::UniqueId)
    }

    /// Identify the user by username.
    pub fn displayable(id: impl Into<String>) -> Self {
        Self::new(id, UserIdentifierType::RequiredDisplayableId)
    }

    /// The unique id this identifier supplies, if any.
    pub fn unique_id(&self) -> Option<&str> {
        match self.kind {
            UserIdentifierType::UniqueId if !self.id.is_empty() => Some(&self.id),
            _ => None,
        }
    }

    /// The displayable id this identifier supplies, if any.
    pub fn displayable_id(&self) -> Option<&str> {
        match self.kind {
            UserIdentifierType::OptionalDisplayableId
            | UserIdentifierType::RequiredDisplayableId
                if !self.id.is_empty() =>
            {
                Some(&self.id)
            }
            _ => None,
        }
    }

    /// Whether the identifier supplies any way to disambiguate the subject.
    pub fn is_resolvable(&self) -> bool {
        self.unique_id().is_some() || self.displayable_id().is_some()
    }
}

/// Ephemeral description of one silent token request.
///
/// The subject type is computed once, from credential presence, when the
/// context is created.
///
/// # Example
///
/// ```
/// use silent_token_core::request::{SilentRequestContext, UserIdentifier};
/// use silent_token_core::types::{ClientCredential, SubjectType};
///
/// let ctx = SilentRequestContext::new(
///     "https://login.example.com/contoso",
///     "https://graph.example.com",
///     "client-1",
///     ClientCredential::Confidential,
///     Some(UserIdentifier::displayable("alice@contoso.com")),
/// );
/// assert_eq!(ctx.subject_type(), SubjectType::UserPlusClient);
/// ```
#[derive(Debug, Clone)]
pub struct SilentRequestContext {
    authority: String,
    resource: String,
    client_id: String,
    subject_type: SubjectType,
    user: Option<UserIdentifier>,
    prompt_behavior: Option<PromptBehavior>,
}

impl SilentRequestContext {
    pub fn new(
        authority: impl Into<String>,
        resource: impl Into<String>,
        client_id: impl Into<String>,
        credential: ClientCredential,
        user: Option<UserIdentifier>,
    ) -> Self {
        Self {
            authority: authority.into(),
            resource: resource.into(),
            client_id: client_id.into(),
            subject_type: credential.user_subject_type(),
            user,
            prompt_behavior: None,
        }
    }

    /// Mark the request as reusing the interactive request-shaping path.
    ///
    /// The platform's cache-load policy then applies to `prompt`.
    pub fn with_prompt_behavior(mut self, prompt: PromptBehavior) -> Self {
        self.prompt_behavior = Some(prompt);
        self
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    pub fn user(&self) -> Option<&UserIdentifier> {
        self.user.as_ref()
    }

    pub fn options(&self) -> RequestOptions {
        RequestOptions {
            prompt_behavior: self.prompt_behavior,
        }
    }

    /// Build the cache key for this request.
    pub(crate) fn identity_key(&self, user: &UserIdentifier) -> Result<IdentityKey, IdentityKeyError> {
        IdentityKey::new(
            self.authority.as_str(),
            self.resource.as_str(),
            self.client_id.as_str(),
            self.subject_type,
            user.unique_id().map(str::to_string),
            user.displayable_id().map(str::to_string),
        )
    }
}

/// Auxiliary parameters handed to the platform broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BrokerParameter {
    Username,
    UsernameType,
    SilentBrokerFlow,
}

impl BrokerParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerParameter::Username => "username",
            BrokerParameter::UsernameType => "username_type",
            BrokerParameter::SilentBrokerFlow => "silent_broker_flow",
        }
    }
}

/// Broker request annotations. A parameter may be present without a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerParameters(BTreeMap<BrokerParameter, Option<String>>);

impl BrokerParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations for a silent request on behalf of `user`.
    pub fn for_silent_request(user: &UserIdentifier) -> Self {
        let mut params = Self::new();
        params.set(BrokerParameter::Username, Some(user.id.clone()));
        params.set(BrokerParameter::UsernameType, Some(user.kind.to_string()));
        params.set(BrokerParameter::SilentBrokerFlow, None);
        params
    }

    pub fn set(&mut self, parameter: BrokerParameter, value: Option<String>) {
        self.0.insert(parameter, value);
    }

    pub fn contains(&self, parameter: BrokerParameter) -> bool {
        self.0.contains_key(&parameter)
    }

    /// The value of `parameter`, `None` if absent or set without a value.
    pub fn get(&self, parameter: BrokerParameter) -> Option<&str> {
        self.0.get(&parameter).and_then(|value| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (BrokerParameter, Option<&str>)> {
        self.0.iter().map(|(k, v)| (*k, v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
