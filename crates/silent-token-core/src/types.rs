//! Core types for silent token acquisition.
//!
//! This module contains the small enumerations shared by the key model,
//! the request context and the platform policies: subject types, user
//! identifier kinds, client credential presence and prompt behaviors.

use serde::{Deserialize, Serialize};

/// Whose identity a cached token represents.
///
/// The subject type is part of the cache identity: a token issued to a user
/// directly and one issued to the same user through a confidential client
/// occupy different slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// Token issued to an end user.
    User,
    /// Token issued to the client itself (app-only, no end user).
    Client,
    /// Token issued to a user acting through a confidential client (middle tier).
    UserPlusClient,
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubjectType::User => write!(f, "user"),
            SubjectType::Client => write!(f, "client"),
            SubjectType::UserPlusClient => write!(f, "user_plus_client"),
        }
    }
}

/// Whether the calling client presents its own credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCredential {
    /// Public client: no secret, no certificate.
    Public,
    /// Confidential client holding a secret or certificate.
    Confidential,
}

impl ClientCredential {
    /// Subject type of tokens acquired on behalf of a user by this client.
    ///
    /// # Examples
    ///
    /// ```
    /// use silent_token_core::types::{ClientCredential, SubjectType};
    ///
    /// assert_eq!(ClientCredential::Public.user_subject_type(), SubjectType::User);
    /// assert_eq!(
    ///     ClientCredential::Confidential.user_subject_type(),
    ///     SubjectType::UserPlusClient
    /// );
    /// ```
    pub fn user_subject_type(&self) -> SubjectType {
        match self {
            ClientCredential::Public => SubjectType::User,
            ClientCredential::Confidential => SubjectType::UserPlusClient,
        }
    }
}

/// How the caller identifies the user whose token is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIdentifierType {
    /// Immutable subject identifier (object id / subject GUID).
    UniqueId,
    /// Username; a token for a different user may still satisfy the request.
    OptionalDisplayableId,
    /// Username that must match the signed-in user.
    RequiredDisplayableId,
}

impl std::fmt::Display for UserIdentifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserIdentifierType::UniqueId => write!(f, "UniqueId"),
            UserIdentifierType::OptionalDisplayableId => write!(f, "OptionalDisplayableId"),
            UserIdentifierType::RequiredDisplayableId => write!(f, "RequiredDisplayableId"),
        }
    }
}

/// Prompt behavior requested by an interactive caller.
///
/// Silent requests normally carry none; a request that reuses the
/// interactive request-shaping path carries one and is then subject to the
/// platform's cache-load policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptBehavior {
    /// Prompt only when needed.
    Auto,
    /// Always prompt for credentials.
    Always,
    /// Never prompt.
    Never,
    /// Re-authenticate the current session.
    RefreshSession,
    /// Let the user pick an account.
    SelectAccount,
}

impl std::str::FromStr for PromptBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(PromptBehavior::Auto),
            "always" => Ok(PromptBehavior::Always),
            "never" => Ok(PromptBehavior::Never),
            "refresh_session" => Ok(PromptBehavior::RefreshSession),
            "select_account" => Ok(PromptBehavior::SelectAccount),
            other => Err(format!(
                "unknown prompt behavior '{other}' \
                 (expected auto, always, never, refresh_session, select_account)"
            )),
        }
    }
}

/// The `prompt` query parameter value sent to the authorization endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolPromptValue {
    Login,
    SelectAccount,
    RefreshSession,
    AttemptNone,
}

impl ProtocolPromptValue {
    /// Wire value of the parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolPromptValue::Login => "login",
            ProtocolPromptValue::SelectAccount => "select_account",
            ProtocolPromptValue::RefreshSession => "refresh_session",
            ProtocolPromptValue::AttemptNone => "attempt_none",
        }
    }
}

impl std::fmt::Display for ProtocolPromptValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
