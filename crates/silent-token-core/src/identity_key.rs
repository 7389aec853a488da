//! Cache key identity model.
//!
//! An [`IdentityKey`] addresses one cached credential slot. Two keys refer to
//! the same slot when:
//!
//! - `authority` matches exactly (endpoints are never interchangeable)
//! - `resource`, `client_id` and `displayable_id` match case-insensitively
//! - `unique_id` matches exactly (subject identifiers are never normalized)
//! - `subject_type` matches exactly
//!
//! Case-insensitive comparison maps each character to its simple uppercase
//! form, independent of any locale. Characters whose uppercase form is more
//! than one character (`ß`) compare as themselves, so folding never changes
//! the character count.
//!
//! The [`Hash`] implementation feeds every normalized field into the hasher
//! independently, length-prefixed, so it agrees with [`PartialEq`] and no
//! field content can bleed into its neighbour.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::types::SubjectType;

/// Errors raised when constructing an [`IdentityKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityKeyError {
    /// A mandatory component was empty.
    #[error("identity key requires a non-empty {field}")]
    MissingField {
        /// Name of the empty component.
        field: &'static str,
    },
}

/// Immutable lookup key for a cached credential.
///
/// # Example
///
/// ```
/// use silent_token_core::identity_key::IdentityKey;
/// use silent_token_core::types::SubjectType;
///
/// let a = IdentityKey::new(
///     "https://login.example.com/contoso",
///     "https://graph.example.com",
///     "CLIENT-1",
///     SubjectType::User,
///     Some("oid-1".to_string()),
///     Some("Alice@Contoso.com".to_string()),
/// )
/// .unwrap();
/// let b = IdentityKey::new(
///     "https://login.example.com/contoso",
///     "HTTPS://GRAPH.EXAMPLE.COM",
///     "client-1",
///     SubjectType::User,
///     Some("oid-1".to_string()),
///     Some("alice@contoso.com".to_string()),
/// )
/// .unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.stable_hash(), b.stable_hash());
/// ```
#[derive(Debug, Clone)]
pub struct IdentityKey {
    authority: String,
    resource: String,
    client_id: String,
    unique_id: Option<String>,
    displayable_id: Option<String>,
    subject_type: SubjectType,
}

impl IdentityKey {
    /// Create a key.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityKeyError::MissingField`] if `authority`, `resource`
    /// or `client_id` is empty.
    pub fn new(
        authority: impl Into<String>,
        resource: impl Into<String>,
        client_id: impl Into<String>,
        subject_type: SubjectType,
        unique_id: Option<String>,
        displayable_id: Option<String>,
    ) -> Result<Self, IdentityKeyError> {
        Ok(Self {
            authority: non_empty("authority", authority.into())?,
            resource: non_empty("resource", resource.into())?,
            client_id: non_empty("client_id", client_id.into())?,
            unique_id,
            displayable_id,
            subject_type,
        })
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

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn displayable_id(&self) -> Option<&str> {
        self.displayable_id.as_deref()
    }

    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    /// Case-insensitive comparison against this key's resource.
    pub fn matches_resource(&self, candidate: &str) -> bool {
        eq_ignore_case(&self.resource, candidate)
    }

    /// Case-insensitive comparison against this key's client id.
    pub fn matches_client_id(&self, candidate: &str) -> bool {
        eq_ignore_case(&self.client_id, candidate)
    }

    /// Case-insensitive comparison against this key's displayable id.
    ///
    /// Two absent values match; an absent value never matches a present one.
    pub fn matches_displayable_id(&self, candidate: Option<&str>) -> bool {
        match (self.displayable_id.as_deref(), candidate) {
            (Some(own), Some(other)) => eq_ignore_case(own, other),
            (None, None) => true,
            _ => false,
        }
    }

    /// Whether `other` belongs to the same user as this key.
    ///
    /// When this key carries a unique id, the unique ids must match exactly
    /// and displayable ids are ignored. Otherwise displayable ids decide, and
    /// two absent displayable ids only match if `other` has no unique id
    /// either.
    pub fn matches_user(&self, other: &IdentityKey) -> bool {
        match self.unique_id.as_deref() {
            Some(unique_id) => other.unique_id.as_deref() == Some(unique_id),
            None => match (self.displayable_id.as_deref(), other.displayable_id.as_deref()) {
                (Some(own), Some(theirs)) => eq_ignore_case(own, theirs),
                (None, None) => other.unique_id.is_none(),
                _ => false,
            },
        }
    }

    /// Same authority, client id, subject type and user; resource ignored.
    ///
    /// Used by caches for partial-key scans that look for any token of this
    /// user and client regardless of the resource it was issued for.
    pub fn matches_ignoring_resource(&self, other: &IdentityKey) -> bool {
        self.authority == other.authority
            && self.matches_client_id(&other.client_id)
            && self.subject_type == other.subject_type
            && self.matches_user(other)
    }

    /// A hash of this key that is stable for the lifetime of the process.
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for IdentityKey {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        self.authority == other.authority
            && self.matches_resource(&other.resource)
            && self.matches_client_id(&other.client_id)
            && self.unique_id == other.unique_id
            && self.matches_displayable_id(other.displayable_id.as_deref())
            && self.subject_type == other.subject_type
    }
}

impl Eq for IdentityKey {}

impl Hash for IdentityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.authority.hash(state);
        hash_folded(&self.resource, state);
        hash_folded(&self.client_id, state);
        self.unique_id.hash(state);
        match &self.displayable_id {
            Some(displayable_id) => {
                state.write_u8(1);
                hash_folded(displayable_id, state);
            }
            None => state.write_u8(0),
        }
        self.subject_type.hash(state);
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IdentityKey: {} {} {} {} {}",
            self.authority,
            self.resource,
            self.client_id,
            self.unique_id.as_deref().unwrap_or(""),
            self.displayable_id.as_deref().unwrap_or("")
        )
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, IdentityKeyError> {
    if value.is_empty() {
        Err(IdentityKeyError::MissingField { field })
    } else {
        Ok(value)
    }
}

fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().map(fold_char)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    fold_case(a).eq(fold_case(b))
}

fn hash_folded<H: Hasher>(s: &str, state: &mut H) {
    state.write_usize(s.chars().count());
    for c in fold_case(s) {
        state.write_u32(c as u32);
    }
}
