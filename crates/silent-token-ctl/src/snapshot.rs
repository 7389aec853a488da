//! JSON cache snapshots.
//!
//! A snapshot is a plain export of token records used to reproduce silent
//! acquisition outcomes offline:
//!
//! ```json
//! {
//!   "entries": [
//!     {
//!       "authority": "https://login.example.com/contoso",
//!       "resource": "https://graph.example.com",
//!       "client_id": "client-1",
//!       "subject_type": "user",
//!       "displayable_id": "alice@contoso.com",
//!       "access_token": "...",
//!       "refresh_token": "...",
//!       "expires_on": 1767225600,
//!       "error": { "code": "invalid_grant", "message": "..." }
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use silent_token_core::{
    CacheConfig, CachedTokenResult, CollaboratorError, IdentityKey, SubjectType, TokenCache,
};

#[derive(Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub entries: Vec<SnapshotEntry>,
}

/// One exported record. Token strings are moved into `SecretString` as soon
/// as the record is converted.
#[derive(Deserialize)]
pub struct SnapshotEntry {
    pub authority: String,
    pub resource: String,
    pub client_id: String,
    #[serde(default = "default_subject_type")]
    pub subject_type: SubjectType,
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub displayable_id: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    pub expires_on: u64,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub multiple_resource_refresh_token: bool,
    #[serde(default)]
    pub error: Option<SnapshotError>,
}

#[derive(Deserialize)]
pub struct SnapshotError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn default_subject_type() -> SubjectType {
    SubjectType::User
}

impl SnapshotEntry {
    fn into_record(self) -> Result<(CachedTokenResult, Option<CollaboratorError>)> {
        let key = IdentityKey::new(
            self.authority,
            self.resource,
            self.client_id,
            self.subject_type,
            self.unique_id.filter(|id| !id.is_empty()),
            self.displayable_id.filter(|id| !id.is_empty()),
        )?;

        let expires_on = UNIX_EPOCH
            .checked_add(Duration::from_secs(self.expires_on))
            .with_context(|| format!("expires_on {} is out of range", self.expires_on))?;
        let mut record = CachedTokenResult::new(key, SecretString::from(self.access_token), expires_on)
            .with_multiple_resource_refresh_token(self.multiple_resource_refresh_token);
        if let Some(refresh_token) = self.refresh_token {
            record = record.with_refresh_token(SecretString::from(refresh_token));
        }
        if let Some(tenant_id) = self.tenant_id {
            record = record.with_tenant_id(tenant_id);
        }

        let error = self
            .error
            .map(|e| CollaboratorError::new(e.code, e.message));
        Ok((record, error))
    }
}

impl Snapshot {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse cache snapshot")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache snapshot {:?}", path))?;
        Self::parse(&contents)
    }

    /// Build a [`TokenCache`] holding every entry.
    pub fn into_cache(self, config: &CacheConfig) -> Result<TokenCache> {
        let mut cache = TokenCache::with_config(config);
        for (index, entry) in self.entries.into_iter().enumerate() {
            let (record, error) = entry
                .into_record()
                .with_context(|| format!("Invalid snapshot entry #{}", index))?;
            match error {
                Some(error) => cache.insert_errored(record, error),
                None => cache.insert(record),
            }
        }
        Ok(cache)
    }
}

/// Seconds since the Unix epoch for `time`, or zero before the epoch.
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
