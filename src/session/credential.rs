//! Credential record and the stores that persist it
//!
//! The record is two independent fields so that a half-written or
//! half-cleared record can be observed and rejected by the gate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::ClientError;

/// Raw persisted record; either field may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// A complete credential: both fields present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub display_name: String,
}

impl CredentialRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The valid credential this record holds, if any.
    pub fn credential(&self) -> Option<Credential> {
        match (non_empty(&self.token), non_empty(&self.display_name)) {
            (Some(token), Some(display_name)) => Some(Credential {
                token: token.to_string(),
                display_name: display_name.to_string(),
            }),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.display_name.is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl From<&Credential> for CredentialRecord {
    fn from(credential: &Credential) -> Self {
        Self {
            token: Some(credential.token.clone()),
            display_name: Some(credential.display_name.clone()),
            saved_at: Some(Utc::now()),
        }
    }
}

impl Credential {
    pub fn new(token: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            display_name: display_name.into(),
        }
    }
}

/// Persisted key/value storage for the session token and display name.
///
/// Implementations are read on every gate evaluation; nothing is cached
/// across calls because another process may rewrite the record.
pub trait CredentialStore: Send + Sync {
    /// Read the raw record, partial or not
    fn load(&self) -> Result<CredentialRecord, ClientError>;

    fn set(&self, credential: &Credential) -> Result<(), ClientError>;

    /// Remove both fields
    fn clear(&self) -> Result<(), ClientError>;

    fn get(&self) -> Result<Option<Credential>, ClientError> {
        Ok(self.load()?.credential())
    }
}

/// In-process store, used by tests and by embedders that manage persistence themselves
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<CredentialRecord>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary (possibly partial) record
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CredentialRecord>, ClientError> {
        self.record
            .lock()
            .map_err(|_| ClientError::Storage("credential store lock poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<CredentialRecord, ClientError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, credential: &Credential) -> Result<(), ClientError> {
        *self.lock()? = CredentialRecord::from(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.lock()? = CredentialRecord::empty();
        Ok(())
    }
}

/// JSON file in the console's config directory
///
/// ```json
/// { "token": "…", "display_name": "admin", "saved_at": "2024-05-01T10:00:00Z" }
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    file_path: PathBuf,
}

impl FileCredentialStore {
    pub const FILE_NAME: &'static str = "credentials.json";

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            file_path: dir.as_ref().join(Self::FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn write_record(&self, record: &CredentialRecord) -> Result<(), ClientError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.file_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<CredentialRecord, ClientError> {
        if !self.file_path.exists() {
            return Ok(CredentialRecord::empty());
        }

        let content = fs::read_to_string(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(CredentialRecord::empty());
        }
        let record: CredentialRecord = serde_json::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.file_path.display(), e)))?;
        Ok(record)
    }

    fn set(&self, credential: &Credential) -> Result<(), ClientError> {
        self.write_record(&CredentialRecord::from(credential))
    }

    fn clear(&self) -> Result<(), ClientError> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token: Option<&str>, name: Option<&str>) -> CredentialRecord {
        CredentialRecord {
            token: token.map(String::from),
            display_name: name.map(String::from),
            saved_at: None,
        }
    }

    #[test]
    fn record_requires_both_fields() {
        assert!(record(Some("t"), Some("admin")).credential().is_some());
        assert!(record(Some("t"), None).credential().is_none());
        assert!(record(None, Some("admin")).credential().is_none());
        assert!(record(Some(""), Some("admin")).credential().is_none());
        assert!(record(Some("t"), Some("")).credential().is_none());
        assert!(record(None, None).credential().is_none());
    }

    #[test]
    fn memory_store_set_and_clear() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set(&Credential::new("abc", "admin")).unwrap();
        assert_eq!(store.get().unwrap(), Some(Credential::new("abc", "admin")));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        store.set(&Credential::new("abc", "admin")).unwrap();

        let reopened = FileCredentialStore::in_dir(dir.path());
        assert_eq!(reopened.get().unwrap(), Some(Credential::new("abc", "admin")));

        reopened.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_store_reads_partial_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        fs::write(store.path(), r#"{ "token": "abc" }"#).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token.as_deref(), Some("abc"));
        assert!(loaded.credential().is_none());
    }
}
