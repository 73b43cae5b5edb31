use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AuthError;

const KEYRING_USER: &str = "OPENAI_API_KEY";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Env var consulted when nothing is in the keyring.
pub const API_KEY_ENV: &str = "RENTA_API_KEY";

/// Where a loaded key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    Keyring,
    Env,
    File,
}

impl CredentialSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key read back from storage.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub value: String,
    pub source: CredentialSource,
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// The single persisted API key.
///
/// Read order is keyring → `RENTA_API_KEY` → credentials file. Writes go to
/// the keyring and fall back to the file when no keychain is available.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    keyring_service: Option<String>,
    env_var: Option<&'static str>,
    file_path: PathBuf,
    expected_length: usize,
}

impl CredentialStore {
    /// Store rooted at `~/.rentagpt/credentials`, using the configured keychain.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StoreError` if the home directory cannot be found.
    pub fn from_config(config: &renta_config::CredentialConfig) -> Result<Self, AuthError> {
        Ok(Self {
            keyring_service: (!config.file_only).then(|| config.keyring_service.clone()),
            env_var: Some(API_KEY_ENV),
            file_path: default_credentials_path()?,
            expected_length: config.expected_length,
        })
    }

    /// File-only store, ignoring the keychain and environment.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>, expected_length: usize) -> Self {
        Self {
            keyring_service: None,
            env_var: None,
            file_path: path.into(),
            expected_length,
        }
    }

    /// Same store with the credentials file moved to `path`.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = path.into();
        self
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[must_use]
    pub const fn expected_length(&self) -> usize {
        self.expected_length
    }

    /// Check a key's length. This is the only validation performed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidLength` if the key is not exactly the expected length.
    pub fn validate(&self, key: &str) -> Result<(), AuthError> {
        let actual = key.chars().count();
        if actual == self.expected_length {
            Ok(())
        } else {
            Err(AuthError::InvalidLength {
                expected: self.expected_length,
                actual,
            })
        }
    }

    /// Whether `key` would pass [`Self::validate`].
    #[must_use]
    pub fn is_valid(&self, key: &str) -> bool {
        self.validate(key).is_ok()
    }

    /// Validate and persist a key.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidLength` for a rejected key (nothing is written),
    /// or `AuthError::StoreError` if neither keyring nor file storage works.
    pub fn save(&self, key: &str) -> Result<CredentialSource, AuthError> {
        self.validate(key)?;

        if let Some(service) = &self.keyring_service {
            match store_keyring(service, key) {
                Ok(()) => return Ok(CredentialSource::Keyring),
                Err(error) => {
                    tracing::warn!(%error, "keyring store failed; falling back to file");
                }
            }
        }

        self.store_file(key)?;
        Ok(CredentialSource::File)
    }

    /// Load the stored key, if any.
    #[must_use]
    pub fn load(&self) -> Option<StoredCredential> {
        // 1. Keyring
        if let Some(service) = &self.keyring_service
            && let Ok(entry) = keyring::Entry::new(service, KEYRING_USER)
            && let Ok(value) = entry.get_password()
            && !value.is_empty()
        {
            return Some(StoredCredential {
                value,
                source: CredentialSource::Keyring,
            });
        }

        // 2. Environment variable
        if let Some(name) = self.env_var
            && let Ok(value) = std::env::var(name)
            && !value.is_empty()
        {
            return Some(StoredCredential {
                value,
                source: CredentialSource::Env,
            });
        }

        // 3. File fallback
        self.load_file().map(|value| StoredCredential {
            value,
            source: CredentialSource::File,
        })
    }

    /// Load the key and check its length, as required before asking anything.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` when no key is stored, and
    /// `AuthError::InvalidLength` when the stored key has the wrong length.
    pub fn require_valid(&self) -> Result<StoredCredential, AuthError> {
        let stored = self.require()?;
        self.validate(&stored.value)?;
        Ok(stored)
    }

    /// Load the key or fail with [`AuthError::NotConfigured`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` when no key is stored anywhere.
    pub fn require(&self) -> Result<StoredCredential, AuthError> {
        self.load().ok_or(AuthError::NotConfigured)
    }

    /// Remove the key from the keyring and the credentials file.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::StoreError` if the credentials file cannot be removed.
    pub fn clear(&self) -> Result<(), AuthError> {
        if let Some(service) = &self.keyring_service
            && let Ok(entry) = keyring::Entry::new(service, KEYRING_USER)
        {
            // May not exist.
            let _ = entry.delete_credential();
        }

        if self.file_path.exists() {
            fs::remove_file(&self.file_path).map_err(|e| {
                AuthError::StoreError(format!(
                    "failed to delete {}: {e}",
                    self.file_path.display()
                ))
            })?;
        }
        Ok(())
    }

    // --- Private file helpers ---

    fn store_file(&self, key: &str) -> Result<(), AuthError> {
        let path = &self.file_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::StoreError(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(path, key)
            .map_err(|e| AuthError::StoreError(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::StoreError(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.file_path)
            .ok()
            .map(|s| s.trim_end_matches(['\r', '\n']).to_string())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Write the key to the OS keychain and read it back through a fresh entry.
///
/// Without a persistent platform backend, keyring falls back to a mock store
/// that never returns what was written; that counts as a failure here.
fn store_keyring(service: &str, key: &str) -> Result<(), AuthError> {
    let keyring_error = |e: keyring::Error| AuthError::KeyringError(e.to_string());

    keyring::Entry::new(service, KEYRING_USER)
        .and_then(|entry| entry.set_password(key))
        .map_err(keyring_error)?;

    let stored = keyring::Entry::new(service, KEYRING_USER)
        .and_then(|entry| entry.get_password())
        .map_err(keyring_error)?;
    if stored != key {
        return Err(AuthError::KeyringError(
            "keychain did not return the saved key".into(),
        ));
    }
    Ok(())
}

fn default_credentials_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".rentagpt").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            AuthError::StoreError("home directory not found; cannot store credentials".into())
        })
}
