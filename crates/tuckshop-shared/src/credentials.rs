use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CredentialError;

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Service-account key file authorising the application against its
/// document store. Loaded once at start-up; the `project_id` selects which
/// store the client talks to.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub kind: String,
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
}

impl ServiceAccountKey {
    /// Read and validate a key file.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(CredentialError::Io(e)),
        };
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)?;
        key.validate()?;
        Ok(key)
    }

    fn validate(&self) -> Result<(), CredentialError> {
        if self.kind != SERVICE_ACCOUNT_TYPE {
            return Err(CredentialError::Invalid(format!(
                "expected type '{SERVICE_ACCOUNT_TYPE}', got '{}'",
                self.kind
            )));
        }
        let project_id = self.project_id.as_str();
        if project_id.trim().is_empty() {
            return Err(CredentialError::Invalid("project_id is empty".into()));
        }
        // The project id becomes a file name.
        if !project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CredentialError::Invalid(format!(
                "project_id '{project_id}' contains unsupported characters"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
