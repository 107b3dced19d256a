//! Request and response shapes for manifesto drafting.

use crate::error::ManifestoError;
use serde::{Deserialize, Serialize};

/// Form input as posted by the landing page.
///
/// Every key is optional on the wire; presence is enforced by [`validate`](Self::validate).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestoRequest {
    #[serde(default)]
    pub party_name: Option<String>,
    #[serde(default)]
    pub issues: Option<String>,
    #[serde(default)]
    pub policies: Option<String>,
    #[serde(default)]
    pub vision: Option<String>,
}

impl ManifestoRequest {
    /// Trim every field and reject the request if any is absent or blank.
    pub fn validate(&self) -> Result<ManifestoFields, ManifestoError> {
        fn required(value: &Option<String>) -> Result<String, ManifestoError> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ManifestoError::Validation)
        }

        Ok(ManifestoFields {
            party_name: required(&self.party_name)?,
            issues: required(&self.issues)?,
            policies: required(&self.policies)?,
            vision: required(&self.vision)?,
        })
    }
}

/// Validated, trimmed form input. Only obtainable through
/// [`ManifestoRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestoFields {
    party_name: String,
    issues: String,
    policies: String,
    vision: String,
}

impl ManifestoFields {
    pub fn party_name(&self) -> &str {
        &self.party_name
    }

    pub fn issues(&self) -> &str {
        &self.issues
    }

    pub fn policies(&self) -> &str {
        &self.policies
    }

    pub fn vision(&self) -> &str {
        &self.vision
    }

    /// Download filename for this party's manifesto.
    pub fn filename(&self) -> String {
        manifesto_filename(&self.party_name)
    }
}

/// `manifesto_<party name with spaces as underscores>.txt`
pub fn manifesto_filename(party_name: &str) -> String {
    format!("manifesto_{}.txt", party_name.replace(' ', "_"))
}

/// JSON envelope returned by `POST /generate_manifesto`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestoResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifesto: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManifestoResponse {
    pub fn success(manifesto: String, filename: String) -> Self {
        Self {
            success: true,
            manifesto: Some(manifesto),
            filename: Some(filename),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            manifesto: None,
            filename: None,
            error: Some(error.into()),
        }
    }
}
