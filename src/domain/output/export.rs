//! Export of a session list as one JSON document.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::OutputError;
use crate::domain::foundation::Timestamp;
use crate::domain::session::Session;

/// Metadata describing an export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    /// Always `json`.
    pub format: String,
    pub timestamp: Timestamp,
    /// Content size in bytes.
    pub file_size: usize,
    /// SHA-256 of the content, lowercase hex.
    pub checksum: String,
    pub session_count: usize,
}

/// The export document and its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExport {
    content: String,
    info: ExportInfo,
}

impl SessionExport {
    /// Builds an export stamped at `exported_at`.
    pub fn new(sessions: &[Session], exported_at: Timestamp) -> Result<Self, OutputError> {
        let content = serde_json::to_string_pretty(sessions)
            .map_err(|e| OutputError::Serialization(e.to_string()))?;
        let info = ExportInfo {
            format: "json".to_string(),
            timestamp: exported_at,
            file_size: content.len(),
            checksum: compute_checksum(&content),
            session_count: sessions.len(),
        };
        Ok(Self { content, info })
    }

    /// Pretty-printed JSON array of sessions.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn info(&self) -> &ExportInfo {
        &self.info
    }

    /// Returns true if `content` still matches the recorded checksum.
    pub fn verify(&self, content: &str) -> bool {
        compute_checksum(content) == self.info.checksum
    }

    /// Parses an export document back into sessions.
    pub fn parse(content: &str) -> Result<Vec<Session>, OutputError> {
        serde_json::from_str(content).map_err(|e| OutputError::Parse(e.to_string()))
    }
}

/// Exports `sessions` stamped with the current time.
pub fn export_sessions(sessions: &[Session]) -> Result<SessionExport, OutputError> {
    SessionExport::new(sessions, Timestamp::now())
}

fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
