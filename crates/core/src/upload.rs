//! Upload trait — where raw tables come from.
//!
//! The file-picker, HTTP form, or whatever else supplies bytes lives outside
//! this crate. It only has to hand over a named byte stream; identity is the
//! SHA-256 of the bytes, so the same file uploaded twice is the same upload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IngestError;
use crate::table::RawTable;

/// Content digest of an upload (lowercase hex SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(pub String);

impl UploadId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(format!("{digest:x}"))
    }

    /// First 12 hex chars, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named byte stream with a content-derived identity.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
    id: UploadId,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let id = UploadId::of(&bytes);
        Self {
            name: name.into(),
            bytes,
            id,
        }
    }

    pub fn id(&self) -> &UploadId {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Supplies uploads.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable name of this source (e.g., a file path).
    fn name(&self) -> &str;

    /// Read the full byte stream.
    async fn fetch(&self) -> Result<Upload, IngestError>;
}

/// Turns an upload's bytes into a `RawTable`.
pub trait TableDecoder: Send + Sync {
    fn decode(&self, upload: &Upload) -> Result<RawTable, IngestError>;
}
