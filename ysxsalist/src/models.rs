//! Data models for AList API requests and responses
//!
//! Every AList endpoint answers with the same envelope:
//!
//! ```json
//! { "code": 200, "message": "success", "data": { ... } }
//! ```
//!
//! The structures below mirror the parts of the payloads the player uses.

use serde::{Deserialize, Serialize};

// ============================================================================
// Envelope
// ============================================================================

/// Common response envelope of the AList API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Application status code (200 on success)
    pub code: i64,
    /// Human readable status message
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific payload, `null` for some endpoints or on error
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the envelope reports success
    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}

// ============================================================================
// File system models
// ============================================================================

/// One object listed by `/api/fs/list` or described by `/api/fs/get`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DirectoryEntry {
    /// File or directory name
    pub name: String,
    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: i64,
    /// Whether this entry is a directory
    #[serde(default)]
    pub is_dir: bool,
    /// Last modification time, as reported by the storage
    #[serde(default)]
    pub modified: Option<String>,
    /// Download signature, empty when signing is disabled
    #[serde(default)]
    pub sign: Option<String>,
    /// Thumbnail URL, empty when none
    #[serde(default)]
    pub thumb: Option<String>,
    /// AList object type (0 unknown, 1 folder, 2 video, 3 audio, ...)
    #[serde(default, rename = "type")]
    pub kind: i64,
    /// Direct URL of the object (only filled by `/api/fs/get`)
    #[serde(default)]
    pub raw_url: Option<String>,
    /// Configured directory this entry was listed from
    ///
    /// Not part of the remote payload: set by the caller after the fetch so
    /// the full remote path can be rebuilt later.
    #[serde(skip)]
    pub source_directory: String,
}

impl DirectoryEntry {
    /// Creates a plain file entry
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a directory entry
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            kind: 1,
            ..Default::default()
        }
    }

    /// Sets the download signature
    pub fn with_sign(mut self, sign: impl Into<String>) -> Self {
        self.sign = Some(sign.into());
        self
    }

    /// Download signature, or an empty string
    pub fn signature(&self) -> &str {
        self.sign.as_deref().unwrap_or("")
    }

    /// Direct URL, or an empty string
    pub fn raw_url_or_default(&self) -> &str {
        self.raw_url.as_deref().unwrap_or("")
    }
}

/// Raw payload of `/api/fs/list`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListData {
    /// `null` when the directory is empty
    #[serde(default)]
    pub content: Option<Vec<DirectoryEntry>>,
    #[serde(default)]
    pub total: u64,
}

/// One page of a directory listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryPage {
    /// Entries in server order
    pub entries: Vec<DirectoryEntry>,
    /// Total number of entries in the directory
    pub total: u64,
}

impl From<ListData> for DirectoryPage {
    fn from(data: ListData) -> Self {
        Self {
            entries: data.content.unwrap_or_default(),
            total: data.total,
        }
    }
}

/// Body of `/api/fs/list`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ListRequest<'a> {
    pub path: &'a str,
    pub password: &'a str,
    pub page: u32,
    pub per_page: u32,
    pub refresh: bool,
}

/// Body of `/api/fs/get`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GetRequest<'a> {
    pub path: &'a str,
    pub password: &'a str,
}

/// Body of `/api/fs/copy`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CopyRequest<'a> {
    pub src_dir: &'a str,
    pub dst_dir: &'a str,
    pub names: &'a [String],
}

// ============================================================================
// Authentication models
// ============================================================================

/// Body of `/api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub otp_code: &'a str,
}

/// Payload of `/api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginData {
    pub token: String,
}

/// Payload of `/api/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub base_path: String,
    #[serde(default)]
    pub role: i64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub permission: i64,
}

impl UserProfile {
    /// AList reserves role 1 for the guest account
    pub fn is_guest(&self) -> bool {
        self.role == 1
    }
}
