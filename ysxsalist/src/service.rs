//! Directory service abstraction
//!
//! The playlist pipeline only needs "list a directory", "describe a file" and
//! the download URL scheme. [`AlistClient`](crate::AlistClient) implements
//! this trait against a real server; tests implement it in memory.

use crate::error::Result;
use crate::models::{DirectoryEntry, DirectoryPage};
use async_trait::async_trait;

/// Read-only access to a remote directory tree
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Base URL of the server, without trailing separator
    fn base_url(&self) -> &str;

    /// List one directory page
    async fn list_directory(
        &self,
        path: &str,
        password: &str,
        page: u32,
        per_page: u32,
        refresh: bool,
    ) -> Result<DirectoryPage>;

    /// Describe one object, including its direct URL
    async fn get_file_info(&self, path: &str, password: &str) -> Result<DirectoryEntry>;

    /// Download URL of `file_name` inside `path`
    fn download_url(&self, path: &str, file_name: &str, signature: &str) -> String {
        crate::client::build_download_url(self.base_url(), path, file_name, signature)
    }
}
