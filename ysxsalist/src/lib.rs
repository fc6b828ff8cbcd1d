//! AList client library for the ysxs player
//!
//! This crate provides a small Rust client for the AList v3 file-listing
//! API, limited to what an audio playlist needs:
//!
//! - **Directory listing** (`/api/fs/list`), with the `null` content of empty
//!   directories mapped to an empty page
//! - **File information** (`/api/fs/get`), used to resolve cover images
//! - **Download URLs** (`{base}/d/{path}/{name}?sign=...`), built without any
//!   network call
//! - **Login** (`/api/auth/login`) and the current profile (`/api/me`)
//!
//! Every response goes through the `{code, message, data}` envelope; a
//! non-200 code is reported as [`AlistError::RemoteApi`] with the message the
//! server sent.
//!
//! # Example
//!
//! ```no_run
//! use ysxsalist::{AlistClient, DirectoryService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = AlistClient::new("https://pan.example.org")?;
//!     client.login("guest", "guest", "").await?;
//!
//!     let page = client.list_directory("/books/three-body/track", "", 1, 0, false).await?;
//!     println!("{} entries", page.total);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod path;
pub mod service;

// Re-exports
pub use client::{build_download_url, AlistClient, ClientBuilder};
pub use error::{AlistError, Result};
pub use models::{DirectoryEntry, DirectoryPage, UserProfile};
pub use service::DirectoryService;
