//! Object storage integration.
//!
//! Abstracts fetching originals and storing optimized variants against an
//! S3-compatible store, with an in-memory mock for tests.

pub mod client;
pub mod mock;

pub use client::StorageClient;
pub use mock::MockStorageClient;

use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Fetch an object's full byte content.
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Store an object with its delivery metadata. `public_read` applies a
    /// world-readable ACL.
    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
        cache_control: &str,
        public_read: bool,
    ) -> Result<()>;

    /// Issue a time-limited GET URL. Signing is local; no network call is
    /// made at issuance time.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String>;
}
