//! Upload and end-to-end orchestration for optimized variants.
//!
//! Ties the in-memory optimizer to object storage: fetch the original,
//! derive the variants, store each under a deterministic key, and hand back
//! per-variant URLs.

use crate::optimizer;
use crate::stats;
use crate::storage::{StorageClient, StorageService};
use crate::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};

/// MIME type for every stored variant; the profile table only encodes JPEG.
const OPTIMIZED_CONTENT_TYPE: &str = "image/jpeg";

/// Variants are immutable content: a key is never reused for different bytes.
const CACHE_CONTROL: &str = "max-age=31536000";

/// Lifetime of presigned URLs for private variants: 7 days.
const SIGNED_URL_TTL: Duration = Duration::from_secs(604_800);

/// Derive the storage key for one optimized variant of `original_key`.
///
/// The variant lands next to the original under an `optimized/` segment with
/// a `_{profile}` suffix, and the extension is always replaced with `.jpg`:
/// `a/b/c.png` + `thumbnail` -> `a/b/optimized/c_thumbnail.jpg`.
pub fn optimized_key(original_key: &str, profile_name: &str) -> String {
    let (base_path, filename) = match original_key.rsplit_once('/') {
        Some((base, filename)) => (Some(base), filename),
        None => (None, original_key),
    };
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => filename,
    };

    match base_path {
        Some(base) => format!("{base}/optimized/{stem}_{profile_name}.jpg"),
        None => format!("optimized/{stem}_{profile_name}.jpg"),
    }
}

fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

/// Derives web-optimized variants of stored images and publishes them.
///
/// Holds only the storage handle; safe to reuse across invocations.
pub struct ImageOptimizer {
    storage: Box<dyn StorageService>,
}

impl ImageOptimizer {
    /// Build an optimizer over an injected storage backend.
    pub fn new(storage: Box<dyn StorageService>) -> Self {
        Self { storage }
    }

    /// Build an optimizer over a real S3 client from ambient AWS
    /// configuration.
    pub async fn from_env() -> Self {
        Self::new(Box::new(StorageClient::from_env().await))
    }

    /// Upload optimized variants and return per-profile URLs.
    ///
    /// Public variants get a world-readable ACL and a static
    /// virtual-hosted-style URL; private variants get a 7-day presigned URL.
    /// A failed upload or presign is logged and its profile omitted; the
    /// remaining profiles continue. An empty map is a valid outcome.
    pub async fn upload_optimized(
        &self,
        bucket: &str,
        original_key: &str,
        optimized: &HashMap<String, Vec<u8>>,
        make_public: bool,
    ) -> HashMap<String, String> {
        let mut urls = HashMap::new();

        for (profile_name, data) in optimized {
            let key = optimized_key(original_key, profile_name);

            if let Err(e) = self
                .storage
                .store_object(
                    bucket,
                    &key,
                    data,
                    OPTIMIZED_CONTENT_TYPE,
                    CACHE_CONTROL,
                    make_public,
                )
                .await
            {
                error!("Failed to upload {} variant to {}: {}", profile_name, key, e);
                continue;
            }

            let url = if make_public {
                public_url(bucket, &key)
            } else {
                match self.storage.presigned_get_url(bucket, &key, SIGNED_URL_TTL).await {
                    Ok(url) => url,
                    Err(e) => {
                        error!("Failed to presign {} variant at {}: {}", profile_name, key, e);
                        continue;
                    }
                }
            };

            info!("Uploaded {} variant to {}", profile_name, key);
            urls.insert(profile_name.clone(), url);
        }

        urls
    }

    /// Complete workflow: fetch the original, derive all variants, upload.
    ///
    /// A fetch failure is fatal and propagates; everything after it degrades
    /// per profile.
    pub async fn process_for_web(
        &self,
        bucket: &str,
        key: &str,
        make_public: bool,
    ) -> Result<HashMap<String, String>> {
        info!("Downloading image from s3://{}/{}", bucket, key);
        let original = self.storage.fetch_object(bucket, key).await?;

        let original_size = original.len() as u64;
        info!(
            "Original image size: {} bytes ({:.2} MB)",
            original_size,
            original_size as f64 / 1024.0 / 1024.0
        );

        let optimized = tokio::task::spawn_blocking(move || optimizer::optimize_all(&original))
            .await
            .map_err(|e| Error::Internal(format!("Optimization task join error: {e}")))?;

        let variant_sizes: HashMap<String, u64> = optimized
            .iter()
            .map(|(name, data)| (name.clone(), data.len() as u64))
            .collect();
        let report = stats::optimization_stats(original_size, &variant_sizes);
        for (name, entry) in &report.optimized {
            info!(
                "{}: {} bytes ({:.2} KB, {:.1}% reduction)",
                name, entry.size_bytes, entry.size_kb, entry.reduction_percent
            );
        }

        Ok(self.upload_optimized(bucket, key, &optimized, make_public).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStorageClient;
    use image::GenericImageView;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_optimized_key_replaces_extension() {
        assert_eq!(
            optimized_key("proj/site/img.png", "thumbnail"),
            "proj/site/optimized/img_thumbnail.jpg"
        );
        assert_eq!(
            optimized_key("proj/site/img.jpg", "full"),
            "proj/site/optimized/img_full.jpg"
        );
    }

    #[test]
    fn test_optimized_key_without_directory() {
        assert_eq!(optimized_key("img.png", "preview"), "optimized/img_preview.jpg");
    }

    #[test]
    fn test_optimized_key_with_dotted_stem_and_no_extension() {
        assert_eq!(
            optimized_key("a/b/c.d.e.jpg", "full"),
            "a/b/optimized/c.d.e_full.jpg"
        );
        assert_eq!(optimized_key("a/b/raw", "full"), "a/b/optimized/raw_full.jpg");
    }

    #[tokio::test]
    async fn test_upload_public_sets_acl_and_static_url() {
        let storage = MockStorageClient::new();
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let optimized = HashMap::from([("thumbnail".to_string(), vec![1u8, 2, 3])]);
        let urls = optimizer
            .upload_optimized("bkt", "cams/site/img.png", &optimized, true)
            .await;

        assert_eq!(
            urls["thumbnail"],
            "https://bkt.s3.amazonaws.com/cams/site/optimized/img_thumbnail.jpg"
        );

        let stored = storage
            .get_object("bkt", "cams/site/optimized/img_thumbnail.jpg")
            .unwrap();
        assert_eq!(stored.content_type, "image/jpeg");
        assert_eq!(stored.cache_control, "max-age=31536000");
        assert!(stored.public_read);
    }

    #[tokio::test]
    async fn test_upload_private_returns_presigned_url() {
        let storage = MockStorageClient::new();
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let optimized = HashMap::from([("preview".to_string(), vec![9u8])]);
        let urls = optimizer
            .upload_optimized("bkt", "img.png", &optimized, false)
            .await;

        assert!(urls["preview"].contains("X-Amz-Expires=604800"));
        assert!(!storage.get_object("bkt", "optimized/img_preview.jpg").unwrap().public_read);
    }

    #[tokio::test]
    async fn test_upload_partial_failure_keeps_other_profiles() {
        let storage = MockStorageClient::new().with_store_failure("_preview");
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let optimized = HashMap::from([
            ("thumbnail".to_string(), vec![1u8]),
            ("preview".to_string(), vec![2u8]),
            ("full".to_string(), vec![3u8]),
        ]);
        let urls = optimizer
            .upload_optimized("bkt", "a/img.png", &optimized, true)
            .await;

        assert_eq!(urls.len(), 2);
        assert!(urls.contains_key("thumbnail"));
        assert!(urls.contains_key("full"));
        assert!(!urls.contains_key("preview"));
        // Every profile was still attempted.
        assert_eq!(storage.get_store_count(), 3);
    }

    #[tokio::test]
    async fn test_process_for_web_uploads_all_variants() {
        let storage = MockStorageClient::new().with_object(
            "bkt",
            "photos/cam1/shot.png",
            png_bytes(1000, 800),
        );
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let urls = optimizer
            .process_for_web("bkt", "photos/cam1/shot.png", true)
            .await
            .unwrap();

        assert_eq!(urls.len(), 3);
        for profile in ["thumbnail", "preview", "full"] {
            let key = format!("photos/cam1/optimized/shot_{profile}.jpg");
            assert_eq!(urls[profile], format!("https://bkt.s3.amazonaws.com/{key}"));
            assert!(storage.get_object("bkt", &key).is_some());
        }

        // 1000x800 exceeds the thumbnail cap; stored variant is resized.
        let thumb = storage
            .get_object("bkt", "photos/cam1/optimized/shot_thumbnail.jpg")
            .unwrap();
        let img = image::load_from_memory(&thumb.data).unwrap();
        assert_eq!((img.width(), img.height()), (200, 160));
    }

    #[tokio::test]
    async fn test_process_for_web_fetch_failure_is_fatal() {
        let storage = MockStorageClient::new();
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let result = optimizer.process_for_web("bkt", "missing.png", true).await;
        assert!(matches!(result, Err(Error::StorageRead(_))));
        assert_eq!(storage.get_store_count(), 0);
    }

    #[tokio::test]
    async fn test_process_for_web_undecodable_source_returns_empty_map() {
        let storage =
            MockStorageClient::new().with_object("bkt", "junk.bin", b"not an image".to_vec());
        let optimizer = ImageOptimizer::new(Box::new(storage.clone()));

        let urls = optimizer.process_for_web("bkt", "junk.bin", true).await.unwrap();
        assert!(urls.is_empty());
        assert_eq!(storage.get_store_count(), 0);
    }
}
