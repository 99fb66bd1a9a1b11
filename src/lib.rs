//! Web-optimized image variants with object-storage publishing.
//!
//! Decodes an uploaded image, derives fixed-size JPEG variants (thumbnail,
//! preview, full) while preserving aspect ratio, stores them under
//! deterministic keys on S3-compatible storage, and returns public or
//! presigned URLs for each variant.

pub mod error;
pub mod optimizer;
pub mod pipeline;
pub mod profiles;
pub mod stats;
pub mod storage;

pub use error::{Error, Result};
pub use optimizer::{optimize, optimize_all, resize_dimensions};
pub use pipeline::{optimized_key, ImageOptimizer};
pub use stats::{optimization_stats, OptimizationStats, ProfileStats};
