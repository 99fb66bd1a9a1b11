//! Optimization statistics reporting.

use serde::Serialize;
use std::collections::HashMap;

/// Sizes and reduction for a single optimized variant.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileStats {
    pub size_bytes: u64,
    pub size_kb: f64,
    pub size_mb: f64,
    pub reduction_percent: f64,
}

/// Per-variant size report relative to the original upload.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationStats {
    pub original_size_bytes: u64,
    pub original_size_mb: f64,
    pub optimized: HashMap<String, ProfileStats>,
}

/// Compute per-variant sizes and percentage reduction against the original.
///
/// Pure: no side effects, no storage access. Sizes round to 2 decimals,
/// reduction to 1. A zero original size reports 0.0 reduction.
pub fn optimization_stats(
    original_size: u64,
    optimized_sizes: &HashMap<String, u64>,
) -> OptimizationStats {
    let optimized = optimized_sizes
        .iter()
        .map(|(name, &size_bytes)| {
            let reduction = if original_size == 0 {
                0.0
            } else {
                (1.0 - size_bytes as f64 / original_size as f64) * 100.0
            };
            (
                name.clone(),
                ProfileStats {
                    size_bytes,
                    size_kb: round2(size_bytes as f64 / 1024.0),
                    size_mb: round2(size_bytes as f64 / 1024.0 / 1024.0),
                    reduction_percent: round1(reduction),
                },
            )
        })
        .collect();

    OptimizationStats {
        original_size_bytes: original_size,
        original_size_mb: round2(original_size as f64 / 1024.0 / 1024.0),
        optimized,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
