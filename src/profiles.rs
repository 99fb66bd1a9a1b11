//! Fixed size-profile table for optimized variants.
//!
//! Three profiles exist process-wide: `thumbnail`, `preview`, and `full`.
//! The table is a compiled-in constant; there is no runtime configuration.

/// Output codec for an optimized variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
}

/// Named resize/quality configuration applied to produce one variant.
#[derive(Debug, Clone, Copy)]
pub struct SizeProfile {
    pub name: &'static str,
    /// Longest-edge cap in pixels. Images within the cap are not resized.
    pub max_dimension: u32,
    /// Lossy encode quality (0-100).
    pub quality: u8,
    pub format: OutputFormat,
}

/// Variant table, in generation and report order.
pub const PROFILES: [SizeProfile; 3] = [
    SizeProfile {
        name: "thumbnail",
        max_dimension: 200,
        quality: 80,
        format: OutputFormat::Jpeg,
    },
    SizeProfile {
        name: "preview",
        max_dimension: 800,
        quality: 85,
        format: OutputFormat::Jpeg,
    },
    SizeProfile {
        name: "full",
        max_dimension: 1920,
        quality: 90,
        format: OutputFormat::Jpeg,
    },
];

/// Look up a profile by name.
pub fn get(name: &str) -> Option<&'static SizeProfile> {
    PROFILES.iter().find(|profile| profile.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        assert_eq!(get("thumbnail").unwrap().max_dimension, 200);
        assert_eq!(get("preview").unwrap().quality, 85);
        assert_eq!(get("full").unwrap().max_dimension, 1920);
        assert!(get("original").is_none());
    }

    #[test]
    fn test_profile_order_is_smallest_first() {
        let caps: Vec<u32> = PROFILES.iter().map(|p| p.max_dimension).collect();
        assert_eq!(caps, vec![200, 800, 1920]);
    }
}
