//! In-memory derivation of web-optimized JPEG variants.
//!
//! Decodes source bytes, normalizes the color mode, downsamples to each
//! profile's longest-edge cap with Lanczos3, and re-encodes at the profile's
//! quality. All functions here are synchronous and CPU-bound; callers on an
//! async runtime should offload through `tokio::task::spawn_blocking`.

use crate::profiles::{self, OutputFormat, SizeProfile, PROFILES};
use crate::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, RgbImage};
use std::collections::HashMap;
use tracing::{error, info};

/// Calculate resize dimensions that keep the aspect ratio while capping the
/// longest edge at `max_dimension`. Never upscales: an image already within
/// the cap comes back unchanged.
///
/// The derived edge is truncated, not rounded.
pub fn resize_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let aspect_ratio = width as f64 / height as f64;

    if width > height {
        // Landscape
        let new_width = width.min(max_dimension);
        let new_height = (new_width as f64 / aspect_ratio) as u32;
        (new_width, new_height)
    } else {
        // Portrait or square
        let new_height = height.min(max_dimension);
        let new_width = (new_height as f64 * aspect_ratio) as u32;
        (new_width, new_height)
    }
}

/// Flatten any alpha channel onto an opaque white background, using the
/// image's own alpha as the blend mask; other modes convert to plain RGB.
fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut flattened = RgbImage::from_pixel(rgba.width(), rgba.height(), image::Rgb([255, 255, 255]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as u16;
        let out = flattened.get_pixel_mut(x, y);
        for channel in 0..3 {
            let src = pixel[channel] as u16;
            out[channel] = ((src * alpha + 255 * (255 - alpha)) / 255) as u8;
        }
    }
    flattened
}

fn encode(img: &RgbImage, profile: &SizeProfile) -> Result<Vec<u8>> {
    match profile.format {
        OutputFormat::Jpeg => {
            let mut buf = Vec::new();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, profile.quality);
            encoder
                .encode(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
                .map_err(Error::Encode)?;
            Ok(buf)
        }
    }
}

/// Optimize a single image to the named size profile.
///
/// Fails with [`Error::UnknownProfile`] before touching the image bytes if
/// the name is not in the fixed profile table.
pub fn optimize(data: &[u8], profile_name: &str) -> Result<Vec<u8>> {
    let profile = profiles::get(profile_name)
        .ok_or_else(|| Error::UnknownProfile(profile_name.to_string()))?;

    let img = image::load_from_memory(data).map_err(Error::Decode)?;
    let rgb = flatten_to_rgb(img);

    let (width, height) = rgb.dimensions();
    let (new_width, new_height) = resize_dimensions(width, height, profile.max_dimension);

    // Resample only when the target shrinks both axes; never upscale.
    let rgb = if new_width < width && new_height < height {
        image::imageops::resize(&rgb, new_width, new_height, FilterType::Lanczos3)
    } else {
        rgb
    };

    encode(&rgb, profile)
}

/// Generate all optimized variants for an image.
///
/// A failure on one profile is logged and that profile omitted; the rest
/// continue. The returned map may be partial or empty.
pub fn optimize_all(data: &[u8]) -> HashMap<String, Vec<u8>> {
    let mut optimized = HashMap::new();

    for profile in &PROFILES {
        match optimize(data, profile.name) {
            Ok(bytes) => {
                info!("Generated {} variant: {} bytes", profile.name, bytes.len());
                optimized.insert(profile.name.to_string(), bytes);
            }
            Err(e) => {
                error!("Failed to generate {} variant: {}", profile.name, e);
            }
        }
    }

    optimized
}
