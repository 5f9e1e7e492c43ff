//! Preparing uploaded photos before they are sent to a model.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::{Result, ServerError};

/// Uploads wider than this are scaled down; smaller ones are never enlarged.
pub const MAX_WIDTH: u32 = 1024;

pub const JPEG_QUALITY: u8 = 85;

/// Decode, downscale and re-encode an upload as a JPEG `data:` URL.
pub fn prepare_image(bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ServerError::InvalidImage(e.to_string()))?;

    let img = if img.width() > MAX_WIDTH {
        let height = (u64::from(img.height()) * u64::from(MAX_WIDTH) / u64::from(img.width()))
            .max(1);
        let height = u32::try_from(height).unwrap_or(u32::MAX);
        img.resize_exact(MAX_WIDTH, height, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ServerError::Internal(format!("JPEG encoding failed: {e}")))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&encoded)))
}

/// [`prepare_image`] on the blocking thread pool.
pub async fn prepare_image_blocking(bytes: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || prepare_image(&bytes))
        .await
        .map_err(|e| ServerError::Internal(format!("image task failed: {e}")))?
}
