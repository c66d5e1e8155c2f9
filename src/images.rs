//! Resizing and re-encoding of uploaded recipe images.

use std::fs;
use std::io;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageReader;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to open image: {0}")]
    Open(#[source] io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to create upload directory: {0}")]
    CreateDir(#[source] io::Error),

    #[error("failed to save processed image: {0}")]
    Save(#[source] image::ImageError),
}

/// Resize a staged upload to the configured width and re-encode it as JPEG
/// in the upload directory. Returns the generated filename; the caller turns
/// it into the public `/uploads/...` URL.
///
/// The input temp file is deleted on success. On failure it is left in place
/// and the error is surfaced to the caller.
pub fn process_image(config: &Config, input_path: &Path) -> Result<String, ProcessingError> {
    let src = ImageReader::open(input_path)
        .map_err(ProcessingError::Open)?
        .with_guessed_format()
        .map_err(ProcessingError::Open)?
        .decode()
        .map_err(ProcessingError::Decode)?;

    fs::create_dir_all(&config.upload_dir).map_err(ProcessingError::CreateDir)?;

    // Fixed output width with proportional height; smaller sources are
    // scaled up too.
    let width = config.img_max_width.max(1);
    let scale = f64::from(width) / f64::from(src.width().max(1));
    let height = (f64::from(src.height()) * scale).round().max(1.0) as u32;
    let resized = src.resize_exact(width, height, FilterType::Lanczos3);

    let filename = format!("recipe_{}.jpg", &Uuid::new_v4().to_string()[..8]);
    let output_path = config.upload_dir.join(&filename);

    // JPEG has no alpha channel, so flatten to RGB before encoding
    let rgb = resized.to_rgb8();
    let quality = config.img_quality.clamp(1, 100);
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality)
        .encode_image(&rgb)
        .map_err(ProcessingError::Save)?;
    fs::write(&output_path, &encoded).map_err(|e| ProcessingError::Save(e.into()))?;

    if let Err(e) = fs::remove_file(input_path) {
        tracing::warn!(
            "Failed to remove temp upload {}: {}",
            input_path.display(),
            e
        );
    }

    Ok(filename)
}
