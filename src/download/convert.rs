//! Image re-encoding
//!
//! Decodes downloaded bytes and encodes them into the requested format. JPEG
//! output is flattened to RGB, GIF output is encoded as a single RGBA frame.
//! Pixel dimensions are preserved.

use crate::config::ConvertFormat;
use crate::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Re-encodes image bytes into `format`
///
/// # Arguments
///
/// * `data` - The downloaded image bytes, in any format the decoder supports
/// * `format` - Target format
/// * `jpeg_quality` - Quality (1-100) used when `format` is JPEG
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - The encoded image
/// * `Err(ConvertError)` - The input could not be decoded or the output encoded
pub fn convert_image(
    data: &[u8],
    format: ConvertFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ConvertError> {
    let image = image::load_from_memory(data).map_err(ConvertError::Decode)?;
    tracing::debug!(
        "Decoded {} bytes: {}x{}, converting to {}",
        data.len(),
        image.width(),
        image.height(),
        format
    );

    let encoded = encode(&image, format, jpeg_quality).map_err(ConvertError::Encode)?;

    if format == ConvertFormat::Jpg {
        tracing::debug!("Encoded JPEG (quality: {})", jpeg_quality);
    }

    Ok(encoded)
}

fn encode(
    image: &DynamicImage,
    format: ConvertFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());

    match format {
        ConvertFormat::Jpg => {
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality);
            DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        }
        ConvertFormat::Png => {
            image.write_to(&mut buffer, ImageFormat::Png)?;
        }
        ConvertFormat::Gif => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, ImageFormat::Gif)?;
        }
    }

    Ok(buffer.into_inner())
}
