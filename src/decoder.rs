//! HEIF/HEIC decoding
//!
//! The pipeline only needs "give me pixels for this file", so decoding sits
//! behind [`HeifDecoder`]. The libheif-backed implementation is compiled with
//! the `heif` feature (on by default).

use crate::error::{ConvertError, Result};
use image::DynamicImage;
use std::path::Path;

/// Decodes a HEIF container into an in-memory image
pub trait HeifDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage>;
}

/// The decoder used when none is supplied explicitly
pub fn default_decoder() -> Box<dyn HeifDecoder + Send> {
    #[cfg(feature = "heif")]
    {
        Box::new(LibHeifDecoder::new())
    }
    #[cfg(not(feature = "heif"))]
    {
        Box::new(UnavailableDecoder)
    }
}

/// Stand-in for builds without libheif: every decode fails, which the
/// pipeline counts as a failed file.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDecoder;

impl HeifDecoder for UnavailableDecoder {
    fn decode(&self, _path: &Path) -> Result<DynamicImage> {
        Err(ConvertError::HeifUnsupported.into())
    }
}

#[cfg(feature = "heif")]
pub use libheif::LibHeifDecoder;

#[cfg(feature = "heif")]
mod libheif {
    use super::HeifDecoder;
    use crate::error::{ConvertError, Result};
    use image::{DynamicImage, RgbImage};
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};
    use std::path::Path;
    use tracing::debug;

    /// Decodes the primary image of a HEIF file through libheif
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LibHeifDecoder;

    impl LibHeifDecoder {
        pub fn new() -> Self {
            Self
        }
    }

    fn decode_error(e: impl std::fmt::Display) -> ConvertError {
        ConvertError::HeifDecode {
            reason: e.to_string(),
        }
    }

    impl HeifDecoder for LibHeifDecoder {
        fn decode(&self, path: &Path) -> Result<DynamicImage> {
            let path_str = path
                .to_str()
                .ok_or_else(|| decode_error("path is not valid UTF-8"))?;

            let ctx = HeifContext::read_from_file(path_str).map_err(decode_error)?;
            let handle = ctx.primary_image_handle().map_err(decode_error)?;

            // Interleaved 8-bit RGB drops alpha and any auxiliary channels
            let decoded = LibHeif::new()
                .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
                .map_err(decode_error)?;

            let planes = decoded.planes();
            let plane = planes
                .interleaved
                .ok_or_else(|| decode_error("decoded image has no interleaved plane"))?;

            let width = plane.width as usize;
            let height = plane.height as usize;
            let row_len = width * 3;
            debug!(
                "Decoded {} ({}x{}, stride {})",
                path.display(),
                width,
                height,
                plane.stride
            );

            let mut pixels = Vec::with_capacity(row_len * height);
            for row in plane.data.chunks(plane.stride).take(height) {
                let row = row
                    .get(..row_len)
                    .ok_or_else(|| decode_error("plane row shorter than image width"))?;
                pixels.extend_from_slice(row);
            }

            let rgb = RgbImage::from_raw(plane.width, plane.height, pixels)
                .ok_or_else(|| decode_error("pixel buffer does not match image size"))?;

            Ok(DynamicImage::ImageRgb8(rgb))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_decoder_reports_unsupported() {
        let err = UnavailableDecoder
            .decode(Path::new("photo.heic"))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::HeifUnsupported)
        ));
    }

    #[test]
    fn test_default_decoder_rejects_garbage() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("broken.heic");
        std::fs::write(&path, b"definitely not a heif container").unwrap();

        assert!(default_decoder().decode(&path).is_err());
    }
}
