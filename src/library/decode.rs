use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader};

use super::{LibraryError, LibraryResult};

/// Longest edge kept after decoding; the renderer scales the rest.
pub const DISPLAY_MAX_EDGE: u32 = 2048;

/// Straight RGBA pixels ready to hand to the GTK thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPhoto {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedPhoto {
    pub fn row_stride(&self) -> usize {
        self.width as usize * 4
    }
}

/// Decodes a photo for display: EXIF orientation applied, and shrunk so
/// neither edge exceeds `max_edge`. Blocking; call it from a worker.
pub fn decode_for_display(path: &Path, max_edge: u32) -> LibraryResult<DecodedPhoto> {
    let decode_error = |source| LibraryError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let open_error = |source| LibraryError::OpenPhoto {
        path: path.to_path_buf(),
        source,
    };

    let mut decoder = ImageReader::open(path)
        .map_err(open_error)?
        .with_guessed_format()
        .map_err(open_error)?
        .into_decoder()
        .map_err(decode_error)?;
    let orientation = decoder.orientation().map_err(decode_error)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    image.apply_orientation(orientation);

    let max_edge = max_edge.max(1);
    if image.width() > max_edge || image.height() > max_edge {
        image = image.thumbnail(max_edge, max_edge);
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(LibraryError::Oversized {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), width, height, "decoded photo");
    Ok(DecodedPhoto {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
