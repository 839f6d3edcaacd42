use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use image::ImageReader;

use super::SourceImage;
use crate::error::{RenderError, Result};

/// Open and decode the image at `path`.
///
/// The file handle lives only for the duration of this call and is closed
/// on every return path, including decode failures.
pub fn load(path: &Path) -> Result<SourceImage> {
    if !path.exists() {
        return Err(RenderError::Path {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Decoding {:?} (format: {:?})", path, reader.format());

    let image = reader.decode()?;
    log::info!("Loaded {:?}: {}x{}", path, image.width(), image.height());

    Ok(SourceImage::from_dynamic(image))
}

/// Decode an in-memory byte stream, guessing the format from its contents.
pub fn decode_bytes(bytes: &[u8]) -> Result<SourceImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| RenderError::Decode(err.into()))?;
    let image = reader.decode()?;
    Ok(SourceImage::from_dynamic(image))
}
