use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use askpanel_core::SelectedImage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
const ACCEPTED_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "png", "gif", "bmp", "webp"];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{path:?} is not a supported image (jpg, png, gif, bmp, webp)")]
    Unsupported { path: PathBuf },
    #[error("{path:?} is {bytes} bytes; the limit is {max}", max = MAX_IMAGE_BYTES)]
    TooLarge { path: PathBuf, bytes: u64 },
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads an image file into a selection, rejecting unsupported types and
/// files over the size limit.
pub fn load_image(path: &Path) -> Result<SelectedImage, ImageError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ImageError::Unsupported {
            path: path.to_path_buf(),
        });
    }

    let read_err = |source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    };
    let size = fs::metadata(path).map_err(read_err)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            path: path.to_path_buf(),
            bytes: size,
        });
    }
    let bytes = fs::read(path).map_err(read_err)?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    Ok(SelectedImage {
        preview_data_url: preview_data_url(&content_type, &bytes),
        file_name,
        content_type,
        bytes: Arc::from(bytes),
    })
}

pub fn preview_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}
