//! Data-URI image payloads (`data:image/<type>;base64,<payload>`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::errors::ImageFormatError;

/// Raster formats accepted for survey images.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "gif", "png"];

/// A decoded image ready to hand to the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Lowercase file extension, one of [`ALLOWED_IMAGE_EXTENSIONS`].
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    /// Parse and decode a data URI.
    ///
    /// Spaces in the payload are read as `+` (form-encoded uploads lose them).
    ///
    /// # Errors
    ///
    /// Returns `ImageFormatError` if the string is not a base64 image data
    /// URI, names an unsupported type, fails to decode, or decodes to nothing.
    pub fn from_data_uri(uri: &str) -> Result<Self, ImageFormatError> {
        let rest = uri
            .strip_prefix("data:image/")
            .ok_or(ImageFormatError::NotDataUri)?;
        let (kind, payload) = rest
            .split_once(";base64,")
            .ok_or(ImageFormatError::NotDataUri)?;
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ImageFormatError::NotDataUri);
        }

        let extension = kind.to_ascii_lowercase();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ImageFormatError::UnsupportedType(extension));
        }

        let bytes = STANDARD
            .decode(payload.replace(' ', "+"))
            .map_err(|e| ImageFormatError::InvalidEncoding(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ImageFormatError::Empty);
        }

        Ok(Self { extension, bytes })
    }
}
