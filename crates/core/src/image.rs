//! Background image references.
//!
//! Images are opaque bytes supplied by the caller. They are never re-encoded;
//! the only inspection is sniffing the magic bytes to pick the media type the
//! container needs when embedding them.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Image formats that can be embedded as slide backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // GIF87a / GIF89a
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        // BMP needs the full 14-byte file header to be useful
        if bytes.len() >= 14 && bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }

        None
    }

    /// MIME type used in `[Content_Types].xml`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }

    /// File extension for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }
}

/// Already-decoded image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap raw image bytes as-is.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` URI, as produced by a browser file reader.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| Error::ImageDecode("not a data URI".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::ImageDecode("data URI has no payload".to_string()))?;

        if !header.ends_with(";base64") {
            return Err(Error::ImageDecode(format!(
                "data URI is not base64 encoded: {}",
                header
            )));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::ImageDecode(format!("invalid base64 payload: {}", e)))?;

        if bytes.is_empty() {
            return Err(Error::ImageDecode("data URI payload is empty".to_string()));
        }

        Ok(Self { bytes })
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sniff the image format, failing if the bytes cannot be embedded.
    pub fn format(&self) -> Result<ImageFormat> {
        if self.bytes.is_empty() {
            return Err(Error::ImageDecode("image is empty".to_string()));
        }

        ImageFormat::from_magic(&self.bytes).ok_or_else(|| {
            Error::ImageDecode("unrecognized image format (expected PNG, JPEG, GIF or BMP)".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_from_magic() {
        assert_eq!(ImageFormat::from_magic(PNG_HEADER), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_magic(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic(b"BM"), None);
        assert_eq!(ImageFormat::from_magic(b"hello world"), None);
        assert_eq!(ImageFormat::from_magic(&[]), None);
    }

    #[test]
    fn test_from_data_uri() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let uri = format!("data:image/png;base64,{}", encoded);

        let image = ImageData::from_data_uri(&uri).unwrap();
        assert_eq!(image.as_bytes(), PNG_HEADER);
        assert_eq!(image.format().unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_malformed_data_uris() {
        for uri in [
            "image/png;base64,AAAA",
            "data:image/png;base64",
            "data:image/png,AAAA",
            "data:image/png;base64,***",
            "data:image/png;base64,",
        ] {
            let err = ImageData::from_data_uri(uri).unwrap_err();
            assert!(matches!(err, Error::ImageDecode(_)), "{}", uri);
        }
    }

    #[test]
    fn test_unknown_format_is_decode_error() {
        let image = ImageData::from_bytes(b"plain text".to_vec());
        assert!(matches!(image.format(), Err(Error::ImageDecode(_))));

        let empty = ImageData::from_bytes(Vec::new());
        assert!(empty.is_empty());
        assert!(matches!(empty.format(), Err(Error::ImageDecode(_))));
    }
}
