//! Image intake
//!
//! Turns an uploaded file into the base64 payload sent to the vision model
//! and shown as a preview. Only the declared MIME type is checked; the bytes
//! themselves are not sniffed.

use crate::errors::ImageError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Largest accepted upload: 10 MiB
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Encoded image held for the duration of one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    mime_type: String,
    data_base64: String,
    size_bytes: usize,
}

impl ImageAsset {
    /// Accept an upload using the default 10 MiB limit
    pub fn from_upload(bytes: &[u8], declared_mime: &str) -> Result<Self, ImageError> {
        Self::from_upload_with_limit(bytes, declared_mime, MAX_IMAGE_BYTES)
    }

    /// Accept an upload, rejecting it before encoding if it breaks the rules
    pub fn from_upload_with_limit(
        bytes: &[u8],
        declared_mime: &str,
        limit_bytes: usize,
    ) -> Result<Self, ImageError> {
        if bytes.len() > limit_bytes {
            return Err(ImageError::TooLarge {
                size_bytes: bytes.len(),
                limit_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let mime_type = declared_mime.trim().to_ascii_lowercase();
        if !is_image_mime(&mime_type) {
            return Err(ImageError::NotAnImage(declared_mime.to_string()));
        }

        Ok(Self {
            mime_type,
            data_base64: BASE64.encode(bytes),
            size_bytes: bytes.len(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data_base64(&self) -> &str {
        &self.data_base64
    }

    /// Size of the original upload
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// `data:` URL for previews
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

fn is_image_mime(mime: &str) -> bool {
    match mime.split_once('/') {
        Some((kind, subtype)) => kind == "image" && !subtype.is_empty(),
        None => false,
    }
}
