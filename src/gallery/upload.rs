use super::error::GalleryError;
use image::ImageFormat;
use sha2::{Digest, Sha256};

/// A validated upload part. Photos are stored under a content hash so the
/// same bytes always land on the same name.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl PhotoUpload {
    pub fn from_bytes(original_name: Option<&str>, bytes: Vec<u8>) -> Result<Self, GalleryError> {
        let format = image::guess_format(&bytes).map_err(|_| {
            GalleryError::Validation(format!(
                "{} is not a supported image",
                original_name.unwrap_or("upload")
            ))
        })?;
        Ok(Self { bytes, format })
    }

    pub fn file_name(&self) -> String {
        let digest = hex::encode(Sha256::digest(&self.bytes));
        match self.format.extensions_str().first() {
            Some(ext) => format!("{}.{}", digest, ext),
            None => digest,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}
