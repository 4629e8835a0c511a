//! Embedded image types and OCR result records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the raw bytes of an extracted image XObject are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    /// DCTDecode stream: the bytes are a complete JPEG file.
    Jpeg,
    /// JPXDecode stream: the bytes are a complete JPEG 2000 file.
    Jpeg2000,
    /// Decompressed raw samples (FlateDecode or unfiltered); needs
    /// re-encoding before any image viewer or OCR engine can read it.
    Raw,
}

impl ImageEncoding {
    /// File extension for persisted images of this encoding.
    ///
    /// Raw sample data is re-encoded to PNG on write.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => "jpg",
            ImageEncoding::Jpeg2000 => "jp2",
            ImageEncoding::Raw => "png",
        }
    }
}

/// An image XObject extracted from a page, before persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Page the image appeared on (1-indexed).
    pub page_number: u32,

    /// Position of the image within its page (0-indexed, document order).
    pub index: u32,

    /// Raw stream bytes, decompressed for `ImageEncoding::Raw`.
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Encoding of `data`.
    pub encoding: ImageEncoding,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,

    /// Bits per color component (usually 8).
    pub bits_per_component: u8,

    /// Color space name from the image dictionary (e.g. "DeviceRGB").
    pub color_space: Option<String>,
}

impl PageImage {
    /// The deterministic file name this image persists to.
    pub fn file_name(&self) -> String {
        format!(
            "image_{}_{}.{}",
            self.page_number,
            self.index,
            self.encoding.extension()
        )
    }
}

/// OCR output for one persisted page image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRecord {
    /// Page the image appeared on (1-indexed).
    pub page_number: u32,

    /// Path the image was written to.
    pub image_path: PathBuf,

    /// Recognized text, whitespace-trimmed. Empty when the engine found
    /// nothing legible.
    pub ocr_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image(page: u32, index: u32, encoding: ImageEncoding) -> PageImage {
        PageImage {
            page_number: page,
            index,
            data: vec![],
            encoding,
            width: 2,
            height: 2,
            bits_per_component: 8,
            color_space: Some("DeviceGray".to_string()),
        }
    }

    #[test]
    fn test_file_name_by_encoding() {
        assert_eq!(
            sample_image(1, 0, ImageEncoding::Jpeg).file_name(),
            "image_1_0.jpg"
        );
        assert_eq!(
            sample_image(2, 1, ImageEncoding::Raw).file_name(),
            "image_2_1.png"
        );
        assert_eq!(
            sample_image(3, 0, ImageEncoding::Jpeg2000).file_name(),
            "image_3_0.jp2"
        );
    }

    #[test]
    fn test_file_names_unique_per_page_index() {
        let a = sample_image(1, 0, ImageEncoding::Jpeg);
        let b = sample_image(1, 1, ImageEncoding::Jpeg);
        let c = sample_image(2, 0, ImageEncoding::Jpeg);
        assert_ne!(a.file_name(), b.file_name());
        assert_ne!(a.file_name(), c.file_name());
    }
}
