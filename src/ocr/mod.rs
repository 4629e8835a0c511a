//! Optical character recognition via the system tesseract binary.
//!
//! Recognition is delegated to `tesseract` as a subprocess rather than
//! linking libtesseract, so the crate builds without the library's
//! headers installed. [`OcrEngine::is_available`] probes for the binary;
//! callers that cannot tolerate a missing engine get
//! [`Error::OcrUnavailable`] at recognition time.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};
use crate::parser::OcrOptions;

/// Handle to the tesseract command-line engine.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    lang: String,
    psm: u8,
}

impl OcrEngine {
    /// Create an engine with the default language ("eng").
    pub fn new() -> Self {
        Self::with_options(&OcrOptions::default())
    }

    /// Create an engine from OCR options.
    pub fn with_options(options: &OcrOptions) -> Self {
        Self {
            lang: options.lang.clone(),
            psm: options.psm,
        }
    }

    /// The configured language code.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Check whether the tesseract binary can be executed.
    pub fn is_available() -> bool {
        let found = Command::new("tesseract")
            .arg("--version")
            .output()
            .is_ok();
        if !found {
            log::debug!("tesseract not found - install tesseract-ocr for OCR support");
        }
        found
    }

    /// Run OCR over an image file and return the recognized text, trimmed.
    ///
    /// An empty string is a valid result for an image with no legible
    /// text; failures of the engine itself are errors.
    pub fn recognize<P: AsRef<Path>>(&self, image_path: P) -> Result<String> {
        let image_path = image_path.as_ref();

        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg(self.psm.to_string())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::OcrUnavailable(
                    "tesseract binary not found in PATH".to_string(),
                ),
                _ => Error::OcrUnavailable(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr {
                path: image_path.to_path_buf(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.trim().to_string())
    }
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new()
    }
}
