//! # pdfsift
//!
//! PDF content extraction for Rust: per-page plain text, stream-mode
//! table detection, and OCR over embedded raster images.
//!
//! Three independent extractors read the same document and feed one
//! report:
//!
//! - **Text** walks pages in order and returns trimmed plain text per page.
//! - **Tables** locates tabular regions from text alignment (no ruled
//!   lines required), writes each to a numbered CSV file, and returns the
//!   data plus file path.
//! - **Images** pulls embedded raster XObjects page by page, persists
//!   each to disk, and runs the system tesseract binary over it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsift::{extract_all, ExtractOptions};
//!
//! fn main() -> pdfsift::Result<()> {
//!     let options = ExtractOptions::new().with_output_dir("out");
//!     let report = extract_all("document.pdf", &options)?;
//!     print!("{}", report.render());
//!     Ok(())
//! }
//! ```
//!
//! Individual extractors are available as [`extract_text`],
//! [`extract_tables`], and [`extract_images`]; lower-level access goes
//! through [`PdfParser`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod report;

pub use error::{Error, Result};
pub use extract::{extract_all, extract_images, extract_tables, extract_text};
pub use model::{
    DocumentInfo, ImageEncoding, OcrRecord, PageImage, PageText, Table, TableRecord, TableRow,
};
pub use ocr::OcrEngine;
pub use parser::{ErrorMode, ExtractOptions, OcrOptions, PdfParser, TableOptions};
pub use report::ExtractionReport;
