//! PDF parsing: document access, positioned text, and table detection.

mod layout;
mod options;
mod pdf_parser;
mod table_detector;

pub use layout::TextSpan;
pub use options::{ErrorMode, ExtractOptions, OcrOptions, TableOptions};
pub use pdf_parser::PdfParser;
pub use table_detector::TableDetector;
