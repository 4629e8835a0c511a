//! Extraction options and configuration.

use std::path::PathBuf;

/// Options for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode for per-page text decoding.
    pub error_mode: ErrorMode,

    /// Directory that table CSVs and image files are written into.
    /// Created if missing. Defaults to the current directory.
    pub output_dir: PathBuf,

    /// OCR engine configuration.
    pub ocr: OcrOptions,

    /// Table detector thresholds.
    pub table: TableOptions,
}

impl ExtractOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip pages whose text cannot be decoded instead of failing.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the output directory for persisted tables and images.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the OCR language (tesseract language code, e.g. "eng").
    pub fn with_ocr_lang(mut self, lang: impl Into<String>) -> Self {
        self.ocr.lang = lang.into();
        self
    }

    /// Enable or disable the OCR pass over extracted images.
    pub fn with_ocr(mut self, enabled: bool) -> Self {
        self.ocr.enabled = enabled;
        self
    }

    /// Set table detector thresholds.
    pub fn with_table_options(mut self, table: TableOptions) -> Self {
        self.table = table;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            output_dir: PathBuf::from("."),
            ocr: OcrOptions::default(),
            table: TableOptions::default(),
        }
    }
}

/// Error handling mode for page text decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error.
    #[default]
    Strict,
    /// Record an empty page and continue.
    Lenient,
}

/// OCR engine configuration.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Whether to run OCR over extracted images.
    pub enabled: bool,

    /// Tesseract language code.
    pub lang: String,

    /// Tesseract page segmentation mode. 1 = automatic with OSD.
    pub psm: u8,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            lang: "eng".to_string(),
            psm: 1,
        }
    }
}

/// Table detector thresholds.
///
/// The defaults follow the stream-mode heuristic: rows are text spans
/// grouped by baseline, columns are X positions that align across rows.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Minimum number of rows for a region to count as a table.
    pub min_rows: usize,
    /// Minimum number of aligned columns.
    pub min_columns: usize,
    /// Maximum number of columns; above this the region is likely
    /// word-level splitting, not a table.
    pub max_columns: usize,
    /// Baseline tolerance for grouping spans into rows, as a fraction of
    /// font size.
    pub row_tolerance_factor: f32,
    /// Fraction of rows a column edge must align with.
    pub min_alignment_ratio: f32,
    /// Minimum horizontal gap between column edges, in points.
    pub min_column_gap: f32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            row_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}
