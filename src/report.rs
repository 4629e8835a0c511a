//! The combined extraction report and its console rendering.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::model::{OcrRecord, PageText, TableRecord};

/// Results of all three extractors over one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Per-page text, in page order.
    pub pages: Vec<PageText>,

    /// Detected tables, in detection order.
    pub tables: Vec<TableRecord>,

    /// Per-image OCR results, in page-then-image order.
    pub images: Vec<OcrRecord>,
}

impl ExtractionReport {
    /// Render the fixed human-readable console report.
    pub fn render(&self) -> String {
        let mut out = String::new();

        writeln!(out, "--- Extracted Text ---").unwrap();
        for page in &self.pages {
            writeln!(out, "Page {}:\n{}\n", page.number, page.text).unwrap();
        }

        writeln!(out, "--- Extracted Tables ---").unwrap();
        for record in &self.tables {
            writeln!(out, "Table {}:\n{}", record.number, record.table.plain_text()).unwrap();
            writeln!(out, "CSV path: {}\n", record.csv_path.display()).unwrap();
        }

        writeln!(out, "--- Extracted Images and OCR ---").unwrap();
        for record in &self.images {
            writeln!(
                out,
                "Page {} - Image path: {}",
                record.page_number,
                record.image_path.display()
            )
            .unwrap();
            writeln!(out, "Text from image:\n{}\n", record.ocr_text).unwrap();
        }

        out
    }

    /// Serialize the report as JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Table, TableRow};
    use std::path::PathBuf;

    fn sample_report() -> ExtractionReport {
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["h1", "h2"]));
        table.add_row(TableRow::from_strings(["v1", "v2"]));

        ExtractionReport {
            pages: vec![
                PageText::new(1, "First page."),
                PageText::new(2, ""),
            ],
            tables: vec![TableRecord {
                number: 1,
                table,
                csv_path: PathBuf::from("table_1.csv"),
            }],
            images: vec![OcrRecord {
                page_number: 2,
                image_path: PathBuf::from("image_2_0.png"),
                ocr_text: "scanned words".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_sections() {
        let rendered = sample_report().render();

        assert!(rendered.contains("--- Extracted Text ---"));
        assert!(rendered.contains("Page 1:\nFirst page."));
        assert!(rendered.contains("--- Extracted Tables ---"));
        assert!(rendered.contains("Table 1:\nh1\th2\nv1\tv2"));
        assert!(rendered.contains("CSV path: table_1.csv"));
        assert!(rendered.contains("--- Extracted Images and OCR ---"));
        assert!(rendered.contains("Page 2 - Image path: image_2_0.png"));
        assert!(rendered.contains("Text from image:\nscanned words"));
    }

    #[test]
    fn test_render_empty_report() {
        let rendered = ExtractionReport::default().render();
        assert!(rendered.contains("--- Extracted Text ---"));
        assert!(rendered.contains("--- Extracted Tables ---"));
        assert!(rendered.contains("--- Extracted Images and OCR ---"));
    }

    #[test]
    fn test_json_round_trip() {
        let json = sample_report().to_json(false).unwrap();
        let back: ExtractionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pages.len(), 2);
        assert_eq!(back.tables.len(), 1);
        assert_eq!(back.images[0].ocr_text, "scanned words");
    }
}
