//! The extraction pipeline: text, tables, then images with OCR.
//!
//! The three extractors are independent: each opens the document from the
//! path it is given and shares no state with the others. The orchestrator
//! [`extract_all`] runs them in fixed order and fails fast; an error in
//! any step aborts the remaining steps.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{ImageEncoding, OcrRecord, PageImage, PageText, TableRecord};
use crate::ocr::OcrEngine;
use crate::parser::{ErrorMode, ExtractOptions, PdfParser, TableDetector};
use crate::report::ExtractionReport;

/// Extract plain text from every page of the document.
///
/// Returns one record per page, numbered 1..=N in document order. A page
/// with no text yields a record with an empty string.
pub fn extract_text<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Vec<PageText>> {
    let parser = PdfParser::open(path)?;
    let mut pages = Vec::with_capacity(parser.page_count() as usize);

    for page_num in parser.pages() {
        let text = match parser.page_text(page_num) {
            Ok(text) => text,
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("failed to extract text from page {}: {}", page_num, e);
                String::new()
            }
            Err(e) => return Err(e),
        };
        pages.push(PageText::new(page_num, text));
    }

    Ok(pages)
}

/// Detect tables across the whole document and persist each as CSV.
///
/// Tables are numbered 1..=M in page-then-position order and written to
/// `table_{n}.csv` in the output directory, overwriting any previous run.
/// A document with no tables returns an empty vector.
pub fn extract_tables<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Vec<TableRecord>> {
    let parser = PdfParser::open(path)?;
    let detector = TableDetector::with_options(options.table.clone());
    fs::create_dir_all(&options.output_dir)?;

    let mut records = Vec::new();
    for page_num in parser.pages() {
        let spans = parser.page_spans(page_num)?;
        for table in detector.detect(&spans) {
            let number = records.len() as u32 + 1;
            let csv_path = options.output_dir.join(TableRecord::csv_file_name(number));
            write_table_csv(&table, &csv_path)?;
            log::info!(
                "table {} ({}x{}) written to {}",
                number,
                table.row_count(),
                table.column_count(),
                csv_path.display()
            );
            records.push(TableRecord {
                number,
                table,
                csv_path,
            });
        }
    }

    Ok(records)
}

/// Extract embedded images page by page, persist each, and OCR it.
///
/// Images are written to `image_{page}_{index}.{ext}` in the output
/// directory, re-read as a decoded raster to verify the file, then fed to
/// the OCR engine. Records come back in page-then-image order. A document
/// with no images returns an empty vector.
pub fn extract_images<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<Vec<OcrRecord>> {
    let parser = PdfParser::open(path)?;
    let engine = options.ocr.enabled.then(|| OcrEngine::with_options(&options.ocr));
    fs::create_dir_all(&options.output_dir)?;

    let mut records = Vec::new();
    for page_num in parser.pages() {
        for page_image in parser.page_images(page_num)? {
            let image_path = persist_image(&page_image, &options.output_dir)?;

            // Round-trip through the decoder to catch images the raster
            // libraries (and therefore the OCR engine) cannot read.
            if page_image.encoding != ImageEncoding::Jpeg2000 {
                image::open(&image_path)?;
            }

            let ocr_text = match &engine {
                Some(engine) => engine.recognize(&image_path)?,
                None => String::new(),
            };

            records.push(OcrRecord {
                page_number: page_image.page_number,
                image_path,
                ocr_text,
            });
        }
    }

    Ok(records)
}

/// Run all three extractors in order against one input path.
pub fn extract_all<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<ExtractionReport> {
    let path = path.as_ref();

    log::info!("extracting text from {}", path.display());
    let pages = extract_text(path, options)?;

    log::info!("extracting tables from {}", path.display());
    let tables = extract_tables(path, options)?;

    log::info!("extracting images from {}", path.display());
    let images = extract_images(path, options)?;

    Ok(ExtractionReport {
        pages,
        tables,
        images,
    })
}

/// Write one detected table as a headerless CSV file.
fn write_table_csv(table: &crate::model::Table, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for row in &table.rows {
        writer.write_record(&row.cells)?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist an extracted image under its deterministic file name.
///
/// JPEG and JPEG 2000 streams are complete files and are written as-is;
/// raw bitmap samples are re-encoded to PNG.
fn persist_image(page_image: &PageImage, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(page_image.file_name());

    match page_image.encoding {
        ImageEncoding::Jpeg | ImageEncoding::Jpeg2000 => {
            fs::write(&path, &page_image.data)?;
        }
        ImageEncoding::Raw => {
            encode_raw_as_png(page_image, &path)?;
        }
    }

    Ok(path)
}

/// Re-encode raw image samples as PNG using the declared geometry.
fn encode_raw_as_png(page_image: &PageImage, path: &Path) -> Result<()> {
    if page_image.bits_per_component != 8 {
        return Err(Error::ImageExtract(format!(
            "unsupported bits per component: {}",
            page_image.bits_per_component
        )));
    }

    let color_space = page_image.color_space.as_deref().unwrap_or("DeviceGray");
    let dynamic = match color_space {
        "DeviceGray" | "CalGray" => {
            image::GrayImage::from_raw(page_image.width, page_image.height, page_image.data.clone())
                .map(image::DynamicImage::ImageLuma8)
        }
        "DeviceRGB" | "CalRGB" => {
            image::RgbImage::from_raw(page_image.width, page_image.height, page_image.data.clone())
                .map(image::DynamicImage::ImageRgb8)
        }
        other => {
            return Err(Error::ImageExtract(format!(
                "unsupported color space: {}",
                other
            )));
        }
    };

    let dynamic = dynamic.ok_or_else(|| {
        Error::ImageExtract(format!(
            "sample data does not match {}x{} geometry",
            page_image.width, page_image.height
        ))
    })?;

    dynamic.save(path)?;
    Ok(())
}
