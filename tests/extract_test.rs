//! Integration tests for the extraction pipeline.
//!
//! Test documents are generated in-memory with lopdf rather than shipped
//! as fixtures, so every test states exactly what the input contains.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdfsift::{
    extract_all, extract_images, extract_tables, extract_text, ExtractOptions, OcrEngine,
    PdfParser,
};

/// One positioned text run: (x, y, text).
type Run = (i64, i64, &'static str);

/// Build a PDF where each page shows the given runs, and save it to `path`.
fn write_pdf(path: &Path, pages: &[Vec<Run>]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for runs in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
        ];
        for (x, y, text) in runs {
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    (*x).into(),
                    (*y).into(),
                ],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encoding"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("pdf serialization");
    fs::write(path, buf).expect("writing test pdf");
}

/// Build a one-page PDF whose only content is a 2x2 grayscale image.
fn write_image_pdf(path: &Path) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        vec![0u8, 64, 128, 255],
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    100.into(),
                    0.into(),
                    0.into(),
                    100.into(),
                    72.into(),
                    600.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content encoding"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("pdf serialization");
    fs::write(path, buf).expect("writing test pdf");
}

/// Rows laid out on a grid that the stream detector should pick up.
fn table_runs() -> Vec<Run> {
    vec![
        (72, 700, "Name"),
        (200, 700, "Age"),
        (72, 685, "Alice"),
        (200, 685, "30"),
        (72, 670, "Bob"),
        (200, 670, "25"),
    ]
}

#[test]
fn text_extraction_numbers_pages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("three_pages.pdf");
    write_pdf(
        &pdf,
        &[
            vec![(72, 720, "First page body")],
            vec![(72, 720, "Second page body")],
            vec![(72, 720, "Third page body")],
        ],
    );

    let pages = extract_text(&pdf, &ExtractOptions::default()).unwrap();

    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.number, i as u32 + 1);
    }
    assert!(pages[0].text.contains("First page body"));
    assert!(pages[1].text.contains("Second page body"));
    assert!(pages[2].text.contains("Third page body"));
}

#[test]
fn content_free_page_yields_empty_record() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("blank_middle.pdf");
    write_pdf(
        &pdf,
        &[vec![(72, 720, "before")], vec![], vec![(72, 720, "after")]],
    );

    let pages = extract_text(&pdf, &ExtractOptions::default()).unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].number, 2);
    assert!(pages[1].is_empty());
    assert_eq!(pages[1].text, "");
}

#[test]
fn plain_document_has_no_tables_or_images() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("prose.pdf");
    write_pdf(&pdf, &[vec![(72, 720, "Just a paragraph of prose")]]);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new()
        .with_output_dir(out.path())
        .with_ocr(false);

    assert!(extract_tables(&pdf, &options).unwrap().is_empty());
    assert!(extract_images(&pdf, &options).unwrap().is_empty());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn table_detected_and_written_as_csv() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("table.pdf");
    write_pdf(&pdf, &[table_runs()]);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new().with_output_dir(out.path());

    let records = extract_tables(&pdf, &options).unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.number, 1);
    assert_eq!(record.table.row_count(), 3);
    assert_eq!(record.table.column_count(), 2);
    assert_eq!(record.table.rows[0].cells, vec!["Name", "Age"]);
    assert_eq!(record.table.rows[2].cells, vec!["Bob", "25"]);

    let csv = fs::read_to_string(&record.csv_path).unwrap();
    assert_eq!(csv, "Name,Age\nAlice,30\nBob,25\n");
}

#[test]
fn rerun_produces_identical_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("table.pdf");
    write_pdf(&pdf, &[table_runs()]);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new().with_output_dir(out.path());

    let first: Vec<_> = extract_tables(&pdf, &options)
        .unwrap()
        .into_iter()
        .map(|r| r.csv_path)
        .collect();
    let second: Vec<_> = extract_tables(&pdf, &options)
        .unwrap()
        .into_iter()
        .map(|r| r.csv_path)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first, vec![out.path().join("table_1.csv")]);
}

#[test]
fn table_numbers_are_unique_and_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("two_tables.pdf");
    // The same grid on two pages: two tables, numbered across the document.
    write_pdf(&pdf, &[table_runs(), table_runs()]);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new().with_output_dir(out.path());

    let records = extract_tables(&pdf, &options).unwrap();

    let numbers: Vec<u32> = records.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert!(out.path().join("table_1.csv").exists());
    assert!(out.path().join("table_2.csv").exists());
}

#[test]
fn embedded_image_is_persisted_and_decodable() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("with_image.pdf");
    write_image_pdf(&pdf);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new()
        .with_output_dir(out.path())
        .with_ocr(false);

    let records = extract_images(&pdf, &options).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].page_number, 1);
    assert_eq!(
        records[0].image_path.file_name().unwrap(),
        "image_1_0.png"
    );
    assert_eq!(records[0].ocr_text, "");

    let decoded = image::open(&records[0].image_path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2, 2));
}

#[test]
fn image_ocr_runs_when_engine_present() {
    if !OcrEngine::is_available() {
        eprintln!("tesseract not installed, skipping OCR integration test");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("with_image.pdf");
    write_image_pdf(&pdf);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new().with_output_dir(out.path());

    // A 2x2 gradient contains no legible glyphs; the engine must still
    // succeed and return (trimmed, likely empty) text.
    let records = extract_images(&pdf, &options).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ocr_text, records[0].ocr_text.trim());
}

#[test]
fn nonexistent_path_fails_before_producing_output() {
    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new().with_output_dir(out.path());
    let missing = out.path().join("does_not_exist.pdf");

    assert!(extract_text(&missing, &options).is_err());
    assert!(extract_tables(&missing, &options).is_err());
    assert!(extract_images(&missing, &options).is_err());
    assert!(extract_all(&missing, &options).is_err());
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn non_pdf_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("fake.pdf");
    fs::write(&fake, b"<!DOCTYPE html><html></html>").unwrap();

    assert!(extract_text(&fake, &ExtractOptions::default()).is_err());
}

#[test]
fn extract_all_renders_full_report() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("mixed.pdf");
    write_pdf(&pdf, &[vec![(72, 720, "Report body text")], table_runs()]);

    let out = tempfile::tempdir().unwrap();
    let options = ExtractOptions::new()
        .with_output_dir(out.path())
        .with_ocr(false);

    let report = extract_all(&pdf, &options).unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.tables.len(), 1);
    assert!(report.images.is_empty());

    let rendered = report.render();
    assert!(rendered.contains("--- Extracted Text ---"));
    assert!(rendered.contains("Report body text"));
    assert!(rendered.contains("Table 1:"));
    assert!(rendered.contains("--- Extracted Images and OCR ---"));
}

#[test]
fn parser_reports_document_info() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("info.pdf");
    write_pdf(&pdf, &[vec![(72, 720, "x")], vec![(72, 720, "y")]]);

    let parser = PdfParser::open(&pdf).unwrap();
    let info = parser.info();

    assert_eq!(info.page_count, 2);
    assert!(!info.encrypted);
    assert_eq!(info.pdf_version, "1.5");
}
