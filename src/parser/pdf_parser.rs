//! PDF document access built on lopdf.

use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::sniff_pdf;
use crate::error::{Error, Result};
use crate::model::{DocumentInfo, ImageEncoding, PageImage};

use super::layout::{self, TextSpan};

/// Read-only handle over a loaded PDF document.
pub struct PdfParser {
    doc: LopdfDocument,
}

impl PdfParser {
    /// Open a PDF file.
    ///
    /// Fails with [`Error::UnknownFormat`] when the file is not a PDF and
    /// with [`Error::Encrypted`] when it cannot be decrypted.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_pdf(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc })
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::sniff_pdf_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Page numbers in document order (1-based).
    pub fn pages(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    /// Whether the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Plain text of one page, untrimmed.
    pub fn page_text(&self, page_num: u32) -> Result<String> {
        self.ensure_page(page_num)?;
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page_num, e)))
    }

    /// Positioned text spans of one page, for table detection.
    pub fn page_spans(&self, page_num: u32) -> Result<Vec<TextSpan>> {
        let page_id = self.ensure_page(page_num)?;
        layout::extract_spans(&self.doc, page_id)
    }

    /// Embedded image XObjects of one page, in resource-dictionary order.
    ///
    /// Records carry the 1-based page number and a 0-based per-page index.
    pub fn page_images(&self, page_num: u32) -> Result<Vec<PageImage>> {
        let page_id = self.ensure_page(page_num)?;
        let mut images = Vec::new();

        for object_id in self.image_xobject_ids(page_id) {
            match self.extract_image(object_id, page_num, images.len() as u32) {
                Ok(image) => images.push(image),
                Err(e) => {
                    // Non-raster or malformed XObjects are skipped, not
                    // fatal: form XObjects share the same dictionary slot.
                    log::debug!("skipping XObject {:?} on page {}: {}", object_id, page_num, e);
                }
            }
        }

        Ok(images)
    }

    /// Document metadata from the trailer Info dictionary.
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo::with_version(self.doc.version.to_string());
        info.page_count = self.page_count();
        info.encrypted = self.doc.is_encrypted();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(dict) = self.doc.get_dictionary(*info_ref) {
                info.title = dict_string(dict, b"Title");
                info.author = dict_string(dict, b"Author");
                info.creator = dict_string(dict, b"Creator");
                info.producer = dict_string(dict, b"Producer");
                info.created = dict_string(dict, b"CreationDate").and_then(|s| parse_pdf_date(&s));
                info.modified = dict_string(dict, b"ModDate").and_then(|s| parse_pdf_date(&s));
            }
        }

        info
    }

    /// Resolve a 1-based page number to its object id.
    fn ensure_page(&self, page_num: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))
    }

    /// Object ids of the page's image XObjects, in dictionary order.
    fn image_xobject_ids(&self, page_id: ObjectId) -> Vec<ObjectId> {
        let mut ids = Vec::new();

        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return ids;
        };
        let Ok(resources) = page_dict.get(b"Resources") else {
            return ids;
        };
        let resources = match resources {
            Object::Reference(r) => match self.doc.get_dictionary(*r) {
                Ok(d) => d,
                Err(_) => return ids,
            },
            Object::Dictionary(d) => d,
            _ => return ids,
        };
        let Ok(xobjects) = resources.get(b"XObject") else {
            return ids;
        };
        let xobjects = match xobjects {
            Object::Reference(r) => match self.doc.get_dictionary(*r) {
                Ok(d) => d,
                Err(_) => return ids,
            },
            Object::Dictionary(d) => d,
            _ => return ids,
        };

        for (_, obj) in xobjects.iter() {
            if let Ok(obj_ref) = obj.as_reference() {
                ids.push(obj_ref);
            }
        }
        ids
    }

    /// Extract one image XObject's pixel data and properties.
    fn extract_image(&self, object_id: ObjectId, page_num: u32, index: u32) -> Result<PageImage> {
        let object = self
            .doc
            .get_object(object_id)
            .map_err(|e| Error::ImageExtract(e.to_string()))?;

        let Object::Stream(stream) = object else {
            return Err(Error::ImageExtract("not a stream XObject".to_string()));
        };
        let dict = &stream.dict;

        match dict.get(b"Subtype").and_then(|s| s.as_name()) {
            Ok(b"Image") => {}
            _ => return Err(Error::ImageExtract("not an image XObject".to_string())),
        }

        let width = dict
            .get(b"Width")
            .ok()
            .and_then(|w| w.as_i64().ok())
            .ok_or_else(|| Error::ImageExtract("image without Width".to_string()))?
            as u32;
        let height = dict
            .get(b"Height")
            .ok()
            .and_then(|h| h.as_i64().ok())
            .ok_or_else(|| Error::ImageExtract("image without Height".to_string()))?
            as u32;
        let bits_per_component = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|b| b.as_i64().ok())
            .unwrap_or(8) as u8;

        let color_space = dict.get(b"ColorSpace").ok().and_then(|cs| match cs {
            Object::Name(n) => Some(String::from_utf8_lossy(n).to_string()),
            Object::Array(arr) => arr
                .first()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string()),
            _ => None,
        });

        let filters = image_filters(dict);
        let (encoding, data) = if filters.iter().any(|f| f == "DCTDecode") {
            // JPEG streams are complete files; keep the bytes as-is.
            (ImageEncoding::Jpeg, stream.content.clone())
        } else if filters.iter().any(|f| f == "JPXDecode") {
            (ImageEncoding::Jpeg2000, stream.content.clone())
        } else {
            let decoded = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            (ImageEncoding::Raw, decoded)
        };

        Ok(PageImage {
            page_number: page_num,
            index,
            data,
            encoding,
            width,
            height,
            bits_per_component,
            color_space,
        })
    }
}

/// Filter names on an image stream; a single name or an array of names.
fn image_filters(dict: &lopdf::Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).to_string()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .collect(),
        _ => vec![],
    }
}

/// Read a text string from a PDF dictionary, handling UTF-16BE and Latin-1.
fn dict_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => {
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks(2)
                    .filter(|c| c.len() == 2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSS...).
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:")?;
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6).and_then(|m| m.parse().ok()).unwrap_or(1);
    let day: u32 = s.get(6..8).and_then(|d| d.parse().ok()).unwrap_or(1);
    let hour: u32 = s.get(8..10).and_then(|h| h.parse().ok()).unwrap_or(0);
    let minute: u32 = s.get(10..12).and_then(|m| m.parse().ok()).unwrap_or(0);
    let second: u32 = s.get(12..14).and_then(|x| x.parse().ok()).unwrap_or(0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
