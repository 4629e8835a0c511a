//! Positioned text extraction from page content streams.
//!
//! The table detector works on text spans with coordinates, which plain
//! text extraction does not provide. This module walks a page's content
//! stream and produces one [`TextSpan`] per shown string, tracking the
//! text matrix for position and decoding bytes through the font's
//! encoding where one is available.

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// A run of text with its position on the page.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The decoded text content.
    pub text: String,
    /// X position of the left edge, in PDF points.
    pub x: f32,
    /// Y position of the baseline, in PDF points.
    pub y: f32,
    /// Estimated width of the run.
    pub width: f32,
    /// Effective font size in points.
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span, estimating width from character count and font size.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }
}

/// Extract positioned text spans from one page.
pub fn extract_spans(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<TextSpan>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let content = page_content(doc, page_id)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let content =
        lopdf::content::Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut state = TextState::default();

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.matrix = TextMatrix::default();
            }
            "ET" => state.in_text = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        state.font_name = name.clone();
                    }
                    state.font_size = number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    state.matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    state.matrix.set(
                        number(&op.operands[0]).unwrap_or(1.0),
                        number(&op.operands[1]).unwrap_or(0.0),
                        number(&op.operands[2]).unwrap_or(0.0),
                        number(&op.operands[3]).unwrap_or(1.0),
                        number(&op.operands[4]).unwrap_or(0.0),
                        number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => state.matrix.next_line(),
            "Tj" => {
                if state.in_text {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        let text = decode_with_font(doc, &fonts, &state.font_name, bytes);
                        push_span(&mut spans, &state, text);
                    }
                }
            }
            "TJ" => {
                if state.in_text {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let text = decode_tj_array(doc, &fonts, &state.font_name, items);
                        push_span(&mut spans, &state, text);
                    }
                }
            }
            "'" | "\"" => {
                state.matrix.next_line();
                if state.in_text {
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(idx) {
                        let text = decode_with_font(doc, &fonts, &state.font_name, bytes);
                        push_span(&mut spans, &state, text);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Collect and decompress the page's content stream(s).
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        // A page without a content stream has no text.
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string()));
            }
            Err(Error::PdfParse("Invalid content stream".to_string()))
        }
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

#[derive(Default)]
struct TextState {
    in_text: bool,
    font_name: Vec<u8>,
    font_size: f32,
    matrix: TextMatrix,
}

fn push_span(spans: &mut Vec<TextSpan>, state: &TextState, text: String) {
    if text.trim().is_empty() {
        return;
    }
    let (x, y) = state.matrix.position();
    let effective_size = state.font_size * state.matrix.scale();
    spans.push(TextSpan::new(text, x, y, effective_size));
}

/// Decode string bytes through the page font's encoding, falling back to
/// byte-level heuristics when the font is unavailable.
fn decode_with_font(
    doc: &LopdfDocument,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    bytes: &[u8],
) -> String {
    if let Some(font) = fonts.get(font_name) {
        if let Ok(enc) = font.get_font_encoding(doc) {
            if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                return text;
            }
        }
    }
    decode_bytes_fallback(bytes)
}

/// Decode a TJ operand array: strings interleaved with kerning
/// adjustments. Adjustments beyond ~200/1000 em usually mark word gaps.
fn decode_tj_array(
    doc: &LopdfDocument,
    fonts: &std::collections::BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    font_name: &[u8],
    items: &[Object],
) -> String {
    const SPACE_THRESHOLD: f32 = 200.0;

    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_with_font(doc, fonts, font_name, bytes));
            }
            Object::Integer(n) => {
                if -(*n as f32) > SPACE_THRESHOLD && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > SPACE_THRESHOLD && !combined.ends_with(' ') {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Byte-level decoding when no font encoding is available: UTF-16BE with
/// BOM, then UTF-8, then Latin-1.
fn decode_bytes_fallback(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|c| c.len() == 2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Text matrix tracking for Td/TD/Tm/T* operators.
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; TL is rare enough in practice to ignore here.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
