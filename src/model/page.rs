//! Per-page text records.

use serde::{Deserialize, Serialize};

/// Plain text extracted from a single page.
///
/// Created once per page during text extraction and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed, in document order).
    pub number: u32,

    /// The page's plain text with surrounding whitespace trimmed.
    pub text: String,
}

impl PageText {
    /// Create a record, trimming surrounding whitespace.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into().trim().to_string(),
        }
    }

    /// A page with no extractable text still produces a record.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text_trims() {
        let page = PageText::new(1, "  hello\n");
        assert_eq!(page.number, 1);
        assert_eq!(page.text, "hello");
    }

    #[test]
    fn test_blank_page_record() {
        let page = PageText::new(3, "   \n\t");
        assert!(page.is_empty());
        assert_eq!(page.text, "");
    }
}
