//! Document-level metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata read from the document trailer's Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// PDF version (e.g. "1.7").
    pub pdf_version: String,

    /// Total number of pages.
    pub page_count: u32,

    /// Whether the document is encrypted.
    pub encrypted: bool,

    /// Document title.
    pub title: Option<String>,

    /// Document author.
    pub author: Option<String>,

    /// Creator application.
    pub creator: Option<String>,

    /// PDF producer.
    pub producer: Option<String>,

    /// Creation date.
    pub created: Option<DateTime<Utc>>,

    /// Last modification date.
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// Create metadata with just the PDF version filled in.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_version() {
        let info = DocumentInfo::with_version("1.5");
        assert_eq!(info.pdf_version, "1.5");
        assert_eq!(info.page_count, 0);
        assert!(info.title.is_none());
    }
}
