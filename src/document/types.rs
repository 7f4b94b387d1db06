//! Core document types

use serde::Serialize;

/// Plain text of a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    /// 0-indexed page number
    pub index: usize,
    pub text: String,
}

/// Every page's text plus the concatenation sent to the oracle
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedText {
    pub pages: Vec<PageText>,
    /// Page texts in order, each followed by a newline
    pub full_text: String,
}

impl ExtractedText {
    /// Assemble from page texts in page order
    pub fn from_pages(pages: Vec<PageText>) -> Self {
        let capacity = pages.iter().map(|p| p.text.len() + 1).sum();
        let mut full_text = String::with_capacity(capacity);
        for page in &pages {
            full_text.push_str(&page.text);
            full_text.push('\n');
        }
        Self { pages, full_text }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when no page has anything but whitespace
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Rectangle in MuPDF page space (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A located occurrence of a candidate sentence on a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRegion {
    /// 0-indexed page number
    pub page: usize,
    pub rect: Rect,
    /// The candidate sentence that produced this region
    pub sentence: String,
}
