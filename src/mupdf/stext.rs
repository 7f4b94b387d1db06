//! Structured text helpers
//!
//! Page text is rebuilt from MuPDF's structured text one character at a
//! time, so every byte of the text the oracle sees can be traced back to a
//! box on the page.

use mupdf::{Page, TextPageOptions};

use crate::document::{Rect, Result};

/// Page text plus the box of every character in it
///
/// Lines end with `\n` and blocks with an extra `\n`; those separators have
/// no box.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub text: String,
    /// `(byte offset into text, box)` in text order
    boxes: Vec<(usize, Option<Rect>)>,
}

impl PageLayout {
    fn push(&mut self, c: char, rect: Option<Rect>) {
        self.boxes.push((self.text.len(), rect));
        self.text.push(c);
    }

    /// One box per text line covered by `text[start..end]`
    ///
    /// Boxes are in MuPDF page space: origin top-left, y grows downwards,
    /// page rotation already applied.
    pub fn line_boxes(&self, start: usize, end: usize) -> Vec<Rect> {
        let first = self.boxes.partition_point(|(offset, _)| *offset < start);
        let mut lines = Vec::new();
        let mut current: Option<Rect> = None;

        for (offset, rect) in &self.boxes[first..] {
            if *offset >= end {
                break;
            }
            match rect {
                Some(rect) => {
                    current = Some(match current {
                        Some(acc) => union(&acc, rect),
                        None => *rect,
                    });
                }
                None => lines.extend(current.take()),
            }
        }
        lines.extend(current);

        lines.into_iter().filter(|r| !r.is_empty()).collect()
    }
}

fn union(a: &Rect, b: &Rect) -> Rect {
    Rect::from_ltrb(
        a.x.min(b.x),
        a.y.min(b.y),
        a.right().max(b.right()),
        a.bottom().max(b.bottom()),
    )
}

/// Walk the structured text of a page, keeping each character's box
pub fn page_layout(page: &Page) -> Result<PageLayout> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;
    let mut layout = PageLayout::default();

    for block in text_page.blocks() {
        for line in block.lines() {
            for ch in line.chars() {
                if let Some(c) = ch.char() {
                    // Convert Quad to Rect using corner points
                    let q = ch.quad();
                    let x = q.ul.x.min(q.ll.x);
                    let y = q.ul.y.min(q.ur.y);
                    let width = (q.ur.x.max(q.lr.x) - x).max(0.0);
                    let height = (q.ll.y.max(q.lr.y) - y).max(0.0);
                    layout.push(c, Some(Rect::new(x, y, width, height)));
                }
            }
            layout.push('\n', None);
        }
        layout.push('\n', None);
    }

    Ok(layout)
}

/// Get plain text from a page (without positions)
pub fn extract_plain_text(page: &Page) -> Result<String> {
    Ok(page_layout(page)?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mupdf::SafeDocument;
    use crate::test_support::text_pdf;

    fn layout_of(pages: &[&str]) -> PageLayout {
        let doc = SafeDocument::from_bytes(text_pdf(pages)).unwrap();
        doc.with_doc(|d| page_layout(&d.load_page(0)?)).unwrap()
    }

    #[test]
    fn test_plain_text_contains_content() {
        let bytes = text_pdf(&["Hello from page one."]);
        let doc = SafeDocument::from_bytes(bytes).unwrap();

        let text = doc
            .with_doc(|d| extract_plain_text(&d.load_page(0)?))
            .unwrap();

        assert!(text.contains("Hello from page one."));
    }

    #[test]
    fn test_single_line_span_has_one_box() {
        let layout = layout_of(&["The quick brown fox jumps over the lazy dog."]);
        let start = layout.text.find("quick brown fox").unwrap();

        let boxes = layout.line_boxes(start, start + "quick brown fox".len());

        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].width > 0.0);
        assert!(boxes[0].height > 0.0);
        // First line baseline sits 72pt below the top edge
        assert!(boxes[0].y < 72.0 && boxes[0].bottom() > 66.0);
    }

    #[test]
    fn test_span_across_lines_has_box_per_line() {
        let layout = layout_of(&["First line here.\nSecond line here."]);
        let start = layout.text.find("here.").unwrap();
        let end = layout.text.find("Second").unwrap() + "Second".len();

        let boxes = layout.line_boxes(start, end);

        assert_eq!(boxes.len(), 2);
        assert!(boxes[0].bottom() <= boxes[1].y + 1.0);
    }

    #[test]
    fn test_empty_span_has_no_boxes() {
        let layout = layout_of(&["Short."]);
        assert!(layout.line_boxes(0, 0).is_empty());
    }
}
