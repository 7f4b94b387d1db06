//! Highlight annotation writer
//!
//! Appends one `/Highlight` annotation per [`MatchRegion`] to the page's
//! `/Annots` array and serializes the result.
//!
//! MuPDF reports regions in its own page space (origin top-left, y grows
//! downwards, `/Rotate` applied, relative to the CropBox). Annotations live
//! in PDF user space, so each region is mapped back through the page's
//! visible box and rotation first.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use thiserror::Error;

use crate::document::{MatchRegion, Rect};

/// US Letter, used when a page tree carries neither CropBox nor MediaBox
const DEFAULT_PAGE_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Page tree depth after which attribute inheritance gives up
const MAX_TREE_DEPTH: usize = 32;

const HIGHLIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.0];
const HIGHLIGHT_OPACITY: f32 = 0.4;
const ANNOTATION_AUTHOR: &str = "Highlighter";

/// Annotation error types
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Failed to load PDF for annotation: {0}")]
    Load(String),

    #[error("Page {0} not found in page tree")]
    PageNotFound(usize),

    #[error("Failed to update page {page}: {reason}")]
    Page { page: usize, reason: String },

    #[error("Failed to serialize annotated PDF: {0}")]
    Write(String),
}

/// Visible box and rotation of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// `[x0, y0, x1, y1]` in user space, normalized so x0 < x1 and y0 < y1
    pub bbox: [f32; 4],
    /// One of 0, 90, 180, 270
    pub rotation: i64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            bbox: DEFAULT_PAGE_BOX,
            rotation: 0,
        }
    }
}

/// Map a MuPDF page-space rect to a user-space `[llx, lly, urx, ury]`
pub fn to_user_space(rect: &Rect, geometry: &PageGeometry) -> [f32; 4] {
    let [x0, y0, x1, y1] = geometry.bbox;
    let point = |u: f32, v: f32| -> (f32, f32) {
        match geometry.rotation {
            90 => (x0 + v, y0 + u),
            180 => (x1 - u, y0 + v),
            270 => (x1 - v, y1 - u),
            _ => (x0 + u, y1 - v),
        }
    };

    let (ax, ay) = point(rect.x, rect.y);
    let (bx, by) = point(rect.right(), rect.bottom());
    [ax.min(bx), ay.min(by), ax.max(bx), ay.max(by)]
}

/// Write a highlight annotation for every region and return the new PDF bytes
///
/// With no regions the input bytes are returned untouched.
pub fn apply_highlights(pdf_bytes: &[u8], regions: &[MatchRegion]) -> Result<Vec<u8>, AnnotateError> {
    if regions.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut doc = Document::load_mem(pdf_bytes).map_err(|e| AnnotateError::Load(e.to_string()))?;

    // get_pages() is keyed by 1-based page number
    let pages: HashMap<usize, ObjectId> = doc
        .get_pages()
        .into_iter()
        .map(|(number, id)| (number as usize - 1, id))
        .collect();

    let mut geometry_cache: HashMap<usize, PageGeometry> = HashMap::new();

    for region in regions {
        let page_id = *pages
            .get(&region.page)
            .ok_or(AnnotateError::PageNotFound(region.page))?;

        let geometry = *geometry_cache
            .entry(region.page)
            .or_insert_with(|| page_geometry(&doc, page_id));

        let rect = to_user_space(&region.rect, &geometry);
        let annot = highlight_annotation(page_id, rect, &region.sentence);
        let annot_id = doc.add_object(Object::Dictionary(annot));

        add_annotation_to_page(&mut doc, page_id, annot_id).map_err(|reason| {
            AnnotateError::Page {
                page: region.page,
                reason,
            }
        })?;
    }

    tracing::debug!(
        regions = regions.len(),
        pages = geometry_cache.len(),
        "Highlight annotations written"
    );

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| AnnotateError::Write(e.to_string()))?;

    Ok(output)
}

fn highlight_annotation(page_id: ObjectId, rect: [f32; 4], sentence: &str) -> Dictionary {
    let [llx, lly, urx, ury] = rect;

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Highlight".to_vec()));
    annot.set("P", Object::Reference(page_id));
    annot.set(
        "Rect",
        Object::Array(vec![
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(urx),
            Object::Real(ury),
        ]),
    );
    // QuadPoints: upper-left, upper-right, lower-left, lower-right
    annot.set(
        "QuadPoints",
        Object::Array(vec![
            Object::Real(llx),
            Object::Real(ury),
            Object::Real(urx),
            Object::Real(ury),
            Object::Real(llx),
            Object::Real(lly),
            Object::Real(urx),
            Object::Real(lly),
        ]),
    );
    annot.set(
        "C",
        Object::Array(HIGHLIGHT_COLOR.iter().map(|c| Object::Real(*c)).collect()),
    );
    annot.set("CA", Object::Real(HIGHLIGHT_OPACITY));
    // Print flag
    annot.set("F", Object::Integer(4));
    annot.set("T", text_string(ANNOTATION_AUTHOR));
    annot.set("Contents", text_string(sentence));
    annot
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), String> {
    // /Annots may be an indirect array shared through a reference
    let annots_ref = doc
        .get_dictionary(page_id)
        .map_err(|e| e.to_string())?
        .get(b"Annots")
        .ok()
        .and_then(|obj| obj.as_reference().ok());

    if let Some(array_id) = annots_ref {
        if let Ok(Object::Array(arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page_dict = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| e.to_string())?;

    if let Ok(Object::Array(arr)) = page_dict.get_mut(b"Annots") {
        arr.push(Object::Reference(annot_id));
    } else {
        page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
    }
    Ok(())
}

fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    let bbox = inherited(doc, page_id, b"CropBox")
        .or_else(|| inherited(doc, page_id, b"MediaBox"))
        .and_then(|obj| as_box(doc, obj))
        .unwrap_or(DEFAULT_PAGE_BOX);

    let rotation = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj).as_i64().ok())
        .map(|r| r.rem_euclid(360))
        .filter(|r| r % 90 == 0)
        .unwrap_or(0);

    PageGeometry { bbox, rotation }
}

/// Look up a page attribute, walking `/Parent` for inheritable keys
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn as_box(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let values: Vec<f32> = resolve(doc, obj)
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| as_number(resolve(doc, v)))
        .collect();

    match values.as_slice() {
        [a, b, c, d] => Some([a.min(*c), b.min(*d), a.max(*c), b.max(*d)]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{count_highlights, rotated_text_pdf, text_pdf};

    fn region(page: usize, sentence: &str) -> MatchRegion {
        MatchRegion {
            page,
            rect: Rect::new(72.0, 60.0, 200.0, 14.0),
            sentence: sentence.to_string(),
        }
    }

    #[test]
    fn test_no_regions_returns_input_unchanged() {
        let input = text_pdf(&["Nothing to see."]);
        let output = apply_highlights(&input, &[]).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_writes_one_annotation_per_region() {
        let input = text_pdf(&["Page one.", "Page two."]);
        let regions = vec![region(0, "Page one."), region(1, "Page two."), region(1, "Page two.")];

        let output = apply_highlights(&input, &regions).unwrap();

        assert_eq!(count_highlights(&output), 3);
        // Still a structurally valid PDF
        assert!(Document::load_mem(&output).is_ok());
    }

    #[test]
    fn test_unknown_page_is_an_error() {
        let input = text_pdf(&["Only page."]);
        let result = apply_highlights(&input, &[region(5, "Only page.")]);
        assert!(matches!(result, Err(AnnotateError::PageNotFound(5))));
    }

    #[test]
    fn test_unrotated_mapping_flips_y() {
        let geometry = PageGeometry {
            bbox: [0.0, 0.0, 612.0, 792.0],
            rotation: 0,
        };
        let rect = Rect::new(72.0, 60.0, 100.0, 12.0);
        assert_eq!(to_user_space(&rect, &geometry), [72.0, 720.0, 172.0, 732.0]);
    }

    #[test]
    fn test_mapping_honors_crop_origin() {
        let geometry = PageGeometry {
            bbox: [10.0, 20.0, 210.0, 320.0],
            rotation: 0,
        };
        let rect = Rect::new(0.0, 0.0, 50.0, 10.0);
        assert_eq!(to_user_space(&rect, &geometry), [10.0, 310.0, 60.0, 320.0]);
    }

    #[test]
    fn test_rotated_mappings() {
        let bbox = [0.0, 0.0, 612.0, 792.0];
        let rect = Rect::new(0.0, 0.0, 10.0, 20.0);

        let r90 = PageGeometry { bbox, rotation: 90 };
        assert_eq!(to_user_space(&rect, &r90), [0.0, 0.0, 20.0, 10.0]);

        let r180 = PageGeometry { bbox, rotation: 180 };
        assert_eq!(to_user_space(&rect, &r180), [602.0, 0.0, 612.0, 20.0]);

        let r270 = PageGeometry { bbox, rotation: 270 };
        assert_eq!(to_user_space(&rect, &r270), [592.0, 782.0, 612.0, 792.0]);
    }

    #[test]
    fn test_geometry_inherited_from_page_tree() {
        let bytes = rotated_text_pdf(&["Rotated."], 90);
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();

        let geometry = page_geometry(&doc, page_id);

        assert_eq!(geometry.bbox, [0.0, 0.0, 612.0, 792.0]);
        assert_eq!(geometry.rotation, 90);
    }

    #[test]
    fn test_non_ascii_contents_use_utf16() {
        match text_string("café") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(bytes.len(), 2 + 4 * 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            text_string("plain"),
            Object::String(_, StringFormat::Literal)
        ));
    }
}
