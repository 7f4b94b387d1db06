//! Fixture PDFs synthesized with lopdf

use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF with one page per entry; `\n` inside an entry starts a new line
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages, 0)
}

/// Same as [`text_pdf`] but every page carries `/Rotate rotation`
pub fn rotated_text_pdf(pages: &[&str], rotation: i64) -> Vec<u8> {
    build_pdf(pages, rotation)
}

/// A single page with no content stream text
pub fn blank_pdf() -> Vec<u8> {
    build_pdf(&[""], 0)
}

fn build_pdf(pages: &[&str], rotation: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_for(text)));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if rotation != 0 {
            page.set("Rotate", Object::Integer(rotation));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut output = Vec::new();
    doc.save_to(&mut output).expect("fixture PDF serializes");
    output
}

fn content_for(text: &str) -> Vec<u8> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut ops = String::from("BT\n/F1 12 Tf\n16 TL\n72 720 Td\n");
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            ops.push_str("T*\n");
        }
        ops.push('(');
        ops.push_str(&escape(line));
        ops.push_str(") Tj\n");
    }
    ops.push_str("ET\n");
    ops.into_bytes()
}

fn escape(line: &str) -> String {
    line.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Count `/Highlight` annotations across all pages of `bytes`
pub fn count_highlights(bytes: &[u8]) -> usize {
    highlight_rects(bytes).len()
}

/// `/Rect` of every `/Highlight` annotation, in page order
pub fn highlight_rects(bytes: &[u8]) -> Vec<[f32; 4]> {
    let doc = Document::load_mem(bytes).expect("output PDF parses");
    let mut rects = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Ok(annots) = page.get(b"Annots") else {
            continue;
        };
        let annots = match annots {
            Object::Reference(id) => doc.get_object(*id).and_then(Object::as_array),
            other => other.as_array(),
        };
        for annot in annots.into_iter().flatten() {
            let dict = match annot {
                Object::Reference(id) => doc.get_dictionary(*id),
                other => other.as_dict(),
            };
            let Ok(dict) = dict else {
                continue;
            };
            if !matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Highlight") {
                continue;
            }
            let rect: Vec<f32> = dict
                .get(b"Rect")
                .and_then(Object::as_array)
                .expect("highlight has a /Rect")
                .iter()
                .map(|v| match v {
                    Object::Integer(i) => *i as f32,
                    Object::Real(r) => *r,
                    other => panic!("non-numeric /Rect entry {:?}", other),
                })
                .collect();
            rects.push([rect[0], rect[1], rect[2], rect[3]]);
        }
    }
    rects
}
