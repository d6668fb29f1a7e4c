//! Encodes a [`DocumentLayout`] as a PDF using `lopdf`.
//!
//! Each layout page becomes one page object with a single Flate-compressed
//! content stream. Both faces are base-14 fonts, so nothing is embedded.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use crate::layout::font_metrics::{win_ansi_code, FontWeight};
use crate::layout::formatter::{Page, Run};
use crate::layout::DocumentLayout;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF library error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error while encoding PDF: {0}")]
    Io(#[from] std::io::Error),
}

const PRODUCER: &str = concat!("resume-preview-api ", env!("CARGO_PKG_VERSION"));

/// Resource name of the font used for a given weight.
fn font_resource(weight: FontWeight) -> &'static [u8] {
    match weight {
        FontWeight::Normal => b"F1",
        FontWeight::Bold => b"F2",
    }
}

/// Serializes the layout to PDF bytes. `title` goes into the document info dictionary.
pub fn encode_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for weight in [FontWeight::Normal, FontWeight::Bold] {
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => weight.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font_resource(weight), font_id);
    }
    let resources_id = document.add_object(dictionary! { "Font" => fonts });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = page_content(page, layout.page_height);
        let compressed = deflate(&content.encode()?)?;
        let content_id = document.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        ));

        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                layout.page_width.into(),
                layout.page_height.into(),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    document.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let info_id = document.add_object(dictionary! {
        "Title" => Object::String(utf16_text_string(title), StringFormat::Hexadecimal),
        "Producer" => Object::string_literal(PRODUCER),
    });
    document.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    document.save_to(&mut bytes)?;
    Ok(bytes)
}

fn page_content(page: &Page, page_height: f32) -> Content {
    let mut operations = Vec::with_capacity(page.runs.len() * 5);
    for run in &page.runs {
        push_run(&mut operations, run, page_height);
    }
    Content { operations }
}

fn push_run(operations: &mut Vec<Operation>, run: &Run, page_height: f32) {
    let pdf_y = page_height - run.y;
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![
            Object::Name(font_resource(run.style.weight).to_vec()),
            run.style.size.into(),
        ],
    ));
    operations.push(Operation::new("Td", vec![run.x.into(), pdf_y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi_bytes(&run.text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Encodes text for a WinAnsiEncoding font. Characters outside the code page become `?`.
pub fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_code(c).unwrap_or(b'?'))
        .collect()
}

/// UTF-16BE with a byte-order mark, the text-string form viewers read for
/// document properties.
fn utf16_text_string(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}
