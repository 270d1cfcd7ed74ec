//! printpdf backend. Draws laid-out lines with the builtin Helvetica faces.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::render::font_metrics::FontFamily;
use crate::render::layout::{layout_document, reflow_paragraphs, PageLayout};
use crate::render::{DocumentRenderer, RenderError, RenderMetadata, RenderedDocument};

pub struct PrintPdfRenderer;

fn backend_error(e: printpdf::Error) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// Builtin fonts only cover a single-byte charset; map common typography to ASCII.
fn to_builtin_charset(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2022}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\t' | '\u{00A0}' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

impl DocumentRenderer for PrintPdfRenderer {
    fn name(&self) -> &'static str {
        "printpdf"
    }

    fn render(&self, text: &str, metadata: &RenderMetadata) -> Result<RenderedDocument, RenderError> {
        let layout = PageLayout::for_metadata(metadata);
        let paragraphs = reflow_paragraphs(text);
        let pages = layout_document(&paragraphs, metadata.heading.as_deref(), &layout);

        let width = Mm(layout.page_width_mm);
        let height = Mm(layout.page_height_mm);
        let (doc, first_page, first_layer) =
            PdfDocument::new(metadata.document_title.as_str(), width, height, "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(backend_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(backend_error)?;

        for (index, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, format!("Page {} Layer 1", index + 1))
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for line in &page.lines {
                let font = match line.font {
                    FontFamily::Helvetica => &regular,
                    FontFamily::HelveticaBold => &bold,
                };
                layer.use_text(
                    to_builtin_charset(&line.text),
                    line.size_pt,
                    Mm(line.x_mm),
                    Mm(line.y_mm),
                    font,
                );
            }
        }

        let bytes = doc.save_to_bytes().map_err(backend_error)?;
        Ok(RenderedDocument {
            bytes,
            pages: pages.len(),
        })
    }
}
