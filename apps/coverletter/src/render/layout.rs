//! Page layout: reflows a plain-text letter into paragraphs and places wrapped lines on pages.
//!
//! Coordinates follow PDF conventions: millimetres, origin at the bottom-left corner.
//! Layout is backend-independent; a renderer only has to draw each `PlacedLine`.

use serde::{Deserialize, Serialize};

use crate::render::font_metrics::{get_metrics, FontFamily};
use crate::render::RenderMetadata;

const PT_PER_MM: f32 = 72.0 / 25.4;
const INCH_MM: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size_pt: f32,
    pub leading_pt: f32,
    pub space_after_pt: f32,
    pub align: Align,
}

/// Page geometry plus heading/body styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub heading: TextStyle,
    pub body: TextStyle,
}

impl PageLayout {
    /// US letter, 1" margins, Helvetica 11pt body on 16pt leading.
    pub fn cover_letter() -> Self {
        Self {
            page_width_mm: 215.9,
            page_height_mm: 279.4,
            margin_mm: INCH_MM,
            heading: TextStyle {
                font: FontFamily::HelveticaBold,
                size_pt: 16.0,
                leading_pt: 20.0,
                space_after_pt: 30.0,
                align: Align::Center,
            },
            body: TextStyle {
                font: FontFamily::Helvetica,
                size_pt: 11.0,
                leading_pt: 16.0,
                space_after_pt: 12.0,
                align: Align::Left,
            },
        }
    }

    /// Generic document with a centered title: 12pt body, 6pt extra gap between paragraphs.
    pub fn titled_document() -> Self {
        let base = Self::cover_letter();
        Self {
            heading: TextStyle {
                space_after_pt: 42.0,
                ..base.heading
            },
            body: TextStyle {
                size_pt: 12.0,
                space_after_pt: 18.0,
                ..base.body
            },
            ..base
        }
    }

    pub fn for_metadata(metadata: &RenderMetadata) -> Self {
        if metadata.heading.is_some() {
            Self::titled_document()
        } else {
            Self::cover_letter()
        }
    }

    fn text_width_pt(&self) -> f32 {
        (self.page_width_mm - 2.0 * self.margin_mm) * PT_PER_MM
    }

    fn bottom_limit_pt(&self) -> f32 {
        (self.page_height_mm - self.margin_mm) * PT_PER_MM
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub font: FontFamily,
    pub size_pt: f32,
    pub x_mm: f32,
    /// Baseline, measured from the bottom edge.
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub lines: Vec<PlacedLine>,
}

/// Splits on blank lines; lines inside a paragraph are trimmed and joined with single spaces.
pub fn reflow_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}

struct Cursor<'a> {
    layout: &'a PageLayout,
    pages: Vec<PageContent>,
    /// Distance from the top edge in points.
    top_pt: f32,
}

impl<'a> Cursor<'a> {
    fn new(layout: &'a PageLayout) -> Self {
        Self {
            layout,
            pages: vec![PageContent::default()],
            top_pt: layout.margin_mm * PT_PER_MM,
        }
    }

    fn place_block(&mut self, text: &str, style: &TextStyle) {
        let metrics = get_metrics(style.font);
        let width_pt = self.layout.text_width_pt();
        let lines = metrics.wrap(text, width_pt / style.size_pt);

        for line in lines {
            let page_has_content = self.pages.last().is_some_and(|p| !p.lines.is_empty());
            if page_has_content && self.top_pt + style.leading_pt > self.layout.bottom_limit_pt() {
                self.pages.push(PageContent::default());
                self.top_pt = self.layout.margin_mm * PT_PER_MM;
            }

            let offset_pt = match style.align {
                Align::Left => 0.0,
                Align::Center => ((width_pt - metrics.measure_str(&line) * style.size_pt) / 2.0).max(0.0),
            };
            let baseline_pt = self.top_pt + style.size_pt;
            let placed = PlacedLine {
                text: line,
                font: style.font,
                size_pt: style.size_pt,
                x_mm: self.layout.margin_mm + offset_pt / PT_PER_MM,
                y_mm: self.layout.page_height_mm - baseline_pt / PT_PER_MM,
            };
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(placed);
            }
            self.top_pt += style.leading_pt;
        }
        self.top_pt += style.space_after_pt;
    }
}

/// Lays out an optional heading followed by body paragraphs. Always returns at least one page.
pub fn layout_document(
    paragraphs: &[String],
    heading: Option<&str>,
    layout: &PageLayout,
) -> Vec<PageContent> {
    let mut cursor = Cursor::new(layout);
    if let Some(heading) = heading.map(str::trim).filter(|h| !h.is_empty()) {
        cursor.place_block(heading, &layout.heading);
    }
    for paragraph in paragraphs {
        cursor.place_block(paragraph, &layout.body);
    }
    cursor.pages
}
