use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::info;

use pdfchat_core::bridge::RenderBridge;
use pdfchat_core::node::DocumentNode;

use crate::error::RenderError;
use crate::layout::{Block, layout_document, page_margins};
use crate::styles::{Alignment, Margins, RenderStyles, Rgb, TextStyle};

/// Renders document trees to PDF bytes.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    styles: RenderStyles,
}

/// A run of text at a fixed position on a page. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSpan {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub spans: Vec<PlacedSpan>,
}

#[derive(Debug, Clone)]
struct Span {
    text: String,
    style: TextStyle,
    link: Option<String>,
    width: f32,
}

#[derive(Debug, Clone, Default)]
struct Line {
    spans: Vec<Span>,
    width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn push(&mut self, text: &str, style: TextStyle, link: &Option<String>, width: f32) {
        self.width += width;
        if let Some(last) = self.spans.last_mut()
            && last.style == style
            && last.link == *link
        {
            last.text.push_str(text);
            last.width += width;
            return;
        }
        self.spans.push(Span {
            text: text.to_string(),
            style,
            link: link.clone(),
            width,
        });
    }

    fn max_font_size(&self) -> Option<f32> {
        self.spans
            .iter()
            .map(|s| s.style.font_size)
            .reduce(f32::max)
    }
}

impl PdfRenderer {
    pub fn new(styles: RenderStyles) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &RenderStyles {
        &self.styles
    }

    /// Lay the document out onto pages without producing PDF bytes.
    pub fn paginate(&self, tree: &DocumentNode) -> Result<Vec<PageLayout>, RenderError> {
        let blocks = layout_document(tree, &self.styles)?;
        let margins = page_margins(tree).unwrap_or(self.styles.margins);
        Ok(self.place(&blocks, margins))
    }

    fn place(&self, blocks: &[Block], margins: Margins) -> Vec<PageLayout> {
        let top = self.styles.page_height - margins.top;
        let content_width = self.styles.page_width - margins.left - margins.right;
        let blank_line = self.styles.base_font_size * self.styles.line_spacing;

        let mut pages = vec![PageLayout::default()];
        let mut cursor = top;

        for block in blocks {
            cursor -= block.space_before;
            let available = (content_width - block.indent).max(1.0);
            let lines = wrap(block, available);

            if lines.is_empty() {
                cursor -= blank_line;
            }

            for line in lines {
                let size = line.max_font_size().unwrap_or(self.styles.base_font_size);
                let height = size * self.styles.line_spacing;

                let page_has_content = pages.last().is_some_and(|p| !p.spans.is_empty());
                if cursor - height < margins.bottom && page_has_content {
                    pages.push(PageLayout::default());
                    cursor = top;
                }

                let baseline = cursor - size;
                let offset = match block.alignment {
                    Alignment::Left => 0.0,
                    Alignment::Center => ((available - line.width) / 2.0).max(0.0),
                    Alignment::Right => (available - line.width).max(0.0),
                };
                let mut x = margins.left + block.indent + offset;

                if let Some(page) = pages.last_mut() {
                    for span in line.spans {
                        let width = span.width;
                        page.spans.push(PlacedSpan {
                            x,
                            y: baseline,
                            width,
                            text: span.text,
                            style: span.style,
                            link: span.link,
                        });
                        x += width;
                    }
                }
                cursor -= height;
            }

            cursor -= block.space_after;
        }

        pages
    }

    fn write(&self, pages: &[PageLayout]) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let fonts = [
            ("F1", "Helvetica"),
            ("F2", "Helvetica-Bold"),
            ("F3", "Helvetica-Oblique"),
            ("F4", "Helvetica-BoldOblique"),
        ];
        let mut font_dict = lopdf::Dictionary::new();
        for (key, base_font) in fonts {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font,
                "Encoding" => "WinAnsiEncoding",
            });
            font_dict.set(key, font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for page in pages {
            let page_id = self.write_page(&mut doc, pages_id, page)?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    self.styles.page_width.into(),
                    self.styles.page_height.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf)?;
        Ok(buf)
    }

    fn write_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        page: &PageLayout,
    ) -> Result<ObjectId, RenderError> {
        let mut operations = Vec::new();
        let mut annots: Vec<Object> = Vec::new();

        for span in &page.spans {
            let Rgb(r, g, b) = span.style.color;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![font_key(&span.style).into(), span.style.font_size.into()],
            ));
            operations.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            operations.push(Operation::new("Td", vec![span.x.into(), span.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(&span.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));

            if span.style.underline {
                let y = span.y - span.style.font_size * 0.15;
                operations.extend([
                    Operation::new("q", vec![]),
                    Operation::new("RG", vec![r.into(), g.into(), b.into()]),
                    Operation::new("w", vec![0.6_f32.into()]),
                    Operation::new("m", vec![span.x.into(), y.into()]),
                    Operation::new("l", vec![(span.x + span.width).into(), y.into()]),
                    Operation::new("S", vec![]),
                    Operation::new("Q", vec![]),
                ]);
            }

            if let Some(uri) = &span.link {
                let size = span.style.font_size;
                let annot_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => vec![
                        span.x.into(),
                        (span.y - size * 0.25).into(),
                        (span.x + span.width).into(),
                        (span.y + size * 0.85).into(),
                    ],
                    "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                    "A" => dictionary! {
                        "S" => "URI",
                        "URI" => Object::string_literal(uri.as_bytes().to_vec()),
                    },
                });
                annots.push(annot_id.into());
            }
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        Ok(doc.add_object(page_dict))
    }
}

impl RenderBridge for PdfRenderer {
    type Error = RenderError;

    fn render(&self, tree: &DocumentNode) -> Result<Vec<u8>, RenderError> {
        let pages = self.paginate(tree)?;
        let links = pages
            .iter()
            .flat_map(|p| &p.spans)
            .filter(|s| s.link.is_some())
            .count();
        let bytes = self.write(&pages)?;
        info!(pages = pages.len(), links, bytes = bytes.len(), "PDF rendered");
        Ok(bytes)
    }
}

fn font_key(style: &TextStyle) -> &'static str {
    match (style.bold, style.italics) {
        (false, false) => "F1",
        (true, false) => "F2",
        (false, true) => "F3",
        (true, true) => "F4",
    }
}

/// Greedy word wrap. Explicit newlines always break.
fn wrap(block: &Block, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::default();

    for run in &block.runs {
        for (i, part) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(std::mem::take(&mut line));
            }
            for word in part.split_inclusive(' ') {
                let width = text_width(word, &run.style);
                if !line.is_empty() && line.width + width > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                line.push(word, run.style, &run.link, width);
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Approximate Helvetica advance width in points.
pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | ' ' => 0.28,
            'f' | 't' | 'r' | 'I' | '[' | ']' | '(' | ')' | '-' => 0.35,
            'm' | 'w' | 'M' | 'W' => 0.83,
            'A'..='Z' => 0.68,
            _ => 0.55,
        })
        .sum();
    let factor = if style.bold { 1.06 } else { 1.0 };
    em * style.font_size * factor
}

/// Encode text for the base-14 fonts' WinAnsi encoding; anything outside it
/// becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
