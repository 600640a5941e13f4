use pdfchat_core::annotate::annotate;
use pdfchat_core::bridge::RenderBridge;
use pdfchat_core::node::DocumentNode;
use pdfchat_core::rewrite::rewrite;
use pdfchat_render::PdfRenderer;
use pdfchat_render::error::RenderError;
use pdfchat_render::layout::layout_document;
use pdfchat_render::styles::{Alignment, Margins, RenderStyles, Rgb};
use serde_json::json;

fn letter() -> DocumentNode {
    annotate(&DocumentNode::from_json(json!({
        "content": [
            { "text": "Offer Letter", "style": "header" },
            "Dear [Candidate Name],",
            {
                "text": ["We are pleased to offer you the role of ", { "text": "[Job Title]", "bold": true }, "."],
                "margin": [0, 10, 0, 10]
            },
            { "ul": ["Salary: [Salary]", "Start date: [Start Date]"] },
            { "ol": ["Sign", "Return"] },
            { "table": { "body": [["Name", "[Candidate Name]"], ["Team", "Platform"]] } },
            { "image": "data:image/png;base64,AAAA" }
        ],
        "styles": {
            "header": { "fontSize": 20, "bold": true, "alignment": "center" }
        },
        "defaultStyle": { "fontSize": 11 }
    })))
}

#[test]
fn named_and_default_styles_apply() {
    let blocks = layout_document(&letter(), &RenderStyles::default()).unwrap();

    let header = &blocks[0];
    assert_eq!(header.text(), "Offer Letter");
    assert_eq!(header.alignment, Alignment::Center);
    assert_eq!(header.runs[0].style.font_size, 20.0);
    assert!(header.runs[0].style.bold);

    let greeting = &blocks[1];
    assert_eq!(greeting.runs[0].style.font_size, 11.0);
    assert!(!greeting.runs[0].style.bold);
}

#[test]
fn placeholders_become_linked_runs() {
    let styles = RenderStyles::default();
    let blocks = layout_document(&letter(), &styles).unwrap();

    let greeting = &blocks[1];
    assert_eq!(greeting.text(), "Dear [Candidate Name],");
    let placeholder = &greeting.runs[1];
    assert_eq!(placeholder.text, "[Candidate Name]");
    assert_eq!(placeholder.style.color, styles.placeholder_color);
    assert!(placeholder.style.underline);
    assert_eq!(
        placeholder.link.as_deref(),
        Some("pdfchat://edit?target=%5BCandidate%20Name%5D")
    );
    assert!(greeting.runs[0].link.is_none());

    let offer = &blocks[2];
    let title = offer.runs.iter().find(|r| r.text == "[Job Title]").unwrap();
    assert!(title.style.bold);
    assert!(title.link.is_some());
    assert_eq!(offer.space_before, 10.0);
}

#[test]
fn lists_and_tables_are_flattened() {
    let blocks = layout_document(&letter(), &RenderStyles::default()).unwrap();
    let texts: Vec<String> = blocks.iter().map(|b| b.text()).collect();

    assert!(texts.contains(&"\u{2022} Salary: [Salary]".to_string()));
    assert!(texts.contains(&"2. Return".to_string()));
    assert!(texts.contains(&"Name | [Candidate Name]".to_string()));
    assert!(texts.contains(&"Team | Platform".to_string()));
    assert!(blocks.iter().all(|b| !b.text().contains("base64")));

    let bullet = blocks.iter().find(|b| b.text().starts_with('\u{2022}')).unwrap();
    assert!(bullet.indent > 0.0);
}

#[test]
fn bare_content_is_accepted() {
    let tree = annotate(&DocumentNode::from_json(json!(["Hello [Name]", "Bye"])));
    let blocks = layout_document(&tree, &RenderStyles::default()).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].text(), "Hello [Name]");
}

#[test]
fn mapping_without_content_is_an_error() {
    let tree = DocumentNode::from_json(json!({ "styles": {} }));
    assert!(matches!(
        PdfRenderer::default().render(&tree),
        Err(RenderError::EmptyDocument)
    ));
}

#[test]
fn rendered_bytes_are_a_pdf_with_links() {
    let bytes = PdfRenderer::default().render(&letter()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Link"));
    assert!(text.contains("pdfchat://edit?target=%5BJob%20Title%5D"));
    assert!(text.contains("Helvetica-Bold"));
    assert!(text.contains("Offer Letter"));
}

#[test]
fn long_documents_break_across_pages() {
    let paragraphs: Vec<String> = (0..120)
        .map(|i| format!("Paragraph {i} with a [Field {i}] to fill in."))
        .collect();
    let tree = annotate(&DocumentNode::from_json(json!({ "content": paragraphs })));
    let renderer = PdfRenderer::default();

    let pages = renderer.paginate(&tree).unwrap();
    assert!(pages.len() > 1);

    let bottom = renderer.styles().margins.bottom;
    for page in &pages {
        assert!(!page.spans.is_empty());
        assert!(page.spans.iter().all(|s| s.y >= bottom));
    }
}

#[test]
fn long_lines_wrap_within_margins() {
    let sentence = "word ".repeat(200);
    let tree = DocumentNode::from_json(json!({ "content": [sentence] }));
    let renderer = PdfRenderer::default();
    let styles = renderer.styles();
    let right_edge = styles.page_width - styles.margins.right;

    let pages = renderer.paginate(&tree).unwrap();
    let spans = &pages[0].spans;
    let lines: std::collections::BTreeSet<i64> = spans.iter().map(|s| s.y as i64).collect();
    assert!(lines.len() > 1);
    assert!(spans.iter().all(|s| s.x + s.width <= right_edge + 0.5));
}

#[test]
fn page_margins_from_document_override_defaults() {
    let tree = DocumentNode::from_json(json!({
        "content": ["Top"],
        "pageMargins": [72, 100]
    }));
    let pages = PdfRenderer::default().paginate(&tree).unwrap();
    assert_eq!(pages[0].spans[0].x, 72.0);
    assert_eq!(
        Margins::from_node(&DocumentNode::from_json(json!([1, 2, 3, 4]))),
        Some(Margins {
            left: 1.0,
            top: 2.0,
            right: 3.0,
            bottom: 4.0
        })
    );
}

#[test]
fn colours_parse() {
    assert_eq!(Rgb::parse("#ff0000"), Some(Rgb(1.0, 0.0, 0.0)));
    assert_eq!(Rgb::parse("#000"), Some(Rgb::BLACK));
    assert_eq!(Rgb::parse("grey"), Some(Rgb(0.5, 0.5, 0.5)));
    assert_eq!(Rgb::parse("#12"), None);
}

#[test]
fn content_list_of_whole_placeholders_lays_out_one_block_each() {
    let tree = annotate(&DocumentNode::from_json(json!({
        "content": ["[Client Name]", "[Date]"]
    })));
    let blocks = layout_document(&tree, &RenderStyles::default()).unwrap();
    let texts: Vec<String> = blocks.iter().map(|b| b.text()).collect();
    assert_eq!(texts, vec!["[Client Name]", "[Date]"]);
    assert!(blocks.iter().all(|b| b.runs[0].link.is_some()));
}

#[test]
fn edited_placeholder_stays_in_its_paragraph() {
    let tree = annotate(&DocumentNode::from_json(json!({
        "content": ["Dear [X], welcome"]
    })));
    let edited = rewrite(&tree, "[X]", "a]b");

    let blocks = layout_document(&edited, &RenderStyles::default()).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text(), "Dear [ab], welcome");
    assert_eq!(
        blocks[0].runs[1].link.as_deref(),
        Some("pdfchat://edit?target=%5Bab%5D")
    );
}
