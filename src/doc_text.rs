//! Extraction of member documentation into javadoc-style text.

use once_cell::sync::Lazy;
use scraper::node::Node;
use scraper::{ElementRef, Selector};

use crate::layout::Layout;
use crate::markup::{normalize_whitespace, selector};
use crate::xref::link_symbol;

static GOOGLE_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| selector("p, ul"));
static ANDROID_PARAGRAPHS: Lazy<Selector> = Lazy::new(|| selector("div.jd-tagdescr > p"));
static ANCHORS: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Convert the documentation paragraphs under `root` into normalised text.
///
/// Links become inline `<a href="...">text</a>` spans, code spans wrapping exactly one link
/// become `{@link qualified.Name}` markers, other code spans and lists are copied as markup.
/// Iteration stops at the first empty paragraph.
pub fn extract_doc(root: ElementRef<'_>, layout: Layout) -> String {
	let paragraphs = match layout {
		Layout::Google => &*GOOGLE_PARAGRAPHS,
		Layout::Android => &*ANDROID_PARAGRAPHS,
	};

	let mut out = String::new();
	for paragraph in root
		.select(paragraphs)
		.take_while(|p| p.children().next().is_some())
	{
		match paragraph.value().name() {
			"p" => append_paragraph(&mut out, paragraph),
			"ul" => out.push_str(paragraph.html().trim()),
			_ => {}
		}
		out.push('\n');
	}

	out.trim().to_string()
}

fn append_paragraph(out: &mut String, paragraph: ElementRef<'_>) {
	for child in paragraph.children() {
		match child.value() {
			Node::Text(text) => out.push_str(&normalize_whitespace(text)),
			Node::Element(_) => {
				if let Some(element) = ElementRef::wrap(child) {
					append_inline(out, element);
				}
			}
			_ => {}
		}
	}
}

fn append_inline(out: &mut String, element: ElementRef<'_>) {
	match element.value().name() {
		"a" => {
			let href = element.value().attr("href").unwrap_or_default();
			let text: String = element.text().collect();
			out.push_str(&format!(r#"<a href="{href}">{text}</a>"#));
		}
		"code" => {
			let mut anchors = element.select(&ANCHORS);
			match (anchors.next(), anchors.next()) {
				(Some(anchor), None) => {
					let href = anchor.value().attr("href").unwrap_or_default();
					out.push_str(&format!("{{@link {}}}", link_symbol(href)));
				}
				_ => out.push_str(element.html().trim()),
			}
		}
		_ => out.push_str(&normalize_whitespace(&element.text().collect::<String>())),
	}
}
