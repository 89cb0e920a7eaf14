//! Thin helpers over the `scraper` tree used by every page parser.

use scraper::node::Node;
use scraper::{ElementRef, Selector};

use crate::error::{Error, Result};
use crate::model::ClassReference;

/// One item of a flattened signature element.
#[derive(Debug, Clone, Copy)]
pub enum Fragment<'a> {
	/// A text run outside of any anchor.
	Text(&'a str),
	/// An `<a>` element; its contents are not visited.
	Link(ElementRef<'a>),
	/// A `<br>` element.
	LineBreak,
}

/// Flatten the subtree of `root` into a document-order stream of [`Fragment`]s.
pub fn fragments(root: ElementRef<'_>) -> std::vec::IntoIter<Fragment<'_>> {
	let mut out = Vec::new();
	collect_fragments(root, &mut out);
	out.into_iter()
}

fn collect_fragments<'a>(element: ElementRef<'a>, out: &mut Vec<Fragment<'a>>) {
	for child in element.children() {
		match child.value() {
			Node::Text(text) => out.push(Fragment::Text(text)),
			Node::Element(el) => match el.name() {
				"a" => {
					if let Some(link) = ElementRef::wrap(child) {
						out.push(Fragment::Link(link));
					}
				}
				"br" => out.push(Fragment::LineBreak),
				_ => {
					if let Some(nested) = ElementRef::wrap(child) {
						collect_fragments(nested, out);
					}
				}
			},
			_ => {}
		}
	}
}

/// Parse a selector known at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
	Selector::parse(css).unwrap_or_else(|err| panic!("invalid selector `{css}`: {err}"))
}

/// Select the one element matching `selector` under `root`.
pub fn select_single<'a>(
	root: ElementRef<'a>,
	selector: &Selector,
	css: &'static str,
) -> Result<ElementRef<'a>> {
	let mut matches = root.select(selector);
	match (matches.next(), matches.next()) {
		(Some(found), None) => Ok(found),
		(first, second) => Err(Error::ExpectedSingle {
			selector: css,
			found: usize::from(first.is_some()) + usize::from(second.is_some()) + matches.count(),
		}),
	}
}

/// Collapse whitespace runs to single spaces, keeping a single leading or trailing space.
pub fn normalize_whitespace(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut in_space = false;
	for ch in text.chars() {
		if ch.is_whitespace() {
			if !in_space {
				out.push(' ');
				in_space = true;
			}
		} else {
			out.push(ch);
			in_space = false;
		}
	}
	out
}

/// Text content of an element with whitespace collapsed and trimmed.
pub fn normalized_text(element: ElementRef<'_>) -> String {
	normalize_whitespace(&element.text().collect::<String>())
		.trim()
		.to_string()
}

/// Build a [`ClassReference`] from an anchor element.
pub fn class_reference(anchor: ElementRef<'_>) -> Result<ClassReference> {
	let link = anchor
		.value()
		.attr("href")
		.ok_or_else(|| Error::MissingAttribute {
			element: anchor.value().name().to_string(),
			attribute: "href",
		})?;
	Ok(ClassReference::new(normalized_text(anchor), link))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use scraper::Html;

	use super::*;

	fn kinds(html: &str) -> Vec<String> {
		let fragment = Html::parse_fragment(html);
		let pre = fragment
			.select(&selector("pre"))
			.next()
			.expect("pre element");
		fragments(pre)
			.map(|f| match f {
				Fragment::Text(text) => format!("text:{text}"),
				Fragment::Link(link) => format!("link:{}", normalized_text(link)),
				Fragment::LineBreak => "br".to_string(),
			})
			.collect()
	}

	#[test]
	fn anchors_are_opaque_and_other_elements_transparent() {
		assert_eq!(
			kinds(r#"<pre>public <a href="/reference/Foo.html">Foo</a> <span>bar</span> ()</pre>"#),
			vec!["text:public ", "link:Foo", "text: ", "text:bar", "text: ()"]
		);
	}

	#[test]
	fn line_breaks_are_reported() {
		assert_eq!(
			kinds("<pre>@Deprecated<br>public void foo ()</pre>"),
			vec!["text:@Deprecated", "br", "text:public void foo ()"]
		);
	}

	#[test]
	fn single_selection_counts_matches() {
		let doc = Html::parse_fragment("<div><p>a</p><p>b</p></div>");
		let root = doc.root_element();
		let err = select_single(root, &selector("p"), "p").unwrap_err();
		assert!(matches!(err, Error::ExpectedSingle { found: 2, .. }));
	}

	#[test]
	fn whitespace_is_collapsed() {
		assert_eq!(normalize_whitespace("a \n\t b\u{a0}c"), "a b c");
	}
}
