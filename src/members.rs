//! Location and parsing of the constants, fields, constructors and methods of a page.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::ParseOptions;
use crate::doc_text::extract_doc;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::markup::{normalized_text, select_single, selector};
use crate::model::{FieldDeclaration, MethodDeclaration, TypeName};
use crate::signature::{parse_field_signature, parse_method_signature};

static CONSTANT_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^public static final (?P<type>int|String) (?P<name>\w+)$")
		.expect("constant signature pattern")
});
static INT_VALUE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^Constant Value: (?P<value>-?\d+) \(0x[0-9a-fA-F]+\)$").expect("int value pattern")
});
static STRING_VALUE: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"^Constant Value: (?P<value>"\w+")$"#).expect("string value pattern")
});

static JD_CONTENT: Lazy<Selector> = Lazy::new(|| selector("div#jd-content"));
static PRE_SIGNATURE: Lazy<Selector> = Lazy::new(|| selector("pre.api-signature"));
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static GOOGLE_CONSTANTS: Lazy<Selector> = Lazy::new(|| selector("section#constants > div.jd-details"));
static GOOGLE_METHODS: Lazy<Selector> =
	Lazy::new(|| selector("section#public-methods > div.jd-details"));
static DETAILS_TITLE: Lazy<Selector> = Lazy::new(|| selector(".jd-details-title"));
static DETAILS_TYPE: Lazy<Selector> = Lazy::new(|| selector(".jd-details-title span.normal"));
static DETAILS_NAME: Lazy<Selector> = Lazy::new(|| selector(".jd-details-title strong"));
static DETAILS_VALUE: Lazy<Selector> =
	Lazy::new(|| selector("div.jd-tagdata > span:not(.jd-tagdescr)"));

/// Member sections of an Android-layout page, announced by HTML comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	/// `<!-- Constants -->`
	Constants,
	/// `<!-- Fields -->`
	Fields,
	/// `<!-- Public ctors -->`
	Constructors,
	/// `<!-- Public methdos -->`, spelled as the site spells it.
	Methods,
}

impl Section {
	/// Map a comment label to the section it opens.
	pub fn from_marker(label: &str) -> Option<Self> {
		match label {
			"Constants" => Some(Self::Constants),
			"Fields" => Some(Self::Fields),
			"Public ctors" => Some(Self::Constructors),
			"Public methdos" => Some(Self::Methods),
			_ => None,
		}
	}
}

/// Members found on one page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Members {
	/// Constants and fields.
	pub fields: Vec<FieldDeclaration>,
	/// Constructors and methods.
	pub methods: Vec<MethodDeclaration>,
}

/// Parse every member section of a page.
pub fn parse_members(html: &Html, layout: Layout, options: ParseOptions) -> Result<Members> {
	match layout {
		Layout::Android => parse_android_members(html, options),
		Layout::Google => parse_google_members(html, options),
	}
}

/// Map a constant's declared type name onto a type.
fn field_type(name: &str) -> Result<TypeName> {
	match name {
		"int" => Ok(TypeName::simple("int")),
		"long" => Ok(TypeName::simple("long")),
		"String" => Ok(TypeName::simple("java.lang.String")),
		other => Err(Error::UnsupportedFieldType(other.to_string())),
	}
}

fn parse_android_members(html: &Html, options: ParseOptions) -> Result<Members> {
	let content = select_single(html.root_element(), &JD_CONTENT, "div#jd-content")?;
	let mut members = Members::default();
	let mut section = None;

	for child in content.children() {
		match child.value() {
			Node::Comment(comment) => {
				if let Some(next) = Section::from_marker(comment.trim()) {
					debug!(section = ?next, "entering member section");
					section = Some(next);
				}
			}
			Node::Element(el) if el.name() == "div" => {
				let (Some(section), Some(block)) = (section, ElementRef::wrap(child)) else {
					continue;
				};
				match section {
					Section::Constants => members.fields.push(parse_android_constant(block)?),
					Section::Fields => {
						let signature = select_single(block, &PRE_SIGNATURE, "pre.api-signature")?;
						let doc = extract_doc(block, Layout::Android);
						members
							.fields
							.push(parse_field_signature(signature, doc, options)?);
					}
					Section::Constructors | Section::Methods => {
						let signature = select_single(block, &PRE_SIGNATURE, "pre.api-signature")?;
						let doc = extract_doc(block, Layout::Android);
						members.methods.push(parse_method_signature(
							signature,
							doc,
							section == Section::Constructors,
							options,
						)?);
					}
				}
			}
			_ => {}
		}
	}

	Ok(members)
}

fn parse_android_constant(block: ElementRef<'_>) -> Result<FieldDeclaration> {
	let signature = normalized_text(select_single(block, &PRE_SIGNATURE, "pre.api-signature")?);
	let captures = CONSTANT_SIGNATURE
		.captures(&signature)
		.ok_or_else(|| Error::PatternMismatch {
			pattern: "constant signature",
			text: signature.clone(),
		})?;
	let type_name = &captures["type"];
	let name = &captures["name"];

	let value_pattern: &Regex = match type_name {
		"int" => &INT_VALUE,
		"String" => &STRING_VALUE,
		other => return Err(Error::UnsupportedFieldType(other.to_string())),
	};
	let value_line = block
		.select(&PARAGRAPH)
		.last()
		.map(normalized_text)
		.unwrap_or_default();
	let value = value_pattern
		.captures(&value_line)
		.ok_or_else(|| Error::PatternMismatch {
			pattern: "constant value",
			text: format!("{name}: {value_line}"),
		})?["value"]
		.to_string();

	debug!(name = %name, value = %value, "parsed constant");
	let mut field = FieldDeclaration::constant(name, field_type(type_name)?, value);
	field.doc = extract_doc(block, Layout::Android);
	Ok(field)
}

fn parse_google_members(html: &Html, options: ParseOptions) -> Result<Members> {
	let mut members = Members::default();

	for element in html.select(&GOOGLE_CONSTANTS) {
		let declared = normalized_text(select_single(
			element,
			&DETAILS_TYPE,
			".jd-details-title span.normal",
		)?);
		let type_name = declared.split(' ').next_back().unwrap_or_default();
		let name = normalized_text(select_single(
			element,
			&DETAILS_NAME,
			".jd-details-title strong",
		)?);
		let value = normalized_text(select_single(
			element,
			&DETAILS_VALUE,
			"div.jd-tagdata > span:not(.jd-tagdescr)",
		)?);

		debug!(name = %name, value = %value, "parsed constant");
		let mut field = FieldDeclaration::constant(name, field_type(type_name)?, value);
		field.doc = extract_doc(element, Layout::Google);
		members.fields.push(field);
	}

	for element in html.select(&GOOGLE_METHODS) {
		let title = select_single(element, &DETAILS_TITLE, ".jd-details-title")?;
		let doc = extract_doc(element, Layout::Google);
		members
			.methods
			.push(parse_method_signature(title, doc, false, options)?);
	}

	Ok(members)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{BodyPolicy, Modifiers};

	fn android(content: &str) -> Result<Members> {
		let page = format!("<div id=\"jd-content\">{content}</div>");
		parse_members(
			&Html::parse_document(&page),
			Layout::Android,
			ParseOptions::default(),
		)
	}

	#[test]
	fn android_int_constant() {
		let members = android(concat!(
			"<!-- Constants -->",
			"<div><pre class=\"api-signature\">public static final int MAX_VALUE</pre>",
			"<div class=\"jd-tagdescr\"><p>Largest value.</p></div>",
			"<p>Constant Value: 42 (0x2a)</p></div>",
		))
		.unwrap();
		assert_eq!(
			members.fields,
			vec![FieldDeclaration {
				name: "MAX_VALUE".into(),
				ty: TypeName::simple("int"),
				modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
				value: Some("42".into()),
				doc: "Largest value.".into(),
			}]
		);
	}

	#[test]
	fn android_string_constant() {
		let members = android(concat!(
			"<!-- Constants -->",
			"<div><pre class=\"api-signature\">public static final String EXTRA_NAME</pre>",
			"<p>Constant Value: \"extra_name\"</p></div>",
		))
		.unwrap();
		assert_eq!(members.fields[0].ty, TypeName::simple("java.lang.String"));
		assert_eq!(members.fields[0].value.as_deref(), Some("\"extra_name\""));
	}

	#[test]
	fn android_constant_without_value_fails() {
		let err = android(concat!(
			"<!-- Constants -->",
			"<div><pre class=\"api-signature\">public static final int FLAG</pre>",
			"<p>Constant Value: 0x10</p></div>",
		))
		.unwrap_err();
		assert!(matches!(err, Error::PatternMismatch { pattern: "constant value", .. }));
	}

	#[test]
	fn android_unsupported_constant_signature_fails() {
		let err = android(concat!(
			"<!-- Constants -->",
			"<div><pre class=\"api-signature\">public static final float RATIO</pre>",
			"<p>Constant Value: 1.5</p></div>",
		))
		.unwrap_err();
		assert!(matches!(err, Error::PatternMismatch { pattern: "constant signature", .. }));
	}

	#[test]
	fn android_sections_route_members() {
		let members = android(concat!(
			"<div><pre class=\"api-signature\">ignored before any marker</pre></div>",
			"<!-- Fields -->",
			"<div><pre class=\"api-signature\">public int count</pre></div>",
			"<!-- Public ctors -->",
			"<div><pre class=\"api-signature\">public Foo ()</pre></div>",
			"<!-- Public methdos -->",
			"<div><pre class=\"api-signature\">public abstract void run (int times)</pre>",
			"<div class=\"jd-tagdescr\"><p>Runs.</p></div></div>",
			"<!-- Public methods -->",
		))
		.unwrap();

		assert_eq!(members.fields.len(), 1);
		assert_eq!(members.fields[0].name, "count");
		assert_eq!(members.fields[0].value, None);

		assert_eq!(members.methods.len(), 2);
		assert!(members.methods[0].is_constructor());
		assert_eq!(members.methods[0].return_type, None);
		assert_eq!(members.methods[1].name.as_deref(), Some("run"));
		assert_eq!(members.methods[1].body, BodyPolicy::Abstract);
		assert_eq!(members.methods[1].doc, "Runs.");
	}

	#[test]
	fn android_linked_array_members_parse() {
		let members = android(concat!(
			"<!-- Fields -->",
			"<div><pre class=\"api-signature\">public static final ",
			"<a href=\"/reference/java/lang/String.html\">String</a>[] KEYS</pre></div>",
			"<!-- Public methdos -->",
			"<div><pre class=\"api-signature\">public void log (",
			"<a href=\"/reference/java/lang/Object.html\">Object</a>... args)</pre></div>",
		))
		.unwrap();
		assert_eq!(members.fields[0].ty, TypeName::simple("java.lang.String[]"));
		assert_eq!(members.fields[0].name, "KEYS");
		assert_eq!(
			members.methods[0].parameters[0].ty,
			TypeName::simple("java.lang.Object...")
		);
	}

	#[test]
	fn misspelled_marker_is_the_one_recognised() {
		assert_eq!(Section::from_marker("Public methdos"), Some(Section::Methods));
		assert_eq!(Section::from_marker("Public methods"), None);
	}

	#[test]
	fn google_constants_and_methods() {
		let page = concat!(
			"<section id=\"constants\"><div class=\"jd-details\">",
			"<h3 class=\"jd-details-title\"><span class=\"normal\">public static final long</span> <strong>TIMEOUT</strong></h3>",
			"<div class=\"jd-tagdata\"><span class=\"jd-tagdescr\">Timeout.</span><span>30000</span></div>",
			"<p>Timeout in ms.</p>",
			"</div></section>",
			"<section id=\"public-methods\"><div class=\"jd-details\">",
			"<h3 class=\"jd-details-title\"><span class=\"normal\">public abstract ",
			"<a href=\"/android/reference/com/google/android/gms/tasks/Task.html\">Task</a>&lt;",
			"<a href=\"/android/reference/java/lang/Void.html\">Void</a>&gt;</span> ",
			"<strong>signOut</strong> ()</h3>",
			"<p>Signs out.</p>",
			"</div></section>",
		);
		let members = parse_members(
			&Html::parse_document(page),
			Layout::Google,
			ParseOptions::default(),
		)
		.unwrap();

		assert_eq!(members.fields.len(), 1);
		assert_eq!(members.fields[0].name, "TIMEOUT");
		assert_eq!(members.fields[0].ty, TypeName::simple("long"));
		assert_eq!(members.fields[0].value.as_deref(), Some("30000"));
		assert_eq!(members.fields[0].doc, "Timeout in ms.");

		let method = &members.methods[0];
		assert_eq!(method.name.as_deref(), Some("signOut"));
		assert_eq!(
			method.return_type.as_ref().map(|ty| ty.to_string()).as_deref(),
			Some("com.google.android.gms.tasks.Task<java.lang.Void>")
		);
		assert_eq!(method.doc, "Signs out.");
	}

	#[test]
	fn google_unsupported_constant_type_fails() {
		let page = concat!(
			"<section id=\"constants\"><div class=\"jd-details\">",
			"<h3 class=\"jd-details-title\"><span class=\"normal\">public static final double</span> <strong>PI</strong></h3>",
			"<div class=\"jd-tagdata\"><span>3.14</span></div>",
			"</div></section>",
		);
		let err = parse_members(
			&Html::parse_document(page),
			Layout::Google,
			ParseOptions::default(),
		)
		.unwrap_err();
		assert!(matches!(err, Error::UnsupportedFieldType(ref ty) if ty == "double"));
	}
}
