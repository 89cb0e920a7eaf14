//! Parsing of a page's class header: modifiers, kind, superclass and interfaces.

use once_cell::sync::Lazy;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::generic::TypeStack;
use crate::layout::Layout;
use crate::markup::{class_reference, normalize_whitespace, normalized_text, select_single, selector};
use crate::model::{ClassDeclaration, ClassKind, Modifiers, TypeName};

static API_SIGNATURE: Lazy<Selector> = Lazy::new(|| selector("code.api-signature"));
static JD_HEADER: Lazy<Selector> = Lazy::new(|| selector("#jd-header"));

/// Supertypes every declaration has implicitly; they are never recorded.
const IMPLICIT_SUPERTYPES: [&str; 2] = ["java.lang.Object", "java.lang.annotation.Annotation"];

/// Everything a class header declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassHeader {
	/// Declared modifiers.
	pub modifiers: Modifiers,
	/// Declaration kind, if the header named one.
	pub kind: Option<ClassKind>,
	/// Types following `extends`, in order.
	pub extends: Vec<TypeName>,
	/// Types following `implements`, in order.
	pub implements: Vec<TypeName>,
}

impl ClassHeader {
	/// Build an empty declaration for `name` from this header.
	///
	/// Interfaces and annotations record `extends` targets as interfaces; a class keeps the
	/// last `extends` target as its superclass. Annotations never carry `abstract`.
	pub fn into_declaration(self, name: &str) -> Result<ClassDeclaration> {
		let kind = self.kind.ok_or_else(|| Error::UnresolvedKind {
			page: name.to_string(),
		})?;

		let mut decl = ClassDeclaration::new(name, kind);
		decl.modifiers = self.modifiers;
		match kind {
			ClassKind::Class => decl.superclass = self.extends.into_iter().last(),
			ClassKind::Interface | ClassKind::Annotation => {
				for ty in self.extends {
					decl.add_interface(ty);
				}
			}
		}
		if kind == ClassKind::Annotation {
			decl.modifiers.remove(Modifiers::ABSTRACT);
		}
		for ty in self.implements {
			decl.add_interface(ty);
		}
		Ok(decl)
	}
}

/// Which supertype slot incoming type names are collected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
	Extends,
	Implements,
}

/// Accumulates a whitespace- or comma-separated list of possibly generic type names.
#[derive(Debug)]
struct SupertypeList {
	pending: Option<TypeStack>,
	types: Vec<TypeName>,
	options: ParseOptions,
}

impl SupertypeList {
	fn new(options: ParseOptions) -> Self {
		Self {
			pending: None,
			types: Vec::new(),
			options,
		}
	}

	fn name(&mut self, name: String) -> Result<()> {
		if let Some(stack) = &mut self.pending
			&& (stack.current().name().is_none() || stack.in_argument())
		{
			return stack.set_name(name);
		}
		self.commit()?;
		let mut stack = TypeStack::new(self.options.max_generic_depth);
		stack.set_name(name)?;
		self.pending = Some(stack);
		Ok(())
	}

	fn open(&mut self) -> Result<()> {
		match &mut self.pending {
			Some(stack) => stack.open(),
			None => Err(Error::UnexpectedToken {
				token: "<".into(),
				state: "Supertypes",
			}),
		}
	}

	fn close(&mut self) -> Result<()> {
		match &mut self.pending {
			Some(stack) => stack.close(),
			None => Err(Error::UnexpectedCloseGeneric),
		}
	}

	fn comma(&mut self) -> Result<()> {
		match &mut self.pending {
			Some(stack) if stack.in_argument() => stack.next_argument(),
			_ => self.commit(),
		}
	}

	/// Finish the pending type, if any. Inside an open argument list this is a no-op.
	fn commit(&mut self) -> Result<()> {
		if let Some(stack) = &self.pending
			&& stack.in_argument()
		{
			return Ok(());
		}
		let Some(stack) = self.pending.take() else {
			return Ok(());
		};
		let ty = stack.materialize()?;
		if !IMPLICIT_SUPERTYPES.contains(&ty.name.as_str()) {
			self.types.push(ty);
		}
		Ok(())
	}

	fn finish(mut self) -> Result<Vec<TypeName>> {
		if let Some(stack) = self.pending.take() {
			let ty = stack.materialize()?;
			if !IMPLICIT_SUPERTYPES.contains(&ty.name.as_str()) {
				self.types.push(ty);
			}
		}
		Ok(self.types)
	}
}

/// Collects the `extends`/`implements` lists of one header.
struct Supertypes {
	target: Option<Target>,
	extends: SupertypeList,
	implements: SupertypeList,
}

impl Supertypes {
	fn new(options: ParseOptions) -> Self {
		Self {
			target: None,
			extends: SupertypeList::new(options),
			implements: SupertypeList::new(options),
		}
	}

	fn list(&mut self, token: &str) -> Result<&mut SupertypeList> {
		match self.target {
			Some(Target::Extends) => Ok(&mut self.extends),
			Some(Target::Implements) => Ok(&mut self.implements),
			None => Err(Error::UnexpectedToken {
				token: token.to_string(),
				state: "Header",
			}),
		}
	}

	fn switch(&mut self, target: Target) -> Result<()> {
		if let Ok(list) = self.list("") {
			list.commit()?;
		}
		self.target = Some(target);
		Ok(())
	}

	/// Feed a text run, splitting it on whitespace, `,`, `<` and `>`.
	///
	/// Words other than `extends` and `implements` are type names when `bare_names` is set and
	/// a failure otherwise.
	fn text(&mut self, text: &str, bare_names: bool) -> Result<()> {
		let mut word = String::new();
		for ch in text.chars() {
			match ch {
				'<' | '>' | ',' => {
					self.word(&mut word, bare_names)?;
					let list = self.list(&ch.to_string())?;
					match ch {
						'<' => list.open()?,
						'>' => list.close()?,
						_ => list.comma()?,
					}
				}
				c if c.is_whitespace() => self.word(&mut word, bare_names)?,
				c => word.push(c),
			}
		}
		self.word(&mut word, bare_names)
	}

	fn word(&mut self, word: &mut String, bare_names: bool) -> Result<()> {
		if word.is_empty() {
			return Ok(());
		}
		let word = std::mem::take(word);
		match word.as_str() {
			"extends" => self.switch(Target::Extends),
			"implements" => self.switch(Target::Implements),
			_ if !bare_names => Err(Error::UnexpectedToken {
				token: word,
				state: "Supertypes",
			}),
			_ => self.list(&word)?.name(word),
		}
	}

	fn link(&mut self, anchor: ElementRef<'_>) -> Result<()> {
		let ty = class_reference(anchor)?.type_name()?;
		self.list(&ty.name)?.name(ty.name)
	}

	fn finish(self, header: &mut ClassHeader) -> Result<()> {
		header.extends.extend(self.extends.finish()?);
		header.implements.extend(self.implements.finish()?);
		Ok(())
	}
}

/// Parse the class header of a page in the given layout.
pub fn parse_header(html: &Html, layout: Layout, options: ParseOptions) -> Result<ClassHeader> {
	let header = match layout {
		Layout::Android => parse_android_header(html, options)?,
		Layout::Google => parse_google_header(html, options)?,
	};
	debug!(
		modifiers = %header.modifiers,
		kind = ?header.kind,
		extends = header.extends.len(),
		implements = header.implements.len(),
		"parsed class header"
	);
	Ok(header)
}

fn parse_android_header(html: &Html, options: ParseOptions) -> Result<ClassHeader> {
	let mut header = ClassHeader::default();
	let mut supertypes = Supertypes::new(options);

	for element in html.select(&API_SIGNATURE) {
		let Some(first) = element.children().next() else {
			continue;
		};
		let Some(text) = first.value().as_text() else {
			continue;
		};
		let run = text.trim();
		if run.is_empty() {
			continue;
		}

		let target = if run.starts_with("extends") {
			Target::Extends
		} else if run.starts_with("implements") {
			Target::Implements
		} else {
			parse_modifier_record(run, &mut header)?;
			continue;
		};

		supertypes.switch(target)?;
		for child in element.children().skip(1) {
			match child.value() {
				Node::Text(text) => supertypes.text(text, true)?,
				Node::Element(el) if el.name() == "a" => {
					if let Some(anchor) = ElementRef::wrap(child) {
						supertypes.link(anchor)?;
					}
				}
				Node::Element(_) => {
					if let Some(other) = ElementRef::wrap(child) {
						supertypes.text(&normalized_text(other), true)?;
					}
				}
				_ => {}
			}
		}
		supertypes.list("")?.commit()?;
	}

	supertypes.finish(&mut header)?;
	Ok(header)
}

/// Parse the fixed five-line record `access / static / final / abstract / kind`.
fn parse_modifier_record(run: &str, header: &mut ClassHeader) -> Result<()> {
	let slots: Vec<&str> = run.split('\n').map(str::trim).collect();
	let slot = |index: usize, name: &'static str| {
		slots
			.get(index)
			.copied()
			.ok_or(Error::MissingSlot { slot: name })
	};

	match slot(0, "access modifier")? {
		"public" => header.modifiers |= Modifiers::PUBLIC,
		other => {
			return Err(Error::UnknownModifier {
				slot: "access modifier",
				value: other.to_string(),
			});
		}
	}

	let optional = [
		(1, "static", Modifiers::STATIC),
		(2, "final", Modifiers::FINAL),
		(3, "abstract", Modifiers::ABSTRACT),
	];
	for (index, keyword, flag) in optional {
		match slot(index, keyword)? {
			"" => {}
			value if value == keyword => header.modifiers |= flag,
			other => {
				return Err(Error::UnknownModifier {
					slot: keyword,
					value: other.to_string(),
				});
			}
		}
	}

	let kind = slot(4, "kind")?;
	header.kind = Some(ClassKind::from_keyword(kind).ok_or_else(|| Error::UnknownKind(kind.to_string()))?);
	Ok(())
}

/// Progress through a `#jd-header` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderPhase {
	Keywords,
	Name,
	Supertypes,
}

fn parse_google_header(html: &Html, options: ParseOptions) -> Result<ClassHeader> {
	let root = select_single(html.root_element(), &JD_HEADER, "#jd-header")?;
	let mut header = ClassHeader::default();
	let mut supertypes = Supertypes::new(options);
	let mut phase = HeaderPhase::Keywords;

	for child in root.children() {
		match (phase, child.value()) {
			(HeaderPhase::Keywords, Node::Text(text)) => {
				let mut any = false;
				for word in text.split_whitespace() {
					any = true;
					if let Some(flag) = Modifiers::from_keyword(word) {
						header.modifiers |= flag;
					} else if let Some(kind) = ClassKind::from_keyword(word) {
						header.kind = Some(kind);
					} else {
						return Err(Error::UnknownModifier {
							slot: "keyword",
							value: word.to_string(),
						});
					}
				}
				if any {
					phase = HeaderPhase::Name;
				}
			}
			(HeaderPhase::Keywords | HeaderPhase::Name, Node::Element(_)) => {
				phase = HeaderPhase::Supertypes;
			}
			(HeaderPhase::Name, Node::Text(text)) if text.trim().is_empty() => {}
			(HeaderPhase::Name, Node::Text(text)) => {
				return Err(Error::UnexpectedToken {
					token: normalize_whitespace(text),
					state: "Name",
				});
			}
			(HeaderPhase::Supertypes, Node::Text(text)) => supertypes.text(text, false)?,
			(HeaderPhase::Supertypes, Node::Element(el)) if el.name() != "br" => {
				if let Some(element) = ElementRef::wrap(child) {
					if el.name() == "a" {
						supertypes.link(element)?;
					} else {
						supertypes.text(&normalized_text(element), false)?;
					}
				}
			}
			_ => {}
		}
	}

	supertypes.finish(&mut header)?;
	Ok(header)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn android(body: &str) -> Result<ClassHeader> {
		parse_header(&Html::parse_document(body), Layout::Android, ParseOptions::default())
	}

	fn google(body: &str) -> Result<ClassHeader> {
		parse_header(&Html::parse_document(body), Layout::Google, ParseOptions::default())
	}

	#[test]
	fn android_modifier_record() {
		let header = android(
			"<code class=\"api-signature\">public\nstatic\nfinal\n\nclass\n</code><h1>Foo</h1>",
		)
		.unwrap();
		assert_eq!(
			header.modifiers,
			Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL
		);
		assert_eq!(header.kind, Some(ClassKind::Class));
	}

	#[test]
	fn android_extends_drops_object() {
		let header = android(concat!(
			"<code class=\"api-signature\">public\n\n\nabstract\nclass\n</code>",
			"<code class=\"api-signature\">extends ",
			"<a href=\"/reference/java/lang/Object.html\">Object</a> ",
			"<a href=\"/reference/com/example/MyBase.html\">MyBase</a></code>",
		))
		.unwrap();
		let decl = header.into_declaration("com.example.Foo").unwrap();
		assert_eq!(decl.superclass, Some(TypeName::simple("com.example.MyBase")));
		assert_eq!(decl.modifiers, Modifiers::PUBLIC | Modifiers::ABSTRACT);
	}

	#[test]
	fn annotation_supertype_is_implicit_in_both_layouts() {
		let android_header = android(concat!(
			"<code class=\"api-signature\">public\n\n\nabstract\n@interface\n</code>",
			"<code class=\"api-signature\">implements ",
			"<a href=\"/reference/java/lang/annotation/Annotation.html\">Annotation</a></code>",
		))
		.unwrap();
		let google_header = google(concat!(
			"<div id=\"jd-header\">public @interface\n<h1>Marker</h1>",
			"\nimplements\n<a href=\"/android/reference/java/lang/annotation/Annotation.html\">Annotation</a>\n</div>",
		))
		.unwrap();

		for header in [android_header, google_header] {
			assert_eq!(header.kind, Some(ClassKind::Annotation));
			assert!(header.implements.is_empty());
			let decl = header.into_declaration("com.example.Marker").unwrap();
			assert_eq!(decl.interfaces, Vec::<TypeName>::new());
			assert_eq!(decl.superclass, None);
		}
	}

	#[test]
	fn android_implements_deduplicates() {
		let header = android(concat!(
			"<code class=\"api-signature\">public\n\n\n\nclass\n</code>",
			"<code class=\"api-signature\">implements ",
			"<a href=\"/reference/android/os/Parcelable.html\">Parcelable</a> ",
			"<a href=\"/reference/java/io/Closeable.html\">Closeable</a> ",
			"<a href=\"/reference/android/os/Parcelable.html\">Parcelable</a></code>",
		))
		.unwrap();
		let decl = header.into_declaration("com.example.Foo").unwrap();
		assert_eq!(
			decl.interfaces,
			vec![
				TypeName::simple("android.os.Parcelable"),
				TypeName::simple("java.io.Closeable")
			]
		);
	}

	#[test]
	fn android_unknown_slot_names_the_slot() {
		let err = android("<code class=\"api-signature\">public\nsealed\n\n\nclass\n</code>").unwrap_err();
		assert!(matches!(err, Error::UnknownModifier { slot: "static", ref value } if value == "sealed"));

		let err = android("<code class=\"api-signature\">protected\n\n\n\nclass\n</code>").unwrap_err();
		assert!(matches!(err, Error::UnknownModifier { slot: "access modifier", .. }));

		let err = android("<code class=\"api-signature\">public\n\n\n\nenum\n</code>").unwrap_err();
		assert!(matches!(err, Error::UnknownKind(ref kind) if kind == "enum"));
	}

	#[test]
	fn android_short_record_is_reported() {
		let err = android("<code class=\"api-signature\">public\nclass</code>").unwrap_err();
		assert!(matches!(err, Error::UnknownModifier { slot: "static", .. }));

		let err = android("<code class=\"api-signature\">public\n\nfinal</code>").unwrap_err();
		assert!(matches!(err, Error::MissingSlot { slot: "abstract" }));
	}

	#[test]
	fn annotation_kind_drops_abstract() {
		let header = android("<code class=\"api-signature\">public\n\n\nabstract\n@interface\n</code>").unwrap();
		let decl = header.into_declaration("com.example.Marker").unwrap();
		assert_eq!(decl.kind, ClassKind::Annotation);
		assert_eq!(decl.modifiers, Modifiers::PUBLIC);
	}

	#[test]
	fn google_header_with_generic_interface() {
		let header = google(concat!(
			"<div id=\"jd-header\">public abstract class\n<h1>Foo</h1>",
			"\nextends\n<a href=\"/android/reference/com/example/Base.html\">Base</a>",
			"\n<br>\nimplements\n<a href=\"/android/reference/java/lang/Comparable.html\">Comparable</a>",
			"&lt;<a href=\"/android/reference/com/example/Foo.html\">Foo</a>&gt;",
			"\n<a href=\"/android/reference/android/os/Parcelable.html\">Parcelable</a>\n</div>",
		))
		.unwrap();
		assert_eq!(header.modifiers, Modifiers::PUBLIC | Modifiers::ABSTRACT);
		assert_eq!(header.kind, Some(ClassKind::Class));
		assert_eq!(header.extends, vec![TypeName::simple("com.example.Base")]);
		assert_eq!(
			header.implements,
			vec![
				TypeName::parameterized(
					"java.lang.Comparable",
					vec![TypeName::simple("com.example.Foo")]
				),
				TypeName::simple("android.os.Parcelable"),
			]
		);
	}

	#[test]
	fn google_interface_extends_become_interfaces() {
		let header = google(concat!(
			"<div id=\"jd-header\">public interface\n<h1>Listener</h1>",
			"\nextends\n<a href=\"/android/reference/java/util/EventListener.html\">EventListener</a>\n</div>",
		))
		.unwrap();
		let decl = header.into_declaration("com.example.Listener").unwrap();
		assert_eq!(decl.superclass, None);
		assert_eq!(decl.interfaces, vec![TypeName::simple("java.util.EventListener")]);
	}

	#[test]
	fn google_unexpected_text_fails() {
		let err = google(concat!(
			"<div id=\"jd-header\">public class\n<h1>Foo</h1>",
			"\nwith\n<a href=\"/android/reference/com/example/Base.html\">Base</a></div>",
		))
		.unwrap_err();
		assert!(matches!(err, Error::UnexpectedToken { ref token, .. } if token == "with"));
	}

	#[test]
	fn google_missing_header_fails() {
		let err = google("<div>nothing here</div>").unwrap_err();
		assert!(matches!(err, Error::ExpectedSingle { found: 0, .. }));
	}

	#[test]
	fn missing_kind_is_unresolved() {
		let err = ClassHeader::default()
			.into_declaration("com.example.Foo")
			.unwrap_err();
		assert!(matches!(err, Error::UnresolvedKind { ref page } if page == "com.example.Foo"));
	}
}
