//! Declaration types produced by the parsers and handed to emitters.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

bitflags! {
	/// Modifier keywords attached to a declaration.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
	pub struct Modifiers: u16 {
		/// `public`
		const PUBLIC = 1 << 0;
		/// `protected`
		const PROTECTED = 1 << 1;
		/// `private`
		const PRIVATE = 1 << 2;
		/// `abstract`
		const ABSTRACT = 1 << 3;
		/// `static`
		const STATIC = 1 << 4;
		/// `final`
		const FINAL = 1 << 5;
		/// `synchronized`
		const SYNCHRONIZED = 1 << 6;
	}
}

const MODIFIER_KEYWORDS: [(&str, Modifiers); 7] = [
	("public", Modifiers::PUBLIC),
	("protected", Modifiers::PROTECTED),
	("private", Modifiers::PRIVATE),
	("abstract", Modifiers::ABSTRACT),
	("static", Modifiers::STATIC),
	("final", Modifiers::FINAL),
	("synchronized", Modifiers::SYNCHRONIZED),
];

impl Modifiers {
	/// Look up the flag for a modifier keyword.
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		MODIFIER_KEYWORDS
			.iter()
			.find(|(word, _)| *word == keyword)
			.map(|(_, flag)| *flag)
	}

	/// Keywords for the set flags, in canonical declaration order.
	pub fn keywords(self) -> Vec<&'static str> {
		MODIFIER_KEYWORDS
			.iter()
			.filter(|(_, flag)| self.contains(*flag))
			.map(|(word, _)| *word)
			.collect()
	}
}

impl fmt::Display for Modifiers {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.keywords().join(" "))
	}
}

/// A possibly parameterised type name such as `java.util.List<java.lang.String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
	/// Base name, qualified when it came from a cross-reference.
	pub name: String,
	/// Type arguments; empty for a non-generic type.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub arguments: Vec<TypeName>,
}

impl TypeName {
	/// A non-generic type name.
	pub fn simple(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			arguments: Vec::new(),
		}
	}

	/// A parameterised type name.
	pub fn parameterized(name: impl Into<String>, arguments: Vec<TypeName>) -> Self {
		Self {
			name: name.into(),
			arguments,
		}
	}

	/// Whether the type carries type arguments.
	pub fn is_generic(&self) -> bool {
		!self.arguments.is_empty()
	}

	/// Last dotted segment of the base name.
	pub fn simple_name(&self) -> &str {
		simple_name(&self.name)
	}

	/// Name of the enclosing class, when the base name denotes a nested class.
	pub fn enclosing_name(&self) -> Option<String> {
		enclosing_name(&self.name)
	}
}

impl fmt::Display for TypeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)?;
		if !self.is_generic() {
			return Ok(());
		}
		f.write_str("<")?;
		for (i, arg) in self.arguments.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{arg}")?;
		}
		f.write_str(">")
	}
}

/// Last dotted segment of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
	qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Enclosing class of a qualified class name.
///
/// Leading segments that start with a lowercase letter form the package; the first
/// capitalised segment starts the class chain. Only a chain of two or more classes has an
/// enclosing class.
pub fn enclosing_name(qualified: &str) -> Option<String> {
	let segments: Vec<&str> = qualified.split('.').collect();
	let first_class = segments
		.iter()
		.position(|segment| segment.chars().next().is_some_and(char::is_uppercase))?;
	if segments.len() - first_class < 2 {
		return None;
	}
	Some(segments[..segments.len() - 1].join("."))
}

/// What sort of type a page declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
	/// `class`
	Class,
	/// `interface`
	Interface,
	/// `@interface`
	Annotation,
}

impl ClassKind {
	/// Look up the kind for a header keyword.
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		match keyword {
			"class" => Some(Self::Class),
			"interface" => Some(Self::Interface),
			"@interface" => Some(Self::Annotation),
			_ => None,
		}
	}
}

/// A class, interface or annotation reconstructed from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDeclaration {
	/// Fully qualified name.
	pub name: String,
	/// Declared modifiers.
	pub modifiers: Modifiers,
	/// Declaration kind.
	pub kind: ClassKind,
	/// Explicit superclass; `None` for the implicit root type.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub superclass: Option<TypeName>,
	/// Implemented (or, for interfaces, extended) interfaces without duplicates.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub interfaces: Vec<TypeName>,
	/// Constants and fields in page order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub fields: Vec<FieldDeclaration>,
	/// Constructors and methods in page order.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub methods: Vec<MethodDeclaration>,
	/// Nested declarations; only populated by the assembler.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub nested: Vec<ClassDeclaration>,
}

impl ClassDeclaration {
	/// Create an empty declaration.
	pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
		Self {
			name: name.into(),
			modifiers: Modifiers::empty(),
			kind,
			superclass: None,
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: Vec::new(),
			nested: Vec::new(),
		}
	}

	/// Simple (unqualified) name.
	pub fn simple_name(&self) -> &str {
		simple_name(&self.name)
	}

	/// Qualified name of the enclosing declaration, if this one is nested.
	pub fn enclosing_name(&self) -> Option<String> {
		enclosing_name(&self.name)
	}

	/// Add an interface unless an equal one is already present.
	pub fn add_interface(&mut self, interface: TypeName) {
		if !self.interfaces.contains(&interface) {
			self.interfaces.push(interface);
		}
	}
}

/// A constant or field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
	/// Field name.
	pub name: String,
	/// Declared type.
	#[serde(rename = "type")]
	pub ty: TypeName,
	/// Declared modifiers; always `public static final` for constants.
	pub modifiers: Modifiers,
	/// Literal initializer, exactly as printed on the page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Documentation text.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub doc: String,
}

impl FieldDeclaration {
	/// A `public static final` constant with a literal initializer.
	pub fn constant(name: impl Into<String>, ty: TypeName, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			ty,
			modifiers: Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
			value: Some(value.into()),
			doc: String::new(),
		}
	}
}

/// How an emitter should fill in a method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPolicy {
	/// No body; the method is abstract.
	Abstract,
	/// A body that only signals "not implemented".
	ThrowStub,
}

/// A constructor or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
	/// Method name; `None` for constructors.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Declared modifiers.
	pub modifiers: Modifiers,
	/// Annotations written before the modifiers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub annotations: Vec<TypeName>,
	/// Return type; `None` for constructors.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub return_type: Option<TypeName>,
	/// Parameters in declaration order.
	#[serde(default)]
	pub parameters: Vec<ParameterDeclaration>,
	/// Types listed in the `throws` clause.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub exceptions: Vec<TypeName>,
	/// Documentation text.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub doc: String,
	/// Body the emitter should synthesise.
	pub body: BodyPolicy,
}

impl MethodDeclaration {
	/// Whether this declaration is a constructor.
	pub fn is_constructor(&self) -> bool {
		self.name.is_none()
	}
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
	/// Declared type.
	#[serde(rename = "type")]
	pub ty: TypeName,
	/// Parameter name.
	pub name: String,
}

/// A cross-reference found on a page: the text shown and the link behind it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassReference {
	/// Display text.
	pub name: String,
	/// Raw `href` value.
	pub link: String,
}

impl ClassReference {
	/// Create a reference from display text and a link.
	pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			link: link.into(),
		}
	}

	/// Resolve the link into a qualified type name.
	pub fn qualified_name(&self) -> Result<String> {
		crate::xref::resolve(&self.link)
	}

	/// Resolve the link, failing with the display text attached for diagnosis.
	pub fn type_name(&self) -> Result<TypeName> {
		self.qualified_name()
			.map(TypeName::simple)
			.map_err(|err| match err {
				Error::MalformedCrossReference(link) => {
					Error::MalformedCrossReference(format!("{link} ({})", self.name))
				}
				other => other,
			})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn modifiers_render_in_canonical_order() {
		let modifiers = Modifiers::FINAL | Modifiers::PUBLIC | Modifiers::STATIC;
		assert_eq!(modifiers.to_string(), "public static final");
		assert_eq!(Modifiers::from_keyword("synchronized"), Some(Modifiers::SYNCHRONIZED));
		assert_eq!(Modifiers::from_keyword("void"), None);
	}

	#[test]
	fn type_name_display_nests_arguments() {
		let ty = TypeName::parameterized(
			"java.util.Map",
			vec![
				TypeName::simple("String"),
				TypeName::parameterized("List", vec![TypeName::simple("Integer")]),
			],
		);
		assert_eq!(ty.to_string(), "java.util.Map<String, List<Integer>>");
		assert!(ty.is_generic());
		assert_eq!(ty.simple_name(), "Map");
	}

	#[test]
	fn enclosing_name_uses_capitalised_segments() {
		assert_eq!(enclosing_name("com.example.Outer"), None);
		assert_eq!(
			enclosing_name("com.example.Outer.Inner"),
			Some("com.example.Outer".to_string())
		);
		assert_eq!(
			enclosing_name("com.example.Outer.Inner.Deep"),
			Some("com.example.Outer.Inner".to_string())
		);
		assert_eq!(enclosing_name("lowercase.only"), None);
	}

	#[test]
	fn interfaces_are_deduplicated() {
		let mut decl = ClassDeclaration::new("com.example.Foo", ClassKind::Class);
		decl.add_interface(TypeName::simple("java.lang.Runnable"));
		decl.add_interface(TypeName::simple("java.io.Closeable"));
		decl.add_interface(TypeName::simple("java.lang.Runnable"));
		assert_eq!(
			decl.interfaces,
			vec![
				TypeName::simple("java.lang.Runnable"),
				TypeName::simple("java.io.Closeable")
			]
		);
	}
}
