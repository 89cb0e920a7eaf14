//! State machine that turns a member signature fragment into a declaration.
//!
//! A signature is a mix of text runs and cross-reference anchors, for example
//! `public <a>List</a>&lt;<a>String</a>&gt; names (int limit)`. Text is split into words
//! on whitespace and on the separators `@ < > ( , )`; every word and every anchor drives one
//! transition of [`ParseState`].

use scraper::ElementRef;
use tracing::debug;

use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::generic::TypeStack;
use crate::markup::{Fragment, class_reference, fragments, normalized_text};
use crate::model::{
	BodyPolicy, FieldDeclaration, MethodDeclaration, Modifiers, ParameterDeclaration, TypeName,
};

/// What sort of member a signature declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
	/// `modifiers return-type name (parameters)`
	Method,
	/// `modifiers name (parameters)`
	Constructor,
	/// `modifiers type name`
	Field,
}

/// Progress through a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseState {
	Modifiers,
	Annotation(TypeStack),
	ReturnType(TypeStack),
	Name,
	Parameter {
		ty: TypeStack,
		name: Option<String>,
	},
	Complete,
	Throws(TypeStack),
}

impl ParseState {
	fn label(&self) -> &'static str {
		match self {
			Self::Modifiers => "Modifiers",
			Self::Annotation(_) => "Annotation",
			Self::ReturnType(ty) | Self::Parameter { ty, .. } | Self::Throws(ty)
				if ty.in_argument() =>
			{
				"GenericArgument"
			}
			Self::ReturnType(_) => "ReturnType",
			Self::Name => "Name",
			Self::Parameter { .. } => "Parameter",
			Self::Complete => "Complete",
			Self::Throws(_) => "Throws",
		}
	}

	/// The type under construction, for states that build one.
	fn type_stack(&mut self) -> Option<&mut TypeStack> {
		match self {
			Self::Annotation(ty)
			| Self::ReturnType(ty)
			| Self::Parameter { ty, .. }
			| Self::Throws(ty) => Some(ty),
			Self::Modifiers | Self::Name | Self::Complete => None,
		}
	}
}

/// Everything a signature declares, independent of how it will be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
	/// Modifier keywords.
	pub modifiers: Modifiers,
	/// Annotations preceding the modifiers.
	pub annotations: Vec<TypeName>,
	/// Return type of a method or type of a field.
	pub return_type: Option<TypeName>,
	/// Member name.
	pub name: Option<String>,
	/// Parameters in order.
	pub parameters: Vec<ParameterDeclaration>,
	/// Types of the `throws` clause.
	pub exceptions: Vec<TypeName>,
}

impl Signature {
	/// Body an emitter should give this member.
	pub fn body_policy(&self) -> BodyPolicy {
		if self.modifiers.contains(Modifiers::ABSTRACT) {
			BodyPolicy::Abstract
		} else {
			BodyPolicy::ThrowStub
		}
	}
}

/// Parser for a single signature element.
#[derive(Debug, Clone, Copy)]
pub struct SignatureParser {
	kind: SignatureKind,
	options: ParseOptions,
}

impl SignatureParser {
	/// Create a parser for the given member kind.
	pub fn new(kind: SignatureKind) -> Self {
		Self {
			kind,
			options: ParseOptions::default(),
		}
	}

	/// Use the provided options.
	pub fn with_options(mut self, options: ParseOptions) -> Self {
		self.options = options;
		self
	}

	/// Parse a signature element, attaching its text to any failure.
	pub fn parse(&self, element: ElementRef<'_>) -> Result<Signature> {
		self.parse_fragments(fragments(element))
			.map_err(|err| err.in_fragment(normalized_text(element)))
	}

	/// Parse an already flattened fragment stream.
	pub fn parse_fragments<'a>(&self, stream: impl Iterator<Item = Fragment<'a>>) -> Result<Signature> {
		let mut machine = Machine::new(self.kind, self.options);
		for fragment in stream {
			match fragment {
				Fragment::Text(text) => machine.text(text)?,
				Fragment::Link(anchor) => machine.link(class_reference(anchor)?.type_name()?)?,
				Fragment::LineBreak => machine.line_break()?,
			}
		}
		machine.finish()
	}
}

/// Parse a method or constructor signature into a declaration.
pub fn parse_method_signature(
	element: ElementRef<'_>,
	doc: impl Into<String>,
	is_constructor: bool,
	options: ParseOptions,
) -> Result<MethodDeclaration> {
	let kind = if is_constructor {
		SignatureKind::Constructor
	} else {
		SignatureKind::Method
	};
	let signature = SignatureParser::new(kind).with_options(options).parse(element)?;
	let body = signature.body_policy();

	debug!(
		name = signature.name.as_deref().unwrap_or_default(),
		parameters = signature.parameters.len(),
		constructor = is_constructor,
		"parsed signature"
	);

	Ok(MethodDeclaration {
		name: if is_constructor { None } else { signature.name },
		modifiers: signature.modifiers,
		annotations: signature.annotations,
		return_type: if is_constructor {
			None
		} else {
			signature.return_type
		},
		parameters: signature.parameters,
		exceptions: signature.exceptions,
		doc: doc.into(),
		body,
	})
}

/// Parse a field signature (`modifiers type name`) into a declaration without initializer.
pub fn parse_field_signature(
	element: ElementRef<'_>,
	doc: impl Into<String>,
	options: ParseOptions,
) -> Result<FieldDeclaration> {
	let signature = SignatureParser::new(SignatureKind::Field)
		.with_options(options)
		.parse(element)?;
	let (Some(ty), Some(name)) = (signature.return_type, signature.name) else {
		return Err(Error::Incomplete { state: "Name" }.in_fragment(normalized_text(element)));
	};
	Ok(FieldDeclaration {
		name,
		ty,
		modifiers: signature.modifiers,
		value: None,
		doc: doc.into(),
	})
}

/// Whether `word` is only array dimensions and/or a varargs marker, e.g. `[]`, `[][]`, `...`.
fn is_array_suffix(word: &str) -> bool {
	let mut rest = word.strip_suffix("...").unwrap_or(word);
	while let Some(next) = rest.strip_prefix("[]") {
		rest = next;
	}
	!word.is_empty() && rest.is_empty()
}

struct Machine {
	kind: SignatureKind,
	options: ParseOptions,
	state: ParseState,
	signature: Signature,
}

impl Machine {
	fn new(kind: SignatureKind, options: ParseOptions) -> Self {
		Self {
			kind,
			options,
			state: ParseState::Modifiers,
			signature: Signature::default(),
		}
	}

	fn new_type(&self) -> TypeStack {
		TypeStack::new(self.options.max_generic_depth)
	}

	fn unexpected(&self, token: impl Into<String>) -> Error {
		Error::UnexpectedToken {
			token: token.into(),
			state: self.state.label(),
		}
	}

	fn take_state(&mut self) -> ParseState {
		std::mem::replace(&mut self.state, ParseState::Complete)
	}

	/// Leave the modifier list once a non-modifier token shows up.
	fn leave_modifiers(&mut self) {
		self.state = match self.kind {
			SignatureKind::Constructor => ParseState::Name,
			SignatureKind::Method | SignatureKind::Field => ParseState::ReturnType(self.new_type()),
		};
	}

	fn text(&mut self, text: &str) -> Result<()> {
		let mut word = String::new();
		for ch in text.chars() {
			match ch {
				'@' => {
					self.flush(&mut word)?;
					self.annotation_start()?;
				}
				'<' => {
					self.flush(&mut word)?;
					self.open_generic()?;
				}
				'>' => {
					self.flush(&mut word)?;
					self.close_generic()?;
				}
				'(' => {
					self.flush(&mut word)?;
					self.open_parameters()?;
				}
				',' => {
					self.flush(&mut word)?;
					self.comma()?;
				}
				')' => {
					self.flush(&mut word)?;
					self.close_parameters()?;
				}
				c if c.is_whitespace() => self.flush(&mut word)?,
				c => word.push(c),
			}
		}
		self.flush(&mut word)
	}

	fn flush(&mut self, word: &mut String) -> Result<()> {
		if word.is_empty() {
			return Ok(());
		}
		let word = std::mem::take(word);
		self.word(word)
	}

	fn word(&mut self, word: String) -> Result<()> {
		if self.state == ParseState::Modifiers {
			if let Some(flag) = Modifiers::from_keyword(&word) {
				self.signature.modifiers |= flag;
				return Ok(());
			}
			self.leave_modifiers();
		}

		match self.take_state() {
			ParseState::Annotation(mut ty) => {
				ty.set_name(word)?;
				self.state = ParseState::Annotation(ty);
			}
			ParseState::ReturnType(mut ty) => {
				if ty.current().name().is_none() {
					ty.set_name(word)?;
					self.state = ParseState::ReturnType(ty);
				} else if is_array_suffix(&word) {
					ty.append_suffix(&word)?;
					self.state = ParseState::ReturnType(ty);
				} else if ty.in_argument() {
					self.state = ParseState::ReturnType(ty);
					return Err(self.unexpected(word));
				} else {
					self.signature.return_type = Some(ty.materialize()?);
					self.signature.name = Some(word);
					self.state = ParseState::Name;
				}
			}
			ParseState::Name => {
				self.state = ParseState::Name;
				if self.signature.name.is_some() {
					return Err(self.unexpected(word));
				}
				self.signature.name = Some(word);
			}
			ParseState::Parameter { mut ty, name } => {
				if ty.current().name().is_none() {
					ty.set_name(word)?;
					self.state = ParseState::Parameter { ty, name };
				} else if name.is_none() && is_array_suffix(&word) {
					ty.append_suffix(&word)?;
					self.state = ParseState::Parameter { ty, name };
				} else if ty.in_argument() || name.is_some() {
					self.state = ParseState::Parameter { ty, name };
					return Err(self.unexpected(word));
				} else {
					self.state = ParseState::Parameter {
						ty,
						name: Some(word),
					};
				}
			}
			ParseState::Complete if word == "throws" => {
				self.state = ParseState::Throws(self.new_type());
			}
			ParseState::Throws(mut ty) => {
				ty.set_name(word)?;
				self.state = ParseState::Throws(ty);
			}
			state @ (ParseState::Complete | ParseState::Modifiers) => {
				self.state = state;
				return Err(self.unexpected(word));
			}
		}
		Ok(())
	}

	fn link(&mut self, ty: TypeName) -> Result<()> {
		if self.state == ParseState::Modifiers {
			self.leave_modifiers();
		}
		match self.state.type_stack() {
			Some(stack) => stack.set_name(ty.name),
			None => Err(self.unexpected(ty.name)),
		}
	}

	fn line_break(&mut self) -> Result<()> {
		match self.take_state() {
			ParseState::Annotation(ty) => {
				self.signature.annotations.push(ty.materialize()?);
				self.state = ParseState::Modifiers;
				Ok(())
			}
			state => {
				self.state = state;
				Err(self.unexpected("<br>"))
			}
		}
	}

	fn annotation_start(&mut self) -> Result<()> {
		if self.state != ParseState::Modifiers {
			return Err(self.unexpected("@"));
		}
		self.state = ParseState::Annotation(self.new_type());
		Ok(())
	}

	fn open_generic(&mut self) -> Result<()> {
		match self.state.type_stack() {
			Some(stack) => stack.open(),
			None => Err(self.unexpected("<")),
		}
	}

	fn close_generic(&mut self) -> Result<()> {
		match self.state.type_stack() {
			Some(stack) => stack.close(),
			None => Err(self.unexpected(">")),
		}
	}

	fn open_parameters(&mut self) -> Result<()> {
		if self.state != ParseState::Name
			|| self.signature.name.is_none()
			|| self.kind == SignatureKind::Field
		{
			return Err(self.unexpected("("));
		}
		self.state = ParseState::Parameter {
			ty: self.new_type(),
			name: None,
		};
		Ok(())
	}

	fn comma(&mut self) -> Result<()> {
		match self.take_state() {
			ParseState::ReturnType(mut ty) if ty.in_argument() => {
				ty.next_argument()?;
				self.state = ParseState::ReturnType(ty);
			}
			ParseState::Parameter { mut ty, name } if ty.in_argument() => {
				ty.next_argument()?;
				self.state = ParseState::Parameter { ty, name };
			}
			ParseState::Parameter { ty, name } => {
				self.push_parameter(ty, name)?;
				self.state = ParseState::Parameter {
					ty: self.new_type(),
					name: None,
				};
			}
			ParseState::Throws(mut ty) if ty.in_argument() => {
				ty.next_argument()?;
				self.state = ParseState::Throws(ty);
			}
			ParseState::Throws(ty) => {
				self.signature.exceptions.push(ty.materialize()?);
				self.state = ParseState::Throws(self.new_type());
			}
			state => {
				self.state = state;
				return Err(self.unexpected(","));
			}
		}
		Ok(())
	}

	fn close_parameters(&mut self) -> Result<()> {
		match self.take_state() {
			ParseState::Parameter { ty, name } if !ty.in_argument() => {
				if name.is_some() {
					self.push_parameter(ty, name)?;
				} else if ty.root_name().is_some() || !self.signature.parameters.is_empty() {
					return Err(Error::MissingParameterName {
						index: self.signature.parameters.len(),
					});
				}
				self.state = ParseState::Complete;
				Ok(())
			}
			state => {
				self.state = state;
				Err(self.unexpected(")"))
			}
		}
	}

	fn push_parameter(&mut self, ty: TypeStack, name: Option<String>) -> Result<()> {
		let index = self.signature.parameters.len();
		let name = name.ok_or(Error::MissingParameterName { index })?;
		self.signature.parameters.push(ParameterDeclaration {
			ty: ty.materialize()?,
			name,
		});
		Ok(())
	}

	fn finish(mut self) -> Result<Signature> {
		match self.take_state() {
			ParseState::Complete => Ok(self.signature),
			ParseState::Throws(ty) if ty.root_name().is_some() => {
				self.signature.exceptions.push(ty.materialize()?);
				Ok(self.signature)
			}
			ParseState::Name
				if self.kind == SignatureKind::Field && self.signature.name.is_some() =>
			{
				Ok(self.signature)
			}
			state => Err(Error::Incomplete {
				state: state.label(),
			}),
		}
	}
}
