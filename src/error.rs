use thiserror::Error;

/// Broad classification of a failure, used when reporting why a page was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
	/// An expected token or pattern was absent or unrecognised.
	Structural,
	/// A cross-reference link did not have the expected path shape.
	Resolution,
	/// A parse ended before reaching a terminal state.
	Sequencing,
	/// Reading a page failed.
	Io,
}

/// Errors produced while reconstructing declarations from documentation pages.
#[derive(Debug, Error)]
pub enum Error {
	/// A token arrived in a parser state that cannot accept it.
	#[error("unexpected {token:?} during {state}")]
	UnexpectedToken {
		/// The offending token text.
		token: String,
		/// Name of the parser state that rejected it.
		state: &'static str,
	},
	/// A `<` arrived while the current type already had an open argument list.
	#[error("unexpected open-generic marker: `{name}` already has an open argument list")]
	UnexpectedOpenGeneric {
		/// Type name whose argument list was already open.
		name: String,
	},
	/// A `>` arrived with no matching `<`.
	#[error("unexpected close-generic marker")]
	UnexpectedCloseGeneric,
	/// A generic argument list nested deeper than the configured limit.
	#[error("generic nesting exceeds the limit of {limit}")]
	GenericDepthExceeded {
		/// The configured maximum depth.
		limit: usize,
	},
	/// A type slot received a second name.
	#[error("type name already set to `{existing}`, got `{incoming}`")]
	NameAlreadySet {
		/// Name already held by the slot.
		existing: String,
		/// Name that tried to replace it.
		incoming: String,
	},
	/// A type was materialised before its name was known.
	#[error("type name has to be set before it can be materialised")]
	UnnamedType,
	/// A parameter reached `,` or `)` without both a type and a name.
	#[error("parameter {index} is missing its name")]
	MissingParameterName {
		/// Zero-based position of the parameter.
		index: usize,
	},
	/// A keyword in a modifier slot was not recognised.
	#[error("unrecognised {slot}: {value:?}")]
	UnknownModifier {
		/// Which slot of the header record held the value.
		slot: &'static str,
		/// The unrecognised value.
		value: String,
	},
	/// The declaration kind keyword was not recognised.
	#[error("unrecognised kind: {0:?}")]
	UnknownKind(String),
	/// A fixed-format header record had fewer slots than expected.
	#[error("header record is missing its {slot} slot")]
	MissingSlot {
		/// The absent slot.
		slot: &'static str,
	},
	/// Text did not match one of the fixed member patterns.
	#[error("failed to match {pattern} against {text:?}")]
	PatternMismatch {
		/// Human-readable name of the pattern.
		pattern: &'static str,
		/// The text that failed to match.
		text: String,
	},
	/// A constant declared a type other than `int`, `long` or `String`.
	#[error("unrecognised field type {0:?}")]
	UnsupportedFieldType(String),
	/// A selector that must match exactly once matched some other number of times.
	#[error("expected exactly one match for `{selector}`, found {found}")]
	ExpectedSingle {
		/// The CSS selector.
		selector: &'static str,
		/// Number of matches.
		found: usize,
	},
	/// An element had no attribute that the parse needs.
	#[error("<{element}> has no `{attribute}` attribute")]
	MissingAttribute {
		/// Element name.
		element: String,
		/// Attribute name.
		attribute: &'static str,
	},
	/// A hyperlink did not point into the reference tree.
	#[error("malformed cross-reference: {0}")]
	MalformedCrossReference(String),
	/// A signature ran out of input before completing.
	#[error("signature ended in {state} instead of completing")]
	Incomplete {
		/// Name of the final state.
		state: &'static str,
	},
	/// A page never declared whether it is a class, interface or annotation.
	#[error("failed to resolve the declaration kind of {page}")]
	UnresolvedKind {
		/// Qualified name of the page's declaration.
		page: String,
	},
	/// Neither known index page was present under the documentation root.
	#[error("no class index found for {library}")]
	MissingIndex {
		/// The dotted library (package) name.
		library: String,
	},
	/// Failure while parsing a single signature fragment.
	#[error("{source} in `{fragment}`")]
	Fragment {
		/// The signature text as it appeared on the page.
		fragment: String,
		/// Underlying failure.
		#[source]
		source: Box<Error>,
	},
	/// Failure while parsing one documentation page.
	#[error("{page}: {source}")]
	Page {
		/// Qualified name of the page's declaration.
		page: String,
		/// Underlying failure.
		#[source]
		source: Box<Error>,
	},
	/// Failed to read a page.
	#[error("failed to read {path}: {source}")]
	Io {
		/// Path of the page that failed to load.
		path: String,
		/// Underlying IO error.
		#[source]
		source: std::io::Error,
	},
}

impl Error {
	/// Whether this is a read failure for a page that does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
	}

	/// Attach the signature text that was being parsed.
	pub fn in_fragment(self, fragment: impl Into<String>) -> Self {
		Self::Fragment {
			fragment: fragment.into(),
			source: Box::new(self),
		}
	}

	/// Attach the page whose parse failed.
	pub fn in_page(self, page: impl Into<String>) -> Self {
		Self::Page {
			page: page.into(),
			source: Box::new(self),
		}
	}

	/// Classify the failure, looking through context wrappers.
	pub fn category(&self) -> ErrorCategory {
		match self {
			Self::Fragment { source, .. } | Self::Page { source, .. } => source.category(),
			Self::MalformedCrossReference(_) => ErrorCategory::Resolution,
			Self::Incomplete { .. } | Self::UnresolvedKind { .. } => ErrorCategory::Sequencing,
			Self::Io { .. } | Self::MissingIndex { .. } => ErrorCategory::Io,
			Self::UnexpectedToken { .. }
			| Self::UnexpectedOpenGeneric { .. }
			| Self::UnexpectedCloseGeneric
			| Self::GenericDepthExceeded { .. }
			| Self::NameAlreadySet { .. }
			| Self::UnnamedType
			| Self::MissingParameterName { .. }
			| Self::UnknownModifier { .. }
			| Self::UnknownKind(_)
			| Self::MissingSlot { .. }
			| Self::PatternMismatch { .. }
			| Self::UnsupportedFieldType(_)
			| Self::ExpectedSingle { .. }
			| Self::MissingAttribute { .. } => ErrorCategory::Structural,
		}
	}
}

/// Result type returned throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn category_looks_through_wrappers() {
		let err = Error::MalformedCrossReference("/elsewhere/Foo.html".into())
			.in_fragment("public Foo foo ()")
			.in_page("com.example.Bar");
		assert_eq!(err.category(), ErrorCategory::Resolution);
	}

	#[test]
	fn fragment_context_is_rendered() {
		let err = Error::Incomplete { state: "Name" }.in_fragment("public void foo");
		assert_eq!(
			err.to_string(),
			"signature ended in Name instead of completing in `public void foo`"
		);
	}
}
