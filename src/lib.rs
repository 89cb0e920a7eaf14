//! Reconstruction of Java API declarations from saved javadoc reference pages.
//!
//! A library's class index lists its pages; each page yields one [`ClassDeclaration`] with its
//! modifiers, supertypes, constants, fields, constructors and methods. Declarations are then
//! nested by qualified name into a forest that callers can serialise or render.

/// Error types and the crate-wide `Result` alias.
pub mod error;

/// Parser configuration.
pub mod config;

/// The reconstructed declaration model.
pub mod model;

/// Documentation site layouts.
pub mod layout;

/// Hyperlink resolution.
pub mod xref;

/// Helpers over parsed HTML.
pub mod markup;

/// Parent-linked builder for generic type names.
pub mod generic;

/// The token state machine for member signatures.
pub mod signature;

/// Documentation text extraction.
pub mod doc_text;

/// Class header parsing.
pub mod header;

/// Member section parsing.
pub mod members;

/// Class index parsing.
pub mod index;

/// Single-page reconstruction.
pub mod page;

/// Nesting of declarations by enclosing name.
pub mod assemble;

/// Page storage.
pub mod source;

/// Whole-library reconstruction.
pub mod reconstruct;

pub use crate::assemble::DeclarationTreeAssembler;
pub use crate::config::ParseOptions;
pub use crate::error::{Error, ErrorCategory, Result};
pub use crate::index::parse_class_index;
pub use crate::layout::Layout;
pub use crate::model::{
	BodyPolicy, ClassDeclaration, ClassKind, ClassReference, FieldDeclaration, MethodDeclaration, Modifiers,
	ParameterDeclaration, TypeName,
};
pub use crate::page::parse_class_page;
pub use crate::reconstruct::{Reconstruction, Reconstructor};
pub use crate::signature::{parse_field_signature, parse_method_signature};
pub use crate::source::{DirectorySource, PageSource};
