//! Incremental construction of possibly parameterised type names.
//!
//! A [`TypeFrame`] models one level of a type expression. A [`TypeStack`] owns the chain of
//! frames that are open at once: the bottom frame is the type being parsed and each frame
//! above it is a generic argument of the frame below. Closing a level resolves the top frame
//! and pushes it onto its parent as an argument.

use crate::error::{Error, Result};
use crate::model::TypeName;

/// One level of a type expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFrame {
	name: Option<String>,
	arguments: Vec<TypeName>,
	inside_generic: bool,
}

impl TypeFrame {
	/// An empty frame.
	pub fn new() -> Self {
		Self::default()
	}

	/// Name set on this level, if any.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Whether this level's argument list is open.
	pub fn is_inside_generic(&self) -> bool {
		self.inside_generic
	}

	/// Set the base name; fails if it was already set.
	pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
		let name = name.into();
		if let Some(existing) = &self.name {
			return Err(Error::NameAlreadySet {
				existing: existing.clone(),
				incoming: name,
			});
		}
		self.name = Some(name);
		Ok(())
	}

	/// Append an array or varargs marker such as `[]` or `...` to the base name.
	pub fn append_suffix(&mut self, suffix: &str) -> Result<()> {
		let name = self.name.as_mut().ok_or(Error::UnnamedType)?;
		name.push_str(suffix);
		Ok(())
	}

	/// Open this level's argument list.
	pub fn enter_generic(&mut self) -> Result<()> {
		if self.inside_generic {
			return Err(Error::UnexpectedOpenGeneric {
				name: self.name.clone().unwrap_or_default(),
			});
		}
		self.inside_generic = true;
		Ok(())
	}

	/// Append a resolved argument; only valid while the argument list is open.
	pub fn push_argument(&mut self, argument: TypeName) -> Result<()> {
		if !self.inside_generic {
			return Err(Error::UnexpectedCloseGeneric);
		}
		self.arguments.push(argument);
		Ok(())
	}

	/// Close this level's argument list.
	pub fn exit_generic(&mut self) -> Result<()> {
		if !self.inside_generic {
			return Err(Error::UnexpectedCloseGeneric);
		}
		self.inside_generic = false;
		Ok(())
	}

	/// Produce the type name: plain if no arguments were pushed, parameterised otherwise.
	pub fn materialize(self) -> Result<TypeName> {
		let name = self.name.ok_or(Error::UnnamedType)?;
		Ok(TypeName::parameterized(name, self.arguments))
	}
}

/// Owned chain of open type levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStack {
	root: TypeFrame,
	arguments: Vec<TypeFrame>,
	max_depth: Option<usize>,
}

impl Default for TypeStack {
	fn default() -> Self {
		Self::new(None)
	}
}

impl TypeStack {
	/// A stack holding one empty root frame, with an optional generic-depth limit.
	pub fn new(max_depth: Option<usize>) -> Self {
		Self {
			root: TypeFrame::new(),
			arguments: Vec::new(),
			max_depth,
		}
	}

	/// Number of generic levels currently open.
	pub fn depth(&self) -> usize {
		self.arguments.len()
	}

	/// Whether a generic argument is being parsed rather than the root type.
	pub fn in_argument(&self) -> bool {
		!self.arguments.is_empty()
	}

	/// The innermost open level.
	pub fn current(&self) -> &TypeFrame {
		self.arguments.last().unwrap_or(&self.root)
	}

	fn current_mut(&mut self) -> &mut TypeFrame {
		self.arguments.last_mut().unwrap_or(&mut self.root)
	}

	/// Name of the root type, if set.
	pub fn root_name(&self) -> Option<&str> {
		self.root.name()
	}

	/// Set the name of the innermost level.
	pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
		self.current_mut().set_name(name)
	}

	/// Append an array or varargs marker to the innermost level's name.
	pub fn append_suffix(&mut self, suffix: &str) -> Result<()> {
		self.current_mut().append_suffix(suffix)
	}

	/// Handle `<`: open an argument list on the innermost level and start its first argument.
	pub fn open(&mut self) -> Result<()> {
		if let Some(limit) = self.max_depth
			&& self.depth() >= limit
		{
			return Err(Error::GenericDepthExceeded { limit });
		}
		if self.current().name().is_none() {
			return Err(Error::UnexpectedOpenGeneric {
				name: String::new(),
			});
		}
		self.current_mut().enter_generic()?;
		self.arguments.push(TypeFrame::new());
		Ok(())
	}

	/// Handle `,` inside an argument list: resolve the current argument and start a sibling.
	pub fn next_argument(&mut self) -> Result<()> {
		let argument = self.pop_argument()?;
		self.current_mut().push_argument(argument)?;
		self.arguments.push(TypeFrame::new());
		Ok(())
	}

	/// Handle `>`: resolve the innermost argument, attach it and close the parent's list.
	pub fn close(&mut self) -> Result<()> {
		let argument = self.pop_argument()?;
		let parent = self.current_mut();
		parent.push_argument(argument)?;
		parent.exit_generic()
	}

	fn pop_argument(&mut self) -> Result<TypeName> {
		self.arguments
			.pop()
			.ok_or(Error::UnexpectedCloseGeneric)?
			.materialize()
	}

	/// Resolve the root type; every opened level must have been closed.
	pub fn materialize(self) -> Result<TypeName> {
		if self.in_argument() || self.root.is_inside_generic() {
			return Err(Error::Incomplete {
				state: "GenericArgument",
			});
		}
		self.root.materialize()
	}
}
