/// Options shared by every parser that builds type names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
	/// Maximum number of nested generic argument lists; `None` leaves nesting unbounded.
	pub max_generic_depth: Option<usize>,
}

impl ParseOptions {
	/// Options with no limits.
	pub fn new() -> Self {
		Self::default()
	}

	/// Bound the depth of nested generic argument lists.
	pub fn with_max_generic_depth(mut self, depth: Option<usize>) -> Self {
		self.max_generic_depth = depth;
		self
	}
}
