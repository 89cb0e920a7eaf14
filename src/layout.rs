use std::fmt;

/// The documentation-site layouts the parsers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
	/// developer.android.com: `code.api-signature` headers and comment-delimited sections.
	Android,
	/// developers.google.com: a `#jd-header` block and `section#...` member lists.
	Google,
}

impl Layout {
	/// Every known layout, in the order detection tries them.
	pub const ALL: [Layout; 2] = [Layout::Android, Layout::Google];

	/// File name of the class index page inside a package directory.
	pub fn index_page(self) -> &'static str {
		match self {
			Self::Android => "classes.html",
			Self::Google => "package-summary.html",
		}
	}
}

impl fmt::Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Android => f.write_str("android"),
			Self::Google => f.write_str("google"),
		}
	}
}
