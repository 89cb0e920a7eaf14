//! Where documentation pages are read from.

use std::fs;
use std::path::PathBuf;

use tracing::trace;

use crate::error::{Error, Result};

/// A store of documentation pages addressed by their site path, e.g.
/// `/reference/com/example/Foo.html`.
pub trait PageSource {
	/// Read the page at `path`.
	fn read(&self, path: &str) -> Result<String>;
}

impl<T: PageSource + ?Sized> PageSource for &T {
	fn read(&self, path: &str) -> Result<String> {
		(**self).read(path)
	}
}

/// Pages saved on disk in the same layout as the documentation site.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	root: PathBuf,
}

impl DirectorySource {
	/// Serve pages from the mirror rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// File backing the site path `path`.
	pub fn resolve(&self, path: &str) -> PathBuf {
		path.split('/')
			.filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
			.fold(self.root.clone(), |acc, segment| acc.join(segment))
	}
}

impl PageSource for DirectorySource {
	fn read(&self, path: &str) -> Result<String> {
		let file = self.resolve(path);
		trace!(path = %file.display(), "reading page");
		fs::read_to_string(&file).map_err(|source| Error::Io {
			path: file.display().to_string(),
			source,
		})
	}
}
