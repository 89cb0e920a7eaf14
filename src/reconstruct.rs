//! Whole-library reconstruction: index, pages and nesting.

use scraper::Html;
use tracing::{debug, info, warn};

use crate::assemble::DeclarationTreeAssembler;
use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::index::parse_class_index;
use crate::layout::Layout;
use crate::model::{ClassDeclaration, ClassReference};
use crate::page::parse_class_page;
use crate::source::PageSource;
use crate::xref::link_path;

/// Outcome of reconstructing one library.
#[derive(Debug)]
pub struct Reconstruction {
	/// Layout the pages were parsed as.
	pub layout: Layout,
	/// Root declarations with nested declarations attached.
	pub declarations: Vec<ClassDeclaration>,
	/// Pages that failed to parse; their declarations are absent from the forest.
	pub failures: Vec<Error>,
}

impl Reconstruction {
	/// Total number of declarations, nested ones included.
	pub fn declaration_count(&self) -> usize {
		fn count(decl: &ClassDeclaration) -> usize {
			1 + decl.nested.iter().map(count).sum::<usize>()
		}
		self.declarations.iter().map(count).sum()
	}
}

/// Drives index parsing, page parsing and nesting for a library.
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
	/// Layout to parse as; detected from the index page when unset.
	layout: Option<Layout>,
	options: ParseOptions,
	/// Stop at the first failed page instead of collecting failures.
	fail_fast: bool,
}

impl Reconstructor {
	/// Creates a reconstructor that detects the layout and keeps going past failed pages.
	pub fn new() -> Self {
		Self::default()
	}

	/// Forces a layout instead of detecting it.
	pub fn with_layout(mut self, layout: Option<Layout>) -> Self {
		self.layout = layout;
		self
	}

	/// Sets the options passed to every page parser.
	pub fn with_options(mut self, options: ParseOptions) -> Self {
		self.options = options;
		self
	}

	/// Enables or disables aborting on the first failed page.
	pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
		self.fail_fast = fail_fast;
		self
	}

	/// Reconstruct every declaration listed in the index of `library`, e.g. `com.example.widgets`.
	pub fn run(&self, source: impl PageSource, library: &str) -> Result<Reconstruction> {
		let (layout, index) = self.read_index(&source, library)?;
		let references = parse_class_index(&Html::parse_document(&index))?;
		debug!(%layout, classes = references.len(), "parsed class index");

		let mut assembler = DeclarationTreeAssembler::new();
		let mut failures = Vec::new();
		for reference in &references {
			match self.reconstruct_class(&source, reference, layout) {
				Ok(declaration) => {
					info!("Found {}", declaration.name);
					assembler.insert(declaration);
				}
				Err(err) if self.fail_fast => return Err(err),
				Err(err) => {
					warn!(error = %err, "skipping page");
					failures.push(err);
				}
			}
		}

		Ok(Reconstruction {
			layout,
			declarations: assembler.into_roots(),
			failures,
		})
	}

	fn read_index(&self, source: &impl PageSource, library: &str) -> Result<(Layout, String)> {
		let directory = format!("/reference/{}", library.replace('.', "/"));
		let candidates = match self.layout {
			Some(layout) => vec![layout],
			None => Layout::ALL.to_vec(),
		};

		for layout in candidates {
			match source.read(&format!("{directory}/{}", layout.index_page())) {
				Ok(html) => return Ok((layout, html)),
				Err(err) if err.is_not_found() => {
					debug!(%layout, "no class index for layout");
				}
				Err(err) => return Err(err),
			}
		}

		Err(Error::MissingIndex {
			library: library.to_string(),
		})
	}

	fn reconstruct_class(
		&self,
		source: &impl PageSource,
		reference: &ClassReference,
		layout: Layout,
	) -> Result<ClassDeclaration> {
		let name = reference
			.qualified_name()
			.map_err(|err| err.in_page(&reference.name))?;
		let path = link_path(&reference.link)
			.ok_or_else(|| Error::MalformedCrossReference(reference.link.clone()).in_page(&name))?;
		let html = source.read(&path).map_err(|err| err.in_page(&name))?;
		parse_class_page(&name, &Html::parse_document(&html), layout, self.options)
	}
}
