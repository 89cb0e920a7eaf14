//! Reconstruction of a single declaration from its documentation page.

use scraper::Html;
use tracing::debug;

use crate::config::ParseOptions;
use crate::error::Result;
use crate::header::parse_header;
use crate::layout::Layout;
use crate::members::parse_members;
use crate::model::ClassDeclaration;

/// Parse the page of the declaration called `name`.
///
/// Any failure is reported against `name`; a page either yields a complete declaration or none.
pub fn parse_class_page(
	name: &str,
	html: &Html,
	layout: Layout,
	options: ParseOptions,
) -> Result<ClassDeclaration> {
	parse(name, html, layout, options).map_err(|err| err.in_page(name))
}

fn parse(name: &str, html: &Html, layout: Layout, options: ParseOptions) -> Result<ClassDeclaration> {
	let mut declaration = parse_header(html, layout, options)?.into_declaration(name)?;
	let members = parse_members(html, layout, options)?;
	declaration.fields = members.fields;
	declaration.methods = members.methods;

	debug!(
		name,
		kind = ?declaration.kind,
		fields = declaration.fields.len(),
		methods = declaration.methods.len(),
		"parsed class page"
	);
	Ok(declaration)
}
