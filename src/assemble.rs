//! Nesting of flat declarations into a forest by their qualified names.

use std::collections::BTreeMap;

use tracing::warn;

use crate::model::ClassDeclaration;

/// Collects declarations by qualified name and nests each one under its enclosing declaration.
#[derive(Debug, Default)]
pub struct DeclarationTreeAssembler {
	declarations: BTreeMap<String, ClassDeclaration>,
}

impl DeclarationTreeAssembler {
	/// Create an empty assembler.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a declaration, replacing any earlier one with the same name.
	pub fn insert(&mut self, declaration: ClassDeclaration) {
		if let Some(previous) = self
			.declarations
			.insert(declaration.name.clone(), declaration)
		{
			warn!(name = %previous.name, "replacing duplicate declaration");
		}
	}

	/// Number of declarations collected so far.
	pub fn len(&self) -> usize {
		self.declarations.len()
	}

	/// Whether no declarations were collected.
	pub fn is_empty(&self) -> bool {
		self.declarations.is_empty()
	}

	/// Consume the assembler and return the root declarations with their nested children.
	///
	/// A declaration whose enclosing declaration was never collected becomes a root itself.
	pub fn into_roots(self) -> Vec<ClassDeclaration> {
		let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
		let mut roots = Vec::new();

		for (name, declaration) in &self.declarations {
			match declaration.enclosing_name() {
				Some(parent) if self.declarations.contains_key(&parent) => {
					children.entry(parent).or_default().push(name.clone());
				}
				Some(parent) => {
					warn!(name = %name, enclosing = %parent, "enclosing declaration missing, keeping as root");
					roots.push(name.clone());
				}
				None => roots.push(name.clone()),
			}
		}

		let mut declarations = self.declarations;
		roots
			.into_iter()
			.filter_map(|name| nest(&name, &mut declarations, &children))
			.collect()
	}
}

impl FromIterator<ClassDeclaration> for DeclarationTreeAssembler {
	fn from_iter<I: IntoIterator<Item = ClassDeclaration>>(iter: I) -> Self {
		let mut assembler = Self::new();
		for declaration in iter {
			assembler.insert(declaration);
		}
		assembler
	}
}

fn nest(
	name: &str,
	declarations: &mut BTreeMap<String, ClassDeclaration>,
	children: &BTreeMap<String, Vec<String>>,
) -> Option<ClassDeclaration> {
	let mut declaration = declarations.remove(name)?;
	if let Some(names) = children.get(name) {
		declaration.nested.extend(
			names
				.iter()
				.filter_map(|child| nest(child, declarations, children)),
		);
	}
	Some(declaration)
}
