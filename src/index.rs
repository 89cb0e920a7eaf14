//! The per-package class index page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::markup::{class_reference, selector};
use crate::model::ClassReference;

static INDEX_LINKS: Lazy<Selector> = Lazy::new(|| selector("table tr td.jd-linkcol a"));

/// List the classes linked from an index page, in page order.
pub fn parse_class_index(html: &Html) -> Result<Vec<ClassReference>> {
	html.select(&INDEX_LINKS).map(class_reference).collect()
}
