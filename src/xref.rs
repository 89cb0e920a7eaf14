//! Resolution of documentation hyperlinks into qualified type names.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

/// Path shape of a link into the reference tree.
static LINK_PATH: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"^(/android)?/reference/(?P<fullName>[\w/.]+)$").expect("link path pattern")
});

/// Trailing generic suffix that some symbolic links carry, e.g. `List<E>`.
static GENERIC_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.+>").expect("generic suffix pattern"));

/// Base used to resolve relative links; only the path of the result is inspected.
static LINK_BASE: Lazy<Url> =
	Lazy::new(|| Url::parse("https://reference.invalid/").expect("link base url"));

/// Decoded path component of a link, whether absolute or site-relative.
pub(crate) fn link_path(link: &str) -> Option<String> {
	let url = Url::options().base_url(Some(&LINK_BASE)).parse(link).ok()?;
	percent_decode_str(url.path())
		.decode_utf8()
		.ok()
		.map(|path| path.into_owned())
}

/// Turn a documentation link into a qualified type name.
///
/// The link path, without a trailing `.html`, must look like
/// `(/android)?/reference/<dotted/path>`; path separators become `.`.
pub fn resolve(link: &str) -> Result<String> {
	let path = link_path(link).ok_or_else(|| Error::MalformedCrossReference(link.to_string()))?;
	let path = path.strip_suffix(".html").unwrap_or(&path);

	let captures = LINK_PATH
		.captures(path)
		.ok_or_else(|| Error::MalformedCrossReference(link.to_string()))?;

	Ok(captures["fullName"].replace('/', "."))
}

/// Render a link as the symbol used inside a `{@link ...}` marker.
///
/// The link is percent-decoded, stripped of `.html` and of the reference prefix, its path
/// separators turned into `.`, and any angle-bracket generic suffix removed.
pub fn link_symbol(link: &str) -> String {
	let decoded = percent_decode_str(&link.replace('+', " "))
		.decode_utf8_lossy()
		.into_owned();
	let trimmed = decoded.replace(".html", "");
	let trimmed = trimmed
		.strip_prefix("/android/reference/")
		.unwrap_or(&trimmed);
	let trimmed = trimmed.strip_prefix("/reference/").unwrap_or(trimmed);
	let dotted = trimmed.replace('/', ".");
	GENERIC_SUFFIX.replace_all(&dotted, "").into_owned()
}
