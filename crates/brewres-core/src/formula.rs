//! Formula editing: idempotent insertion of a resource stanza.
//!
//! The formula is treated as opaque text with two meaningful substrings:
//! the `def install` marker (insertion anchor) and, possibly, an existing
//! `resource "<name>" do` header. No Ruby parsing.

use crate::error::FormulaError;

/// Literal token marking the start of the install routine.
pub const INSTALL_MARKER: &str = "def install";

/// What `apply` did to the formula text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    Inserted,
    Skipped,
}

/// True iff the formula already declares a resource block for `name`.
pub fn has_resource(formula: &str, name: &str) -> bool {
    formula.contains(&resource_header(name))
}

fn resource_header(name: &str) -> String {
    format!("resource \"{name}\" do")
}

/// Renders the stanza to splice in. Values go in verbatim, double-quoted;
/// an embedded `"` in name/url/hash would corrupt the output (accepted
/// limitation, mirrored from the stanza format itself).
pub fn render_resource_block(name: &str, url: &str, sha256: &str) -> String {
    format!(
        "  resource \"{name}\" do\n    url \"{url}\"\n    sha256 \"{sha256}\"\n  end\n\n"
    )
}

/// Splices `block` in at the first occurrence of `def install`.
///
/// A formula without the marker has no defined insertion position, so this
/// fails rather than appending somewhere arbitrary.
pub fn insert_before_install(formula: &str, block: &str) -> Result<String, FormulaError> {
    let Some(idx) = formula.find(INSTALL_MARKER) else {
        return Err(FormulaError::MarkerNotFound);
    };
    let mut out = String::with_capacity(formula.len() + block.len());
    out.push_str(&formula[..idx]);
    out.push_str(block);
    out.push_str(&formula[idx..]);
    Ok(out)
}

/// Inserts a resource block for `name` unless one is already present.
///
/// Idempotent: a second call with the same arguments returns the text
/// unchanged with `Skipped`. An existing block keeps its old url/hash
/// even if they differ from the ones passed in.
pub fn apply(
    formula: &str,
    name: &str,
    url: &str,
    sha256: &str,
) -> Result<(String, ApplyAction), FormulaError> {
    if has_resource(formula, name) {
        return Ok((formula.to_string(), ApplyAction::Skipped));
    }
    let block = render_resource_block(name, url, sha256);
    let new_text = insert_before_install(formula, &block)?;
    Ok((new_text, ApplyAction::Inserted))
}
