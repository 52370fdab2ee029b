//! Package specifiers: `name` or `name==version`, plus requirements files.

use anyhow::{Context, Result};
use std::path::Path;

use crate::error::SpecError;

/// A requested package, optionally pinned to an exact version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    /// Exact version when the specifier carried `==`, else the latest release.
    pub version: Option<String>,
}

impl PackageSpec {
    /// Parses a `name[==version]` specifier. Surrounding whitespace is
    /// ignored; an empty version pin (`name==`) is treated as unpinned.
    pub fn parse(raw: &str) -> Result<Self, SpecError> {
        let trimmed = raw.trim();
        let (name, version) = match trimmed.split_once("==") {
            Some((n, v)) => (n.trim(), Some(v.trim())),
            None => (trimmed, None),
        };
        if name.is_empty() {
            return Err(SpecError::EmptyName(raw.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            version: version.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }
}

/// Reads a requirements listing: one specifier per line, blank lines
/// skipped, file order preserved.
pub fn read_requirements(path: &Path) -> Result<Vec<PackageSpec>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read requirements file: {}", path.display()))?;
    let mut specs = Vec::new();
    for line in data.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let spec = PackageSpec::parse(line)
            .with_context(|| format!("bad specifier in {}", path.display()))?;
        specs.push(spec);
    }
    Ok(specs)
}
