//! `brewres <formula> --requirements-file <path>` – batch mode.
//!
//! Processes every non-blank requirements line in file order. A resolver
//! miss for one package is reported and does not halt the remaining items.

use anyhow::Result;
use std::path::Path;

use brewres_core::fetch::Fetch;
use brewres_core::resolver::Resolver;
use brewres_core::spec;

use super::process::process_package;

pub fn run_requirements<F: Fetch>(
    resolver: &Resolver<F>,
    formula_path: &Path,
    requirements_path: &Path,
    dry_run: bool,
) -> Result<()> {
    let specs = spec::read_requirements(requirements_path)?;
    tracing::debug!(
        "processing {} package(s) from {}",
        specs.len(),
        requirements_path.display()
    );
    for spec in &specs {
        process_package(resolver, formula_path, spec, dry_run)?;
    }
    Ok(())
}
