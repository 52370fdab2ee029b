//! Shared per-package step: resolve against the index, splice into the
//! formula, report the outcome on stdout.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use brewres_core::error::ResolveError;
use brewres_core::fetch::Fetch;
use brewres_core::formula::{self, ApplyAction};
use brewres_core::resolver::Resolver;
use brewres_core::spec::PackageSpec;

/// Resolves one package and applies the result to the formula file.
///
/// Resolution misses (no sdist, no SHA256) are reported and swallowed so a
/// batch run continues; transport failures and formula-editing failures
/// propagate.
pub(crate) fn process_package<F: Fetch>(
    resolver: &Resolver<F>,
    formula_path: &Path,
    spec: &PackageSpec,
    dry_run: bool,
) -> Result<()> {
    let resource = match resolver.resolve(spec) {
        Ok(resource) => resource,
        Err(err @ (ResolveError::NoSourceDist(_) | ResolveError::HashNotFound(_))) => {
            println!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err).with_context(|| format!("resolve package: {}", spec.name)),
    };
    tracing::debug!("resolved {} -> {}", spec.name, resource.download_url);

    let formula_text = fs::read_to_string(formula_path)
        .with_context(|| format!("read formula: {}", formula_path.display()))?;

    let (new_text, action) = formula::apply(
        &formula_text,
        &spec.name,
        &resource.download_url,
        &resource.sha256,
    )
    .with_context(|| format!("edit formula: {}", formula_path.display()))?;

    match action {
        ApplyAction::Skipped => {
            println!(
                "Resource \"{}\" already present in {}; skipping.",
                spec.name,
                formula_path.display()
            );
        }
        ApplyAction::Inserted if dry_run => {
            println!(
                "Dry run: the following resource block would be added to {}:\n",
                formula_path.display()
            );
            print!(
                "{}",
                formula::render_resource_block(&spec.name, &resource.download_url, &resource.sha256)
            );
        }
        ApplyAction::Inserted => {
            fs::write(formula_path, new_text)
                .with_context(|| format!("write formula: {}", formula_path.display()))?;
            println!("Resource \"{}\" added to {}", spec.name, formula_path.display());
        }
    }

    Ok(())
}
