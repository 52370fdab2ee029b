//! `brewres <formula> --package <spec>` – single-package mode.

use anyhow::Result;
use std::path::Path;

use brewres_core::fetch::Fetch;
use brewres_core::resolver::Resolver;
use brewres_core::spec::PackageSpec;

use super::process::process_package;

pub fn run_package<F: Fetch>(
    resolver: &Resolver<F>,
    formula_path: &Path,
    raw_spec: &str,
    dry_run: bool,
) -> Result<()> {
    let spec = PackageSpec::parse(raw_spec)?;
    process_package(resolver, formula_path, &spec, dry_run)
}
