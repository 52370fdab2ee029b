//! CLI for brewres.

mod commands;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use brewres_core::config;
use brewres_core::fetch::CurlFetcher;
use brewres_core::resolver::Resolver;

use commands::{run_package, run_requirements};

/// Insert PyPI resource stanzas into a Homebrew formula.
#[derive(Debug, Parser)]
#[command(name = "brewres")]
#[command(about = "Add PyPI resource blocks to a Homebrew formula", long_about = None)]
#[command(group(ArgGroup::new("source").required(true)))]
pub struct Cli {
    /// Path to the Homebrew formula file to edit.
    pub formula_path: PathBuf,

    /// Print the generated resource block(s) instead of writing the formula.
    #[arg(long)]
    pub dry_run: bool,

    /// Single package specifier, `name` or `name==version`.
    #[arg(long, value_name = "NAME[==VERSION]", group = "source")]
    pub package: Option<String>,

    /// Requirements listing: one specifier per line, blank lines ignored.
    #[arg(long, value_name = "PATH", group = "source")]
    pub requirements_file: Option<PathBuf>,
}

pub fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    // Validate the target before any network work.
    if !cli.formula_path.is_file() {
        anyhow::bail!("formula file not found: {}", cli.formula_path.display());
    }

    let fetcher = CurlFetcher::from_config(&cfg);
    let resolver = Resolver::new(fetcher, &cfg.index_base_url)?;

    match (&cli.package, &cli.requirements_file) {
        (Some(raw), None) => run_package(&resolver, &cli.formula_path, raw, cli.dry_run),
        (None, Some(reqs)) => run_requirements(&resolver, &cli.formula_path, reqs, cli.dry_run),
        _ => unreachable!("clap group enforces exactly one of --package/--requirements-file"),
    }
}
