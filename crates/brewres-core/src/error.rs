//! Typed errors for the resolver and formula editor.
//!
//! Resolution misses (`NoSourceDist`, `HashNotFound`) are expected operator
//! outcomes and get caught at the per-package boundary; transport failures
//! and a missing install marker propagate.

use thiserror::Error;

/// Failure of a single HTTP text fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// curl-level failure: DNS, connect, TLS, timeout.
    #[error("fetch {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Response completed but with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// Response body was not valid UTF-8 text.
    #[error("response body for {url} is not valid UTF-8")]
    Encoding { url: String },
}

/// Failure to resolve a package to a (download URL, SHA256) pair.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The files page had no `<name>-*.tar.gz` source distribution link.
    #[error("no source distribution found for package: {0}")]
    NoSourceDist(String),
    /// Found the source distribution but no usable SHA256 on the hashes page.
    #[error("no SHA256 hash found for package: {0}")]
    HashNotFound(String),
    /// The index base URL or a page-relative link did not form a valid URL.
    #[error("invalid index page URL: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Failure to edit a formula.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Without `def install` the insertion position is undefined; appending
    /// blindly would corrupt the file, so this is fatal for the target.
    #[error("formula has no `def install` routine; cannot position resource block")]
    MarkerNotFound,
}

/// Failure to parse a package specifier.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("empty package name in specifier {0:?}")]
    EmptyName(String),
}
