//! HTTP page fetching.
//!
//! Uses the curl crate (libcurl) to GET a URL and return the body as text.
//! The resolver depends only on the `Fetch` trait, so tests can substitute
//! canned HTML without touching the network.

use std::time::Duration;

use crate::config::BrewresConfig;
use crate::error::FetchError;

/// Capability to fetch a URL's body as text. One call, one request;
/// no caching, no retries.
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_text(url)
    }
}

/// Production fetcher backed by `curl::easy::Easy`.
///
/// Follows redirects. Runs in the current thread and blocks until the
/// transfer completes or times out.
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &BrewresConfig) -> Self {
        Self::new(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }
}

impl Fetch for CurlFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let (status, body) = get(url, self.connect_timeout, self.timeout).map_err(|source| {
            FetchError::Transport {
                url: url.to_string(),
                source,
            }
        })?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        String::from_utf8(body).map_err(|_| FetchError::Encoding {
            url: url.to_string(),
        })
    }
}

/// Performs the GET and returns (status code, raw body).
fn get(url: &str, connect_timeout: Duration, timeout: Duration) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;
    easy.useragent(concat!("brewres/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok((status, body))
}
