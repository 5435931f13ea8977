use std::path::PathBuf;

use reqwest::Client;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

use crate::error::ScrapeError;

const CACHE_DIR: &str = ".cache";

/// Blocking-style page fetcher with a transparent on-disk response cache.
///
/// Identical URLs are served from `.cache/` within and across runs; the
/// cache is read-through/write-through and only affects run time, never
/// output. A non-2xx status or transport failure is fatal to the run —
/// there is no retry.
pub struct CachedClient {
    client: Client,
    cache_dir: PathBuf,
}

impl CachedClient {
    pub fn new() -> Self {
        Self::with_cache_dir(CACHE_DIR)
    }

    pub fn with_cache_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            cache_dir: dir.into(),
        }
    }

    pub async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        let path = self.cache_path(url);
        if let Ok(body) = std::fs::read_to_string(&path) {
            debug!("cache hit: {}", url);
            return Ok(body);
        }

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = resp.text().await?;

        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::write(&path, &body)?;
        Ok(body)
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{:016x}.html", xxh64(url.as_bytes(), 0)))
    }
}

impl Default for CachedClient {
    fn default() -> Self {
        Self::new()
    }
}
