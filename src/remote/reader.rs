//! Content reading with the remote fallback chain.

use super::{FetchError, RemoteFetcher};
use crate::source::Identity;
use crate::warning::Warning;
use std::collections::{HashMap, HashSet};

/// Reads source content for one run.
///
/// Remote content is cached by URL, and a URL that failed is not fetched
/// again.
pub struct ContentReader<'a> {
    fetcher: &'a dyn RemoteFetcher,
    cache: HashMap<String, String>,
    failed: HashMap<String, String>,
    batched: HashSet<String>,
}

impl<'a> ContentReader<'a> {
    pub fn new(fetcher: &'a dyn RemoteFetcher) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
            failed: HashMap::new(),
            batched: HashSet::new(),
        }
    }

    pub fn fetcher(&self) -> &'a dyn RemoteFetcher {
        self.fetcher
    }

    /// Try to fetch every URL in one batch.
    ///
    /// Never fails: whatever the batch does not return is fetched one by one
    /// on first read.
    pub fn prefetch(&mut self, urls: &[String]) {
        let pending: Vec<String> = urls
            .iter()
            .filter(|u| !self.cache.contains_key(*u) && !self.batched.contains(*u))
            .cloned()
            .collect();
        if pending.is_empty() {
            return;
        }
        self.batched.extend(pending.iter().cloned());

        match self.fetcher.fetch_batch(&pending) {
            Ok(fetched) => {
                tracing::debug!(
                    requested = pending.len(),
                    fetched = fetched.len(),
                    "batch fetch complete"
                );
                self.cache.extend(fetched);
            }
            Err(FetchError::Unsupported) => {
                tracing::debug!("fetcher has no batch mode, fetching per file");
            }
            Err(err) => {
                tracing::debug!(error = %err, "batch fetch failed, falling back to per-file fetch");
            }
        }
    }

    /// Read the content behind an identity.
    pub fn read(&mut self, identity: &Identity) -> Result<String, Warning> {
        match identity {
            Identity::Local(path) => {
                std::fs::read_to_string(path).map_err(|e| Warning::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            Identity::Remote(url) => self.read_remote(url),
        }
    }

    fn read_remote(&mut self, url: &str) -> Result<String, Warning> {
        if let Some(content) = self.cache.get(url) {
            return Ok(content.clone());
        }
        if let Some(reason) = self.failed.get(url) {
            return Err(Warning::FetchFailed {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }

        match self.fetcher.fetch(url) {
            Ok(content) => {
                self.cache.insert(url.to_string(), content.clone());
                Ok(content)
            }
            Err(err) => {
                let reason = err.to_string();
                self.failed.insert(url.to_string(), reason.clone());
                Err(Warning::FetchFailed {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }
}
