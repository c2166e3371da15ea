//! Remote fetch collaborator.
//!
//! The engine never touches the network itself. It calls an injected
//! [`RemoteFetcher`] and degrades every failure to a warning:
//!
//! 1. batch fetch of all known remote sources (if the fetcher supports it)
//! 2. per-file fetch of anything the batch did not return
//! 3. skip with a [`Warning::FetchFailed`](crate::warning::Warning::FetchFailed)
//!
//! No strategy is retried.

mod gh;
mod reader;

pub use gh::{GhCliFetcher, OfflineFetcher};
pub use reader::ContentReader;

use std::collections::BTreeMap;
use thiserror::Error;

/// Why a remote operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetcher has no batch mode.
    #[error("batch fetch is not supported")]
    Unsupported,

    /// The URL is not something this fetcher understands.
    #[error("unsupported URL '{0}'")]
    UnsupportedUrl(String),

    /// The fetch ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Injected network collaborator.
pub trait RemoteFetcher {
    /// Fetch one document.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch many documents at once. Missing keys in the returned map are
    /// fetched individually afterwards.
    fn fetch_batch(&self, _urls: &[String]) -> Result<BTreeMap<String, String>, FetchError> {
        Err(FetchError::Unsupported)
    }

    /// List every file blob URL under a GitHub tree URL, recursively.
    fn list_directory(&self, tree_url: &str) -> Result<Vec<String>, FetchError>;
}
