//! Forge services
//!
//! The reconciler only needs four operations from the hosted forge: fetch the
//! rule file at a revision, list the files a PR changed, read the labels
//! currently on the issue, and atomically replace them. This trait keeps the
//! core testable against a mock while the GitHub implementation owns the
//! transport details.

mod github;

pub use github::{DEFAULT_TIMEOUT_SECS, GitHubClient, NO_TIMEOUT};

use crate::error::Result;
use async_trait::async_trait;

/// Forge operations needed to reconcile pull-request labels
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// Fetch the raw rule file content at a specific revision
    async fn fetch_config(&self, path: &str, reference: &str) -> Result<Vec<u8>>;

    /// Resolve the diff between two refs and return the touched file paths
    /// in listing order
    async fn fetch_changed_files(
        &self,
        compare_url: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>>;

    /// Read the labels currently attached to an issue (fresh, never cached)
    async fn fetch_current_labels(&self, number: u64) -> Result<Vec<String>>;

    /// Atomically set the issue's label list to exactly the given names
    async fn replace_labels(&self, number: u64, labels: &[String]) -> Result<()>;
}
