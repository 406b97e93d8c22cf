//! GitHub forge implementation using reqwest

use crate::config::RepoId;
use crate::error::{Error, Result};
use crate::forge::ForgeClient;
use async_trait::async_trait;
use reqwest::header::LINK;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Timeout sentinel meaning "wait indefinitely"
pub const NO_TIMEOUT: u64 = 0;

const API_VERSION: &str = "2022-11-28";

/// GitHub REST client for label reconciliation
pub struct GitHubClient {
    client: Client,
    token: String,
    repo: RepoId,
    api_base: String,
}

#[derive(Deserialize)]
struct CompareFile {
    filename: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    files: Vec<CompareFile>,
}

#[derive(Deserialize)]
struct IssueLabel {
    name: String,
}

impl GitHubClient {
    /// Create a client for `api.github.com`
    ///
    /// `timeout_secs` applies to every request; [`NO_TIMEOUT`] disables it.
    pub fn new(token: String, repo: RepoId, timeout_secs: u64) -> Result<Self> {
        Self::with_api_base(token, repo, timeout_secs, "https://api.github.com")
    }

    /// Create a client against a custom API base URL (GitHub Enterprise,
    /// or a local server in tests)
    pub fn with_api_base(
        token: String,
        repo: RepoId,
        timeout_secs: u64,
        api_base: &str,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent("pr-labeler");
        if timeout_secs != NO_TIMEOUT {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::api("client setup", format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            repo,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{path}",
            self.api_base, self.repo.owner, self.repo.name
        )
    }

    fn get(&self, url: &str, accept: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn check_status(command: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::api(
                command,
                format!("unexpected status {status}: {body}"),
            ))
        }
    }

    /// Follow `Link: rel="next"` pagination, collecting every page into one list
    async fn get_paged<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next {
            let command = format!("GET {page_url}");
            let response = self
                .get(&page_url, "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| Error::api(&command, e))?;
            let response = Self::check_status(&command, response).await?;

            next = next_page_url(&response);
            let page: Vec<T> = response.json().await.map_err(|e| Error::api(&command, e))?;
            items.extend(page);
        }
        Ok(items)
    }
}

/// Extract the `rel="next"` URL from a Link header, if any
fn next_page_url(response: &Response) -> Option<String> {
    let link = response.headers().get(LINK)?.to_str().ok()?;
    for part in link.split(',') {
        let mut segments = part.split(';');
        let url = segments.next()?.trim();
        let is_next = segments.any(|s| s.trim() == "rel=\"next\"");
        if is_next && url.starts_with('<') && url.ends_with('>') {
            return Some(url[1..url.len() - 1].to_string());
        }
    }
    None
}

#[async_trait]
impl ForgeClient for GitHubClient {
    async fn fetch_config(&self, path: &str, reference: &str) -> Result<Vec<u8>> {
        let url = format!("{}?ref={reference}", self.repo_url(&format!("/contents/{path}")));
        let command = format!("GET {url}");
        debug!(path, reference, "fetching labeler config");

        let response = self
            .get(&url, "application/vnd.github.raw+json")
            .send()
            .await
            .map_err(|e| Error::api(&command, e))?;
        let response = Self::check_status(&command, response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::api(&command, e))?;

        debug!(len = bytes.len(), "fetched labeler config");
        Ok(bytes.to_vec())
    }

    async fn fetch_changed_files(
        &self,
        compare_url: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>> {
        let url = compare_url.replace("{base}", base).replace("{head}", head);
        let command = format!("GET {url}");
        debug!(base, head, "fetching changed files");

        let response = self
            .get(&url, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::api(&command, e))?;
        let response = Self::check_status(&command, response).await?;
        let compare: CompareResponse =
            response.json().await.map_err(|e| Error::api(&command, e))?;

        let files: Vec<String> = compare.files.into_iter().map(|f| f.filename).collect();
        debug!(count = files.len(), "fetched changed files");
        Ok(files)
    }

    async fn fetch_current_labels(&self, number: u64) -> Result<Vec<String>> {
        let url = format!(
            "{}?per_page=100",
            self.repo_url(&format!("/issues/{number}/labels"))
        );
        debug!(number, "fetching current labels");

        let labels: Vec<IssueLabel> = self.get_paged(&url).await?;
        let names: Vec<String> = labels.into_iter().map(|l| l.name).collect();
        debug!(number, count = names.len(), "fetched current labels");
        Ok(names)
    }

    async fn replace_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let url = self.repo_url(&format!("/issues/{number}/labels"));
        let command = format!("PUT {url}");
        debug!(number, ?labels, "replacing labels");

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&json!({ "labels": labels }))
            .send()
            .await
            .map_err(|e| Error::api(&command, e))?;
        Self::check_status(&command, response).await?;

        debug!(number, "replaced labels");
        Ok(())
    }
}
