//! Mock forge client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_labeler::error::{Error, Result};
use pr_labeler::forge::ForgeClient;
use std::sync::Mutex;

/// Call record for `replace_labels`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceLabelsCall {
    pub number: u64,
    pub labels: Vec<String>,
}

/// Call record for `fetch_changed_files`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFilesCall {
    pub compare_url: String,
    pub base: String,
    pub head: String,
}

/// Simple mock forge client for testing
///
/// Features:
/// - Configurable responses for every fetch
/// - Call tracking for verification
/// - Error injection for failure path testing
/// - `replace_labels` updates the stored label state, so repeated
///   reconciliations observe their own writes
pub struct MockForgeClient {
    config_response: Mutex<Option<Vec<u8>>>,
    changed_files: Mutex<Vec<String>>,
    current_labels: Mutex<Vec<String>>,
    // Call tracking
    fetch_config_calls: Mutex<Vec<(String, String)>>,
    fetch_files_calls: Mutex<Vec<FetchFilesCall>>,
    fetch_labels_calls: Mutex<Vec<u64>>,
    replace_labels_calls: Mutex<Vec<ReplaceLabelsCall>>,
    // Error injection
    error_on_fetch_config: Mutex<Option<String>>,
    error_on_fetch_files: Mutex<Option<String>>,
    error_on_fetch_labels: Mutex<Option<String>>,
    error_on_replace_labels: Mutex<Option<String>>,
}

impl MockForgeClient {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            config_response: Mutex::new(None),
            changed_files: Mutex::new(Vec::new()),
            current_labels: Mutex::new(Vec::new()),
            fetch_config_calls: Mutex::new(Vec::new()),
            fetch_files_calls: Mutex::new(Vec::new()),
            fetch_labels_calls: Mutex::new(Vec::new()),
            replace_labels_calls: Mutex::new(Vec::new()),
            error_on_fetch_config: Mutex::new(None),
            error_on_fetch_files: Mutex::new(None),
            error_on_fetch_labels: Mutex::new(None),
            error_on_replace_labels: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Set the rule file content returned by `fetch_config`
    pub fn set_config(&self, yaml: &str) {
        *self.config_response.lock().unwrap() = Some(yaml.as_bytes().to_vec());
    }

    /// Set the changed-file listing
    pub fn set_changed_files(&self, files: &[&str]) {
        *self.changed_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    /// Set the labels currently attached to the issue
    pub fn set_current_labels(&self, labels: &[&str]) {
        *self.current_labels.lock().unwrap() = labels.iter().map(ToString::to_string).collect();
    }

    // === Error injection ===

    /// Make `fetch_config` return an error
    pub fn fail_fetch_config(&self, msg: &str) {
        *self.error_on_fetch_config.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `fetch_changed_files` return an error
    pub fn fail_fetch_files(&self, msg: &str) {
        *self.error_on_fetch_files.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `fetch_current_labels` return an error
    pub fn fail_fetch_labels(&self, msg: &str) {
        *self.error_on_fetch_labels.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `replace_labels` return an error
    pub fn fail_replace_labels(&self, msg: &str) {
        *self.error_on_replace_labels.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    /// Calls made to `fetch_config` as (path, ref) pairs
    pub fn fetch_config_calls(&self) -> Vec<(String, String)> {
        self.fetch_config_calls.lock().unwrap().clone()
    }

    /// Calls made to `fetch_changed_files`
    pub fn fetch_files_calls(&self) -> Vec<FetchFilesCall> {
        self.fetch_files_calls.lock().unwrap().clone()
    }

    /// Issue numbers passed to `fetch_current_labels`
    pub fn fetch_labels_calls(&self) -> Vec<u64> {
        self.fetch_labels_calls.lock().unwrap().clone()
    }

    /// Calls made to `replace_labels`
    pub fn replace_labels_calls(&self) -> Vec<ReplaceLabelsCall> {
        self.replace_labels_calls.lock().unwrap().clone()
    }

    /// The label state after any replacements
    pub fn labels_now(&self) -> Vec<String> {
        self.current_labels.lock().unwrap().clone()
    }
}

impl Default for MockForgeClient {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(error: &Mutex<Option<String>>) -> Result<()> {
    match error.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::api("mock", msg)),
        None => Ok(()),
    }
}

#[async_trait]
impl ForgeClient for MockForgeClient {
    async fn fetch_config(&self, path: &str, reference: &str) -> Result<Vec<u8>> {
        injected(&self.error_on_fetch_config)?;
        self.fetch_config_calls
            .lock()
            .unwrap()
            .push((path.to_string(), reference.to_string()));
        self.config_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::api("GET contents", "no config response configured"))
    }

    async fn fetch_changed_files(
        &self,
        compare_url: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<String>> {
        injected(&self.error_on_fetch_files)?;
        self.fetch_files_calls.lock().unwrap().push(FetchFilesCall {
            compare_url: compare_url.to_string(),
            base: base.to_string(),
            head: head.to_string(),
        });
        Ok(self.changed_files.lock().unwrap().clone())
    }

    async fn fetch_current_labels(&self, number: u64) -> Result<Vec<String>> {
        injected(&self.error_on_fetch_labels)?;
        self.fetch_labels_calls.lock().unwrap().push(number);
        Ok(self.current_labels.lock().unwrap().clone())
    }

    async fn replace_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        injected(&self.error_on_replace_labels)?;
        self.replace_labels_calls
            .lock()
            .unwrap()
            .push(ReplaceLabelsCall {
                number,
                labels: labels.to_vec(),
            });
        *self.current_labels.lock().unwrap() = labels.to_vec();
        Ok(())
    }
}
