//! Label reconciliation
//!
//! The core of the tool: compute the label set a PR should carry from its
//! changed files and the rule set, then diff against the labels currently on
//! the issue and issue at most one replace call to close the gap.
//!
//! Label identity is case-insensitive (lowercased); display casing is
//! preserved, first seen wins. Only labels declared in the rule set are ever
//! removed; anything else on the issue is left untouched.

use crate::error::Result;
use crate::forge::ForgeClient;
use crate::rules::{LabelSet, RuleSet};
use tracing::{debug, info};

/// Compute the labels the PR should carry, given its changed files
///
/// Files are walked in listing order; for each file, rules are tried in
/// config order and the first rule with any matching pattern contributes its
/// labels, after which evaluation moves to the next file. Different files may
/// select different rules, so several rules' labels can all end up desired.
pub fn compute_desired_labels(changed_files: &[String], rules: &RuleSet) -> LabelSet {
    let mut desired = LabelSet::new();

    for file in changed_files {
        for rule in rules.rules() {
            if rule.matches(file) {
                for label in &rule.labels {
                    desired
                        .entry(label.to_lowercase())
                        .or_insert_with(|| label.clone());
                }
                debug!(%file, labels = ?rule.labels, "rule matched");
                break;
            }
        }
    }
    desired
}

/// Every managed label identity that is not desired is marked for removal
///
/// Together with the desired set this partitions the managed identities:
/// desired and remove are disjoint and their union is exactly the labels
/// declared across the rule set.
pub fn compute_remove_labels(rules: &RuleSet, desired: &LabelSet) -> LabelSet {
    rules
        .managed_labels()
        .into_iter()
        .filter(|(identity, _)| !desired.contains_key(identity))
        .collect()
}

/// The planned outcome of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    /// The full label list the issue should end up with
    pub labels: Vec<String>,
    /// Whether the new list differs from the current one
    pub changed: bool,
}

/// Diff the desired/remove sets against the currently attached labels
///
/// Currently attached labels survive unless their identity is marked for
/// removal; attached labels that are also desired keep their attached casing
/// and consume the desired entry. Whatever remains desired is appended.
pub fn plan_label_update(current: &[String], desired: &LabelSet, remove: &LabelSet) -> LabelUpdate {
    let mut desired = desired.clone();
    let mut labels = Vec::with_capacity(current.len() + desired.len());
    let mut changed = false;

    for label in current {
        let identity = label.to_lowercase();
        if remove.contains_key(&identity) {
            changed = true;
        } else {
            desired.remove(&identity);
            labels.push(label.clone());
        }
    }

    if !desired.is_empty() {
        changed = true;
        labels.extend(desired.into_values());
    }

    LabelUpdate { labels, changed }
}

/// What a reconciliation run did (or would do, in dry-run mode)
#[derive(Debug, Clone)]
pub struct ReconcileSummary {
    /// The label list computed for the issue
    pub labels: Vec<String>,
    /// Whether the computed list differed from the current one
    pub changed: bool,
    /// Whether the replace call was actually issued
    pub updated: bool,
}

/// Reconcile the issue's labels with the desired state
///
/// Fetches the current labels fresh, plans the minimal update, and issues a
/// single full replace call iff anything changed. Dry-run mode computes and
/// logs the would-be list but never calls the forge's write endpoint.
pub async fn reconcile(
    forge: &dyn ForgeClient,
    number: u64,
    desired: &LabelSet,
    remove: &LabelSet,
    dry_run: bool,
) -> Result<ReconcileSummary> {
    let current = forge.fetch_current_labels(number).await?;
    debug!(number, ?current, ?desired, ?remove, "reconciling labels");

    let update = plan_label_update(&current, desired, remove);

    if update.changed && !dry_run {
        forge.replace_labels(number, &update.labels).await?;
        info!(number, labels = ?update.labels, "labels updated");
    } else if update.changed {
        info!(number, labels = ?update.labels, "dry run: labels not updated");
    } else {
        info!(number, "labels already in sync");
    }

    Ok(ReconcileSummary {
        updated: update.changed && !dry_run,
        changed: update.changed,
        labels: update.labels,
    })
}
