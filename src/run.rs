//! Top-level control flow for one labeling run
//!
//! Strictly sequential: load rules, fetch changed files, compute desired
//! labels, reconcile. Any failure aborts the run; there is no retry path.

use crate::config::RunConfig;
use crate::error::Result;
use crate::event::PullRequestEvent;
use crate::forge::{ForgeClient, GitHubClient};
use crate::reconcile::{self, ReconcileSummary};
use crate::rules::RuleSet;
use tracing::{debug, info};

/// Execute a labeling run against the real GitHub API
pub async fn run(config: &RunConfig) -> Result<ReconcileSummary> {
    let event = PullRequestEvent::load(&config.event_path)?;
    let forge = GitHubClient::new(config.token.clone(), config.repo.clone(), config.timeout)?;
    run_with_forge(&forge, config, &event).await
}

/// Execute a labeling run against any forge implementation
pub async fn run_with_forge(
    forge: &dyn ForgeClient,
    config: &RunConfig,
    event: &PullRequestEvent,
) -> Result<ReconcileSummary> {
    let rules = load_rules(forge, config).await?;
    if rules.is_empty() {
        info!("no rules configured");
    }

    let files = forge
        .fetch_changed_files(
            &event.repository.compare_url,
            &event.pull_request.base.label,
            &event.pull_request.head.label,
        )
        .await?;
    debug!(count = files.len(), "changed files");

    let desired = reconcile::compute_desired_labels(&files, &rules);
    let remove = reconcile::compute_remove_labels(&rules, &desired);

    reconcile::reconcile(forge, event.number, &desired, &remove, config.debug).await
}

/// Load the rule set, either from the local checkout or from the forge at a
/// pinned revision
async fn load_rules(forge: &dyn ForgeClient, config: &RunConfig) -> Result<RuleSet> {
    let path = config.config_file.display().to_string();
    let bytes = if let Some(reference) = &config.config_ref {
        info!(%path, %reference, "fetching rules from forge");
        forge.fetch_config(&path, reference).await?
    } else {
        info!(%path, "reading rules");
        std::fs::read(&config.config_file)?
    };
    RuleSet::from_yaml(&bytes)
}
