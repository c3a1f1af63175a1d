use crate::core::batcher::MetadataFetcher;
use crate::core::filter::filter_by_location;
use crate::core::paginator::Paginator;
use crate::core::task_pool::TaskPool;
use crate::core::{
    AccessToken, ConfigProvider, ErrorEvent, ErrorSink, GraphApi, Member, RemovalTask, RunReport,
    RunSummary, Selector,
};
use crate::utils::error::{PruneError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Asks the token-debug endpoint whether `credential` is usable.
/// Any outcome other than a confirmed valid token is fatal.
pub async fn validate_credential<A: GraphApi + ?Sized>(
    api: &A,
    credential: &AccessToken,
    sink: &dyn ErrorSink,
) -> Result<()> {
    match api.debug_token(credential).await {
        Ok(true) => {
            println!("Access Token is valid.");
            Ok(())
        }
        Ok(false) => {
            println!("Invalid Access Token. Please check your credentials.");
            Err(PruneError::CredentialError {
                message: "token-debug reported the token as invalid".to_string(),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Token validation request failed");
            sink.record(ErrorEvent::error(format!(
                "Error validating Access Token: {}",
                e
            )));
            println!("Failed to validate Access Token. Check the error log for details.");
            Err(PruneError::CredentialError {
                message: format!("token validation failed: {}", e),
            })
        }
    }
}

/// Joins listing entries with their looked-up profiles, keeping listing order.
/// Entries whose lookup failed are left out.
pub fn enrich(members: &[Member], metadata: &HashMap<String, Member>) -> Vec<Member> {
    members
        .iter()
        .filter_map(|member| {
            metadata.get(&member.id).map(|profile| Member {
                id: member.id.clone(),
                name: profile.name.clone().or_else(|| member.name.clone()),
                location: profile.location.clone(),
            })
        })
        .collect()
}

pub struct PruneEngine<A: GraphApi, S: Selector, C: ConfigProvider> {
    api: A,
    selector: S,
    config: C,
    sink: Arc<dyn ErrorSink>,
}

impl<A: GraphApi, S: Selector, C: ConfigProvider> PruneEngine<A, S, C> {
    pub fn new(api: A, selector: S, config: C, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            api,
            selector,
            config,
            sink,
        }
    }

    /// validate → fetch → enrich → filter → select → remove.
    ///
    /// Fails only on credential rejection or an empty initial fetch.
    pub async fn run(&mut self) -> Result<RunReport> {
        let credential = AccessToken::new(self.config.access_token());
        let group_id = self.config.group_id().to_string();
        let sink = self.sink.as_ref();
        let mut report = RunReport::default();

        validate_credential(&self.api, &credential, sink).await?;

        // Fetch
        println!("Fetching group members...");
        let members = Paginator::new(&self.api, sink)
            .with_policy(self.config.partial_policy())
            .fetch_all(&group_id, &credential, self.config.page_size())
            .await;
        if members.is_empty() {
            println!("No members fetched. Exiting.");
            return Err(PruneError::NoMembersError { group_id });
        }
        report.fetched = members.len();
        println!("Total members fetched: {}", members.len());

        // Enrich + filter
        let target = self.config.location();
        println!(
            "Filtering {} members by location: {}...",
            members.len(),
            target
        );
        let ids: Vec<String> = members.iter().map(|m| m.id.clone()).collect();
        let metadata = MetadataFetcher::new(&self.api, sink)
            .fetch_metadata(&ids, &credential, self.config.batch_size())
            .await;
        let enriched = enrich(&members, &metadata);
        report.enriched = enriched.len();

        let matched = filter_by_location(&enriched, target, self.config.location_match());
        report.matched = matched.len();
        println!("Total filtered members: {}", matched.len());
        tracing::info!(
            fetched = report.fetched,
            enriched = report.enriched,
            matched = report.matched,
            "Location filter applied"
        );

        // Select
        let selected = self.selector.select(&matched)?;
        report.selected = selected.len();
        println!("Selected {} members for removal.", selected.len());
        if selected.is_empty() {
            println!("No members selected for removal. Exiting.");
            return Ok(report);
        }

        // Remove
        let tasks: Vec<RemovalTask> = selected
            .iter()
            .map(|member| RemovalTask::new(group_id.as_str(), member.id.as_str()))
            .collect();
        let outcomes = TaskPool::new(&self.api, sink, self.config.concurrency())
            .remove_all(tasks, &credential)
            .await;

        let summary = RunSummary::from_outcomes(&outcomes);
        println!(
            "Removed {} of {} members ({} failed).",
            summary.succeeded, summary.attempted, summary.failed
        );
        if summary.failed > 0 {
            println!(
                "Failed removals are listed in {}.",
                self.config.error_log_path()
            );
        }
        report.removal = Some(summary);

        Ok(report)
    }
}
