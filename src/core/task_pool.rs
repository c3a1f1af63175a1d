use crate::core::{AccessToken, ErrorEvent, ErrorSink, GraphApi, RemovalOutcome, RemovalTask};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs removal calls with at most `concurrency` in flight.
///
/// Every submitted task yields exactly one [`RemovalOutcome`]. Transport
/// faults, rejected statuses and even a panicking call become `Failure`
/// outcomes; nothing short-circuits the batch. Outcomes come back in
/// completion order.
pub struct TaskPool<'a, A: GraphApi + ?Sized> {
    api: &'a A,
    sink: &'a dyn ErrorSink,
    concurrency: usize,
}

impl<'a, A: GraphApi + ?Sized> TaskPool<'a, A> {
    pub fn new(api: &'a A, sink: &'a dyn ErrorSink, concurrency: usize) -> Self {
        Self {
            api,
            sink,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub async fn remove_all(
        &self,
        tasks: Vec<RemovalTask>,
        credential: &AccessToken,
    ) -> Vec<RemovalOutcome> {
        let total = tasks.len();
        println!("Initiating removal of {} members...", total);
        tracing::info!(total, concurrency = self.concurrency, "Starting member removal");

        // buffer_unordered 只在前一個完成後才放入下一個；結果只由這個 task 收集
        let outcomes: Vec<RemovalOutcome> = stream::iter(tasks)
            .map(|task| self.remove_one(task, credential))
            .buffer_unordered(self.concurrency)
            .inspect(|outcome| self.report(outcome))
            .collect()
            .await;

        debug_assert_eq!(outcomes.len(), total);
        println!("Member removal process completed.");
        outcomes
    }

    async fn remove_one(&self, task: RemovalTask, credential: &AccessToken) -> RemovalOutcome {
        tracing::debug!(group_id = %task.group_id, member_id = %task.member_id, "Removing member");

        let attempt = AssertUnwindSafe(self.api.delete_member(
            &task.group_id,
            &task.member_id,
            credential,
        ))
        .catch_unwind()
        .await;

        let RemovalTask { member_id, .. } = task;
        match attempt {
            Ok(Ok(response)) if response.accepted() => RemovalOutcome::Success { member_id },
            Ok(Ok(response)) => RemovalOutcome::Failure {
                member_id,
                reason: format!("{} - {}", response.status, response.body),
            },
            Ok(Err(e)) => RemovalOutcome::Failure {
                member_id,
                reason: e.to_string(),
            },
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                RemovalOutcome::Failure {
                    member_id,
                    reason: format!("Unhandled exception: {}", detail),
                }
            }
        }
    }

    fn report(&self, outcome: &RemovalOutcome) {
        match outcome {
            RemovalOutcome::Success { member_id } => {
                println!("Successfully removed user {}", member_id);
            }
            RemovalOutcome::Failure { member_id, reason } => {
                tracing::warn!(member_id = %member_id, reason = %reason, "Member removal failed");
                self.sink.record(ErrorEvent::error(format!(
                    "Error removing user {}: {}",
                    member_id, reason
                )));
                println!(
                    "Failed to remove user {}. Check the log for details.",
                    member_id
                );
            }
        }
    }
}
