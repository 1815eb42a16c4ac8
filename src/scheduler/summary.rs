//! Solve-run summary metrics.
//!
//! Condenses the per-task results of a run into a few indicators.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest end among scheduled tasks |
//! | Scheduled / Unscheduled | Task counts by outcome |
//! | Total effort | Sum of committed interval lengths |
//! | Busy time | Committed time per resource |

use std::collections::BTreeMap;

use crate::models::{TaskResult, Time};

/// Aggregate view of a solve run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveSummary {
    /// Latest end among scheduled tasks (0 if none).
    pub makespan: Time,
    /// Number of scheduled tasks.
    pub scheduled_count: usize,
    /// Number of tasks left unscheduled (including pending).
    pub unscheduled_count: usize,
    /// Committed effort across all tasks.
    pub total_effort: Time,
    /// Committed time per resource.
    pub busy_time_by_resource: BTreeMap<String, Time>,
    /// (task id, reason) for every unscheduled task, in result order.
    pub failures: Vec<(String, String)>,
}

impl SolveSummary {
    /// Computes the summary from solver results.
    pub fn from_results(results: &[TaskResult]) -> Self {
        let mut summary = Self::default();

        for result in results {
            let Some(scheduled) = result.scheduled_task() else {
                summary.unscheduled_count += 1;
                if let Some(reason) = result.error_message() {
                    summary.failures.push((result.task_id.clone(), reason));
                }
                continue;
            };

            summary.scheduled_count += 1;
            summary.makespan = summary.makespan.max(scheduled.end);
            for interval in &scheduled.intervals {
                summary.total_effort += interval.duration();
                *summary
                    .busy_time_by_resource
                    .entry(interval.resource_id.clone())
                    .or_insert(0) += interval.duration();
            }
        }

        summary
    }

    /// Whether every task was scheduled.
    pub fn all_scheduled(&self) -> bool {
        self.unscheduled_count == 0
    }

    /// Busy fraction of a resource over `[0, horizon)`.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn utilization(&self, resource_id: &str, horizon: Time) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy = self
            .busy_time_by_resource
            .get(resource_id)
            .copied()
            .unwrap_or(0);
        Some(busy as f64 / horizon as f64)
    }
}
