//! Per-task solve outcomes.
//!
//! Every task in a solve run ends with exactly one [`TaskOutcome`]: either a
//! complete allocation or the reason it was not scheduled. Each variant
//! carries only the fields relevant to that state.

use serde::{Deserialize, Serialize};

use super::{Time, TimeWindow};
use crate::error::TaskFailure;

/// A committed block of work on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInterval {
    /// Resource that performs the work.
    pub resource_id: String,
    /// Block start (inclusive).
    pub start: Time,
    /// Block end (exclusive).
    pub end: Time,
}

impl ResourceInterval {
    /// Creates a new interval.
    pub fn new(resource_id: impl Into<String>, start: Time, end: Time) -> Self {
        Self {
            resource_id: resource_id.into(),
            start,
            end,
        }
    }

    /// Length of the block.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }

    /// The block as a time window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

/// A successfully scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Resources that work on the task, in id order.
    pub resource_ids: Vec<String>,
    /// Earliest start among the committed intervals.
    pub start: Time,
    /// Latest end among the committed intervals.
    pub end: Time,
    /// Every committed interval, ordered by resource then start.
    pub intervals: Vec<ResourceInterval>,
}

impl ScheduledTask {
    /// Aggregates committed intervals. Returns `None` if there are none.
    pub fn from_intervals(mut intervals: Vec<ResourceInterval>) -> Option<Self> {
        intervals.sort_by(|a, b| (&a.resource_id, a.start).cmp(&(&b.resource_id, b.start)));
        let start = intervals.iter().map(|i| i.start).min()?;
        let end = intervals.iter().map(|i| i.end).max()?;

        let mut resource_ids: Vec<String> =
            intervals.iter().map(|i| i.resource_id.clone()).collect();
        resource_ids.dedup();

        Some(Self {
            resource_ids,
            start,
            end,
            intervals,
        })
    }

    /// Total committed effort across all resources.
    pub fn total_effort(&self) -> Time {
        self.intervals.iter().map(ResourceInterval::duration).sum()
    }
}

/// Terminal state of a task after a solve run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Not visited (absent from the task order).
    Pending,
    /// A predecessor has no committed end.
    Blocked { predecessor: String },
    /// No eligible resource had availability after the earliest start.
    NoResources,
    /// The allocator could not place the task.
    AllocationFailed { reason: String },
    /// Allocated and committed.
    Scheduled(ScheduledTask),
}

/// Outcome record for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier.
    pub task_id: String,
    /// What happened to the task.
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

impl TaskResult {
    /// Creates a placeholder for a task not yet processed.
    pub fn pending(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            outcome: TaskOutcome::Pending,
        }
    }

    /// Creates a scheduled result.
    pub fn scheduled(task_id: impl Into<String>, scheduled: ScheduledTask) -> Self {
        Self {
            task_id: task_id.into(),
            outcome: TaskOutcome::Scheduled(scheduled),
        }
    }

    /// Creates an unscheduled result from a recoverable failure.
    pub fn failed(task_id: impl Into<String>, failure: &TaskFailure) -> Self {
        let outcome = match failure {
            TaskFailure::PredecessorUnresolved { predecessor } => TaskOutcome::Blocked {
                predecessor: predecessor.clone(),
            },
            TaskFailure::NoAvailableResources => TaskOutcome::NoResources,
            TaskFailure::AllocationInfeasible(e) => TaskOutcome::AllocationFailed {
                reason: e.to_string(),
            },
        };
        Self {
            task_id: task_id.into(),
            outcome,
        }
    }

    /// Whether the task was allocated.
    pub fn is_scheduled(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Scheduled(_))
    }

    /// The allocation, if scheduled.
    pub fn scheduled_task(&self) -> Option<&ScheduledTask> {
        match &self.outcome {
            TaskOutcome::Scheduled(s) => Some(s),
            _ => None,
        }
    }

    /// Overall start, if scheduled.
    pub fn start(&self) -> Option<Time> {
        self.scheduled_task().map(|s| s.start)
    }

    /// Overall end, if scheduled.
    pub fn end(&self) -> Option<Time> {
        self.scheduled_task().map(|s| s.end)
    }

    /// Human-readable reason the task is unscheduled; `None` if scheduled.
    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            TaskOutcome::Scheduled(_) => None,
            TaskOutcome::Pending => Some("Task was not in the task order".to_string()),
            TaskOutcome::Blocked { predecessor } => Some(
                TaskFailure::PredecessorUnresolved {
                    predecessor: predecessor.clone(),
                }
                .to_string(),
            ),
            TaskOutcome::NoResources => Some(TaskFailure::NoAvailableResources.to_string()),
            TaskOutcome::AllocationFailed { reason } => Some(reason.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationError;

    fn sample() -> ScheduledTask {
        ScheduledTask::from_intervals(vec![
            ResourceInterval::new("R2", 5, 8),
            ResourceInterval::new("R1", 6, 9),
            ResourceInterval::new("R1", 0, 2),
        ])
        .unwrap()
    }

    #[test]
    fn test_scheduled_task_aggregation() {
        let s = sample();
        assert_eq!(s.start, 0);
        assert_eq!(s.end, 9);
        assert_eq!(s.resource_ids, vec!["R1", "R2"]);
        assert_eq!(s.total_effort(), 8);
        assert_eq!(s.intervals[0], ResourceInterval::new("R1", 0, 2));
        assert!(ScheduledTask::from_intervals(Vec::new()).is_none());
    }

    #[test]
    fn test_result_accessors() {
        let r = TaskResult::scheduled("T1", sample());
        assert!(r.is_scheduled());
        assert_eq!(r.start(), Some(0));
        assert_eq!(r.end(), Some(9));
        assert_eq!(r.error_message(), None);

        let p = TaskResult::pending("T2");
        assert!(!p.is_scheduled());
        assert_eq!(p.end(), None);
        assert!(p.error_message().is_some());
    }

    #[test]
    fn test_failed_results() {
        let blocked = TaskResult::failed(
            "T2",
            &TaskFailure::PredecessorUnresolved {
                predecessor: "T1".into(),
            },
        );
        assert_eq!(
            blocked.outcome,
            TaskOutcome::Blocked {
                predecessor: "T1".into()
            }
        );
        assert!(blocked.error_message().unwrap().contains("unscheduled predecessors"));

        let none = TaskResult::failed("T3", &TaskFailure::NoAvailableResources);
        assert_eq!(none.error_message().as_deref(), Some("No available resources"));

        let infeasible = TaskResult::failed(
            "T4",
            &TaskFailure::from(AllocationError::InsufficientAvailability),
        );
        assert_eq!(
            infeasible.error_message().as_deref(),
            Some("insufficient availability")
        );
    }

    #[test]
    fn test_result_serialization() {
        let r = TaskResult::failed("T3", &TaskFailure::NoAvailableResources);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["task_id"], "T3");
        assert_eq!(json["status"], "no_resources");

        let s = TaskResult::scheduled("T1", sample());
        let json = serde_json::to_string(&s).unwrap();
        let back: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
