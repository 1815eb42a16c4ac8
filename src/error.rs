//! Error types.
//!
//! Failures are split by who can recover from them:
//!
//! - [`CalendarError`]: a commit asked for time the calendar does not have.
//!   Surfacing this during a run means the allocator and the window manager
//!   disagree, so the solver treats it as fatal.
//! - [`AllocationError`]: the allocator found no combination of resources and
//!   windows for a task. Recoverable, recorded on the task.
//! - [`TaskFailure`]: the per-task reasons a task ends up unscheduled.
//! - [`SolverError`]: errors that abort construction or a run.

use thiserror::Error;

use crate::models::Time;
use crate::validation::ValidationError;

/// Rejected calendar mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The span to reserve has `start >= end`.
    #[error("cannot reserve empty span [{start}, {end})")]
    EmptySpan { start: Time, end: Time },
    /// The span is not fully contained in a single availability window.
    #[error("span [{start}, {end}) is not contained in a single availability window")]
    SpanNotContained { start: Time, end: Time },
    /// A commit named a resource the window manager does not own.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
}

/// Why the allocator could not place a task.
///
/// The `Display` text is the reason recorded on an unscheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Fewer resources have availability than the policy requires.
    #[error("not enough resources: {required} required, {available} available")]
    NotEnoughResources { required: usize, available: usize },
    /// A resource named by the policy has no availability.
    #[error("required resource '{0}' has no availability")]
    RequiredResourceUnavailable(String),
    /// Splitting is disallowed and no contiguous block is long enough.
    #[error("no contiguous window of length {duration}")]
    NoContiguousWindow { duration: Time },
    /// The windows do not hold enough working time.
    #[error("insufficient availability")]
    InsufficientAvailability,
    /// The assignment policy cannot be satisfied by any input.
    #[error("invalid assignment policy: {0}")]
    InvalidPolicy(String),
    /// The required effort is not positive.
    #[error("task duration must be positive, got {0}")]
    InvalidDuration(Time),
}

/// Recoverable reason a single task was not scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    /// A predecessor has no committed end.
    #[error("Task has unscheduled predecessors: '{predecessor}'")]
    PredecessorUnresolved { predecessor: String },
    /// None of the eligible resources has time at or after the earliest start.
    #[error("No available resources")]
    NoAvailableResources,
    /// Resources have time, but not in a shape the task can use.
    #[error("{0}")]
    AllocationInfeasible(#[from] AllocationError),
}

/// Errors that abort solver construction or a run.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A commit was rejected by a calendar. Indicates a bug, not a scheduling failure.
    #[error("invariant violation while committing task '{task_id}': {source}")]
    InvariantViolation {
        task_id: String,
        #[source]
        source: CalendarError,
    },
    /// Two supplied tasks share an id.
    #[error("duplicate task id '{0}'")]
    DuplicateTask(String),
    /// The visitation order names a task that was not supplied.
    #[error("task order references unknown task '{0}'")]
    UnknownTask(String),
    /// The visitation order lists a task more than once.
    #[error("task '{0}' appears more than once in the task order")]
    DuplicateInOrder(String),
    /// No valid visitation order could be derived.
    #[error("cannot derive task order: {0}")]
    Ordering(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_messages() {
        assert_eq!(
            AllocationError::InsufficientAvailability.to_string(),
            "insufficient availability"
        );
        let e = AllocationError::NotEnoughResources {
            required: 2,
            available: 1,
        };
        assert_eq!(e.to_string(), "not enough resources: 2 required, 1 available");
    }

    #[test]
    fn test_task_failure_wraps_allocation_reason() {
        let f: TaskFailure = AllocationError::NoContiguousWindow { duration: 20 }.into();
        assert_eq!(f.to_string(), "no contiguous window of length 20");
        assert_eq!(
            TaskFailure::NoAvailableResources.to_string(),
            "No available resources"
        );
    }

    #[test]
    fn test_invariant_violation_has_source() {
        use std::error::Error as _;

        let err = SolverError::InvariantViolation {
            task_id: "T1".into(),
            source: CalendarError::SpanNotContained { start: 3, end: 6 },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("T1"));
    }
}
