//! Task model.
//!
//! A task is a unit of work with a required effort, a pool of eligible
//! resources, and precedence links to other tasks.
//!
//! Predecessors are stored as IDs and resolved against the task list at
//! solve time, so a task never owns another task.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::{AllocationConstraints, AssignmentPolicy, ResourceGroup, Time};

/// A task to be scheduled.
///
/// Compares and hashes by `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Required effort in time units (positive).
    pub duration: Time,
    /// Scheduling priority (higher = more important). Only used for ordering.
    pub priority: i32,
    /// Pool of eligible resources.
    pub resource_group: ResourceGroup,
    /// IDs of tasks that must finish before this one starts.
    pub predecessors: Vec<String>,
    /// Minimum gap between the latest predecessor end and this task's start.
    pub predecessor_delay: Time,
    /// Earliest start time. `None` = available immediately.
    pub release_time: Option<Time>,
    /// How many resources participate, and which.
    pub assignment: AssignmentPolicy,
    /// Restrictions on splitting the effort over time.
    pub constraints: AllocationConstraints,
    /// Domain-specific key-value metadata.
    pub attributes: HashMap<String, String>,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration: 0,
            priority: 0,
            resource_group: ResourceGroup::new(""),
            predecessors: Vec::new(),
            predecessor_delay: 0,
            release_time: None,
            assignment: AssignmentPolicy::Single,
            constraints: AllocationConstraints::default(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the required effort.
    pub fn with_duration(mut self, duration: Time) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the eligible resource pool.
    pub fn with_resource_group(mut self, group: ResourceGroup) -> Self {
        self.resource_group = group;
        self
    }

    /// Adds a predecessor task ID.
    pub fn with_predecessor(mut self, predecessor_id: impl Into<String>) -> Self {
        self.predecessors.push(predecessor_id.into());
        self
    }

    /// Sets the minimum delay after predecessors.
    pub fn with_predecessor_delay(mut self, delay: Time) -> Self {
        self.predecessor_delay = delay;
        self
    }

    /// Sets the release time (earliest start).
    pub fn with_release_time(mut self, release: Time) -> Self {
        self.release_time = Some(release);
        self
    }

    /// Sets the assignment policy.
    pub fn with_assignment(mut self, assignment: AssignmentPolicy) -> Self {
        self.assignment = assignment;
        self
    }

    /// Sets the allocation constraints.
    pub fn with_constraints(mut self, constraints: AllocationConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Resource IDs whose windows are queried for this task.
    pub fn eligible_resources(&self) -> Vec<&str> {
        self.assignment.eligible_resources(&self.resource_group)
    }

    /// Whether this task depends on any other.
    pub fn has_predecessors(&self) -> bool {
        !self.predecessors.is_empty()
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
