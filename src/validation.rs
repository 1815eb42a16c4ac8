//! Input validation for scheduling problems.
//!
//! Checks structural integrity of tasks and resources before solving.
//! Detects:
//! - Duplicate IDs
//! - Missing resource references and inconsistent resource groups
//! - Non-positive durations, negative delays or times, unsatisfiable policies
//! - Circular precedence dependencies (DAG validation)
//!
//! The solver itself tolerates most of these (an unknown resource simply
//! has no availability), so validation is a separate, opt-in pass.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{AssignmentPolicy, Resource, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task references a resource that doesn't exist.
    InvalidResourceReference,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A task references a predecessor that doesn't exist.
    InvalidPredecessor,
    /// A task's duration is not positive.
    InvalidDuration,
    /// A task's predecessor delay is negative.
    InvalidDelay,
    /// A calendar window or release time lies before time zero.
    InvalidTime,
    /// A task's assignment policy can never be satisfied.
    InvalidPolicy,
    /// Two tasks define the same resource group with different members.
    ConflictingGroup,
    /// A task has no eligible resources.
    EmptyResourceGroup,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling problem.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No duplicate resource IDs
/// 3. Positive durations, non-negative predecessor delays and release times
/// 4. Calendar windows at or after time zero
/// 5. Assignment policies with satisfiable counts
/// 6. Every task has eligible resources, all of which exist
/// 7. Named resources belong to the task's group
/// 8. Resource groups sharing an ID have the same members
/// 9. All predecessor references point to existing tasks
/// 10. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], resources: &[Resource]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut resource_ids = HashSet::new();
    for r in resources {
        if !resource_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate resource ID: {}", r.id),
            ));
        }
        if let Some(w) = r.calendar.windows().first().filter(|w| w.start < 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTime,
                format!(
                    "Resource '{}' has a window starting at negative time {}",
                    r.id, w.start
                ),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    let mut groups: HashMap<&str, (Vec<&str>, &str)> = HashMap::new();

    for task in tasks {
        if task.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Task '{}' has non-positive duration {}", task.id, task.duration),
            ));
        }

        if task.predecessor_delay < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDelay,
                format!(
                    "Task '{}' has negative predecessor delay {}",
                    task.id, task.predecessor_delay
                ),
            ));
        }

        if let Some(release) = task.release_time.filter(|&t| t < 0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTime,
                format!("Task '{}' has negative release time {release}", task.id),
            ));
        }

        if let Err(e) = task.assignment.count_bounds() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPolicy,
                format!("Task '{}': {e}", task.id),
            ));
        }

        let eligible = task.eligible_resources();
        if eligible.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyResourceGroup,
                format!("Task '{}' has no eligible resources", task.id),
            ));
        }
        for id in &eligible {
            if !resource_ids.contains(id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Task '{}' references unknown resource '{id}'", task.id),
                ));
            }
        }

        if let AssignmentPolicy::Named(_) = &task.assignment {
            if !task.resource_group.resource_ids.is_empty() {
                for id in task.assignment.required_resources() {
                    if !task.resource_group.contains(id) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidPolicy,
                            format!(
                                "Task '{}' names resource '{id}' outside group '{}'",
                                task.id, task.resource_group.id
                            ),
                        ));
                    }
                }
            }
        }

        let group = &task.resource_group;
        if !group.id.is_empty() {
            let mut members = group.unique_resource_ids();
            members.sort_unstable();
            match groups.entry(group.id.as_str()) {
                Entry::Occupied(known) => {
                    let (known_members, first_task) = known.get();
                    if *known_members != members {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::ConflictingGroup,
                            format!(
                                "Resource group '{}' differs between tasks '{first_task}' and '{}'",
                                group.id, task.id
                            ),
                        ));
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((members, task.id.as_str()));
                }
            }
        }

        for pred in &task.predecessors {
            if !task_ids.contains(pred.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Task '{}' references unknown predecessor '{pred}'", task.id),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(tasks) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists. Roots are visited in
/// input order so the reported task is stable.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(tasks: &[Task]) -> Option<ValidationError> {
    // predecessor -> successors
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in tasks {
        for pred in &task.predecessors {
            adj.entry(pred.as_str()).or_default().push(task.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for task in tasks {
        let node = task.id.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // back edge
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceGroup;

    fn sample_resources() -> Vec<Resource> {
        vec![
            Resource::new("R1").with_name("Welder").with_window(0, 10),
            Resource::new("R2").with_name("Fitter").with_window(0, 10),
        ]
    }

    fn crew() -> ResourceGroup {
        ResourceGroup::new("crew").with_resources(["R1", "R2"])
    }

    fn task(id: &str) -> Task {
        Task::new(id).with_duration(3).with_resource_group(crew())
    }

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_input() {
        let tasks = vec![
            task("T1"),
            task("T2").with_predecessor("T1").with_predecessor_delay(2),
            task("T3").with_assignment(AssignmentPolicy::named(["R2"])),
        ];
        assert!(validate_input(&tasks, &sample_resources()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![task("T1"), task("T1")];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert!(kinds(&errors).contains(&ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_duplicate_resource_id() {
        let resources = vec![Resource::new("R1"), Resource::new("R1"), Resource::new("R2")];
        let errors = validate_input(&[task("T1")], &resources).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_invalid_duration_and_delay() {
        let tasks = vec![
            task("T1").with_duration(0),
            task("T2").with_predecessor("T1").with_predecessor_delay(-1),
        ];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        let k = kinds(&errors);
        assert!(k.contains(&ValidationErrorKind::InvalidDuration));
        assert!(k.contains(&ValidationErrorKind::InvalidDelay));
    }

    #[test]
    fn test_negative_times() {
        let resources = vec![
            Resource::new("R1").with_window(-5, 10),
            Resource::new("R2").with_window(0, 10),
        ];
        let tasks = vec![task("T1").with_release_time(-1), task("T2").with_release_time(0)];
        let errors = validate_input(&tasks, &resources).unwrap_err();
        assert_eq!(
            kinds(&errors),
            vec![ValidationErrorKind::InvalidTime, ValidationErrorKind::InvalidTime]
        );
        assert!(errors[0].message.contains("R1"));
        assert!(errors[1].message.contains("T1"));
    }

    #[test]
    fn test_invalid_policy() {
        let tasks = vec![
            task("T1").with_assignment(AssignmentPolicy::Count(0)),
            task("T2").with_assignment(AssignmentPolicy::range(3, 2)),
            task("T3").with_assignment(AssignmentPolicy::named(["R1", "R9"])),
        ];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        let policy_errors = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::InvalidPolicy)
            .count();
        // zero count, inverted range, R9 outside the group
        assert_eq!(policy_errors, 3);
        assert!(kinds(&errors).contains(&ValidationErrorKind::InvalidResourceReference));
    }

    #[test]
    fn test_invalid_resource_reference() {
        let tasks = vec![Task::new("T1")
            .with_duration(1)
            .with_resource_group(ResourceGroup::new("g").with_resource("NONEXISTENT"))];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidResourceReference]);
    }

    #[test]
    fn test_empty_resource_group() {
        let tasks = vec![Task::new("T1").with_duration(1)];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::EmptyResourceGroup]);
    }

    #[test]
    fn test_conflicting_group() {
        let tasks = vec![
            task("T1"),
            Task::new("T2")
                .with_duration(1)
                .with_resource_group(ResourceGroup::new("crew").with_resource("R1")),
            // same members in another order is consistent
            Task::new("T3")
                .with_duration(1)
                .with_resource_group(ResourceGroup::new("crew").with_resources(["R2", "R1"])),
        ];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::ConflictingGroup]);
        assert!(errors[0].message.contains("T2"));
    }

    #[test]
    fn test_invalid_predecessor() {
        let tasks = vec![task("T1").with_predecessor("NONEXISTENT")];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidPredecessor]);
    }

    #[test]
    fn test_cyclic_dependency() {
        // T1 → T2 → T3 → T1
        let tasks = vec![
            task("T1").with_predecessor("T3"),
            task("T2").with_predecessor("T1"),
            task("T3").with_predecessor("T2"),
        ];
        let errors = validate_input(&tasks, &sample_resources()).unwrap_err();
        assert_eq!(kinds(&errors), vec![ValidationErrorKind::CyclicDependency]);
        assert!(errors[0].message.contains("T1"));
    }

    #[test]
    fn test_no_cycle_in_chain() {
        let tasks = vec![
            task("T1"),
            task("T2").with_predecessor("T1"),
            task("T3").with_predecessor("T2").with_predecessor("T1"),
        ];
        assert!(validate_input(&tasks, &sample_resources()).is_ok());
    }

    #[test]
    fn test_multiple_errors() {
        let tasks = vec![Task::new("T1"), task("T2").with_predecessor("T9")];
        let errors = validate_input(&tasks, &[]).unwrap_err();
        assert!(errors.len() >= 4);
    }

    #[test]
    fn test_error_display() {
        let e = ValidationError::new(ValidationErrorKind::CyclicDependency, "cycle at 'T1'");
        assert_eq!(e.to_string(), "cycle at 'T1'");
    }
}
