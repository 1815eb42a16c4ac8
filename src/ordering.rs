//! Default task visitation order.
//!
//! The solver visits tasks in a fixed order that must list every task after
//! all of its predecessors. [`precedence_order`] derives one with Kahn's
//! algorithm, using priority to choose among tasks that are ready at the
//! same time.
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::models::Task;
use crate::validation::{ValidationError, ValidationErrorKind};

/// Orders task IDs so that every task follows its predecessors.
///
/// Among ready tasks the highest `priority` goes first; equal priorities keep
/// input order.
///
/// # Errors
/// A [`ValidationError`] for duplicate task IDs, unknown predecessors, or a
/// precedence cycle.
///
/// # Example
/// ```
/// use window_sched::models::Task;
/// use window_sched::ordering::precedence_order;
///
/// let tasks = vec![
///     Task::new("pour").with_predecessor("dig"),
///     Task::new("dig"),
///     Task::new("survey").with_priority(5),
/// ];
/// let order = precedence_order(&tasks).unwrap();
/// assert_eq!(order, vec!["survey", "dig", "pour"]);
/// ```
pub fn precedence_order(tasks: &[Task]) -> Result<Vec<String>, ValidationError> {
    let mut position: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if position.insert(task.id.as_str(), i).is_some() {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    let mut in_degree = vec![0usize; tasks.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
    for (i, task) in tasks.iter().enumerate() {
        let mut preds: Vec<&str> = task.predecessors.iter().map(String::as_str).collect();
        preds.sort_unstable();
        preds.dedup();
        for pred in preds {
            let Some(&p) = position.get(pred) else {
                return Err(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Task '{}' references unknown predecessor '{pred}'", task.id),
                ));
            };
            successors[p].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BinaryHeap<(i32, Reverse<usize>)> = tasks
        .iter()
        .enumerate()
        .filter(|(i, _)| in_degree[*i] == 0)
        .map(|(i, t)| (t.priority, Reverse(i)))
        .collect();

    let mut order = Vec::with_capacity(tasks.len());
    while let Some((_, Reverse(i))) = ready.pop() {
        order.push(tasks[i].id.clone());
        for &s in &successors[i] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.push((tasks[s].priority, Reverse(s)));
            }
        }
    }

    if order.len() < tasks.len() {
        let stuck = in_degree
            .iter()
            .position(|&d| d > 0)
            .map(|i| tasks[i].id.as_str())
            .unwrap_or_default();
        return Err(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving task '{stuck}'"),
        ));
    }

    Ok(order)
}
