//! Heuristic window-allocation solver.
//!
//! # Algorithm
//!
//! For each task ID in the supplied order:
//! 1. Earliest start = max(start time, release time,
//!    max over predecessors of (end + `predecessor_delay`)). A predecessor
//!    without a committed end blocks the task.
//! 2. Query the window manager for the eligible resources' windows at or
//!    after the earliest start. No windows ⇒ no resources.
//! 3. Ask the allocator for a proposal.
//! 4. Commit the proposal and record the scheduled outcome.
//!
//! A failing task never aborts the run; its successors inherit a blocked
//! outcome. Only a rejected commit is fatal, since it means the allocator
//! proposed time the calendars do not have.
//!
//! Processing is strictly sequential: each commit changes the availability
//! seen by every later task.

use std::collections::{HashMap, HashSet};

use tracing::{debug, error, info, warn};

use super::{TaskAllocator, WindowManager};
use crate::config::SolverConfig;
use crate::error::{SolverError, TaskFailure};
use crate::models::{Resource, Task, TaskResult, Time};
use crate::ordering::precedence_order;

/// Greedy, order-driven solver over resource calendars.
///
/// # Example
///
/// ```
/// use window_sched::models::{Resource, ResourceGroup, Task};
/// use window_sched::scheduler::HeuristicSolver;
///
/// let resources = vec![Resource::new("R").with_window(0, 4).with_window(5, 10)];
/// let group = ResourceGroup::new("G").with_resource("R");
/// let tasks = vec![
///     Task::new("T1").with_duration(3).with_resource_group(group.clone()),
///     Task::new("T2")
///         .with_duration(2)
///         .with_resource_group(group)
///         .with_predecessor("T1")
///         .with_predecessor_delay(2),
/// ];
///
/// let mut solver = HeuristicSolver::new(tasks, resources, vec!["T1".into(), "T2".into()]).unwrap();
/// let results = solver.solve().unwrap();
/// assert_eq!(results[0].end(), Some(3));
/// assert_eq!(results[1].start(), Some(5));
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicSolver {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    order: Vec<String>,
    allocator: TaskAllocator,
    window_manager: WindowManager,
    config: SolverConfig,
    results: Vec<TaskResult>,
    solved: bool,
}

impl HeuristicSolver {
    /// Creates a solver with an externally supplied visitation order.
    ///
    /// # Errors
    /// - [`SolverError::DuplicateTask`] if two tasks share an id.
    /// - [`SolverError::UnknownTask`] if the order names an unknown task.
    /// - [`SolverError::DuplicateInOrder`] if the order repeats a task.
    pub fn new(
        tasks: Vec<Task>,
        resources: Vec<Resource>,
        order: Vec<String>,
    ) -> Result<Self, SolverError> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            if index.insert(task.id.clone(), i).is_some() {
                return Err(SolverError::DuplicateTask(task.id.clone()));
            }
        }

        let mut seen = HashSet::with_capacity(order.len());
        for id in &order {
            if !index.contains_key(id) {
                return Err(SolverError::UnknownTask(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(SolverError::DuplicateInOrder(id.clone()));
            }
        }

        let config = SolverConfig::default();
        let results = tasks.iter().map(|t| TaskResult::pending(&t.id)).collect();
        Ok(Self {
            allocator: TaskAllocator::new().with_max_combinations(config.max_combinations),
            window_manager: WindowManager::new(&resources),
            tasks,
            index,
            order,
            config,
            results,
            solved: false,
        })
    }

    /// Creates a solver that visits tasks in precedence order, highest
    /// priority first among ready tasks.
    pub fn with_default_order(
        tasks: Vec<Task>,
        resources: Vec<Resource>,
    ) -> Result<Self, SolverError> {
        let order = precedence_order(&tasks)?;
        Self::new(tasks, resources, order)
    }

    /// Sets the solver configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.allocator = TaskAllocator::new().with_max_combinations(config.max_combinations);
        self.config = config;
        self
    }

    /// The visitation order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Calendars as they stand (remaining availability after commits).
    pub fn window_manager(&self) -> &WindowManager {
        &self.window_manager
    }

    /// Runs the solver and returns one result per task, in input order.
    ///
    /// Calling `solve` again returns the same results without re-running.
    ///
    /// # Errors
    /// [`SolverError::InvariantViolation`] if a commit is rejected.
    pub fn solve(&mut self) -> Result<Vec<TaskResult>, SolverError> {
        if self.solved {
            debug!("solver already ran, returning recorded results");
            return Ok(self.results.clone());
        }
        info!(tasks = self.tasks.len(), ordered = self.order.len(), "starting heuristic solve");

        for pos in 0..self.order.len() {
            let idx = self.index[&self.order[pos]];
            let result = self.process_task(idx)?;
            self.results[idx] = result;
        }
        self.solved = true;

        let scheduled = self.results.iter().filter(|r| r.is_scheduled()).count();
        info!(
            scheduled,
            unscheduled = self.results.len() - scheduled,
            "heuristic solve finished"
        );
        Ok(self.results.clone())
    }

    fn process_task(&mut self, idx: usize) -> Result<TaskResult, SolverError> {
        let task = &self.tasks[idx];

        let earliest_start = match self.earliest_start(task) {
            Ok(t) => t,
            Err(failure) => return Ok(self.unscheduled(task, failure)),
        };
        debug!(task_id = %task.id, earliest_start, "processing task");

        let windows = self
            .window_manager
            .windows_from(task.eligible_resources(), earliest_start);
        if windows.is_empty() {
            return Ok(self.unscheduled(task, TaskFailure::NoAvailableResources));
        }

        let allocation = match self.allocator.allocate(
            &windows,
            &task.assignment,
            task.duration,
            &task.constraints,
        ) {
            Ok(a) => a,
            Err(e) => return Ok(self.unscheduled(task, e.into())),
        };

        if let Err(source) = self.window_manager.commit(allocation.segments()) {
            error!(task_id = %task.id, %source, "allocation rejected by calendar");
            return Err(SolverError::InvariantViolation {
                task_id: task.id.clone(),
                source,
            });
        }

        let scheduled = allocation.to_scheduled();
        debug!(
            task_id = %task.id,
            resources = ?scheduled.resource_ids,
            start = scheduled.start,
            end = scheduled.end,
            "task scheduled"
        );
        Ok(TaskResult::scheduled(&task.id, scheduled))
    }

    /// Latest predecessor end plus delay, bounded below by the floors.
    fn earliest_start(&self, task: &Task) -> Result<Time, TaskFailure> {
        let floor = task
            .release_time
            .unwrap_or(self.config.start_time)
            .max(self.config.start_time);

        let mut earliest = floor;
        for pred in &task.predecessors {
            let end = self
                .index
                .get(pred)
                .and_then(|&i| self.results[i].end())
                .ok_or_else(|| TaskFailure::PredecessorUnresolved {
                    predecessor: pred.clone(),
                })?;
            earliest = earliest.max(end.saturating_add(task.predecessor_delay));
        }
        Ok(earliest)
    }

    fn unscheduled(&self, task: &Task, failure: TaskFailure) -> TaskResult {
        warn!(task_id = %task.id, reason = %failure, "task not scheduled");
        TaskResult::failed(&task.id, &failure)
    }
}
