//! Heuristic window-allocation scheduler for resource-constrained projects.
//!
//! Schedules tasks with fixed effort, priorities, and precedence
//! dependencies onto resources whose working time is limited to
//! discontinuous calendar windows. Every task ends up either with a committed
//! allocation or with the reason it could not be placed; one unschedulable
//! task never fails the whole run.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TimeWindow`, `Calendar`, `Resource`,
//!   `ResourceGroup`, `Task`, `AssignmentPolicy`, `AllocationConstraints`,
//!   `TaskResult`
//! - **`scheduler`**: `WindowManager`, `TaskAllocator`, `HeuristicSolver`,
//!   `SolveSummary`
//! - **`ordering`**: Default precedence-respecting visitation order
//! - **`validation`**: Input integrity checks (duplicate IDs, DAG cycles, resource refs)
//! - **`config`**: Solver tunables
//! - **`error`**: Typed errors
//!
//! # Example
//!
//! ```
//! use window_sched::models::{Resource, ResourceGroup, Task};
//! use window_sched::scheduler::HeuristicSolver;
//!
//! let crew = ResourceGroup::new("crew").with_resource("R1");
//! let resources = vec![Resource::new("R1").with_window(0, 3).with_window(5, 10)];
//! let tasks = vec![
//!     Task::new("T1").with_duration(3).with_resource_group(crew.clone()),
//!     Task::new("T2").with_duration(4).with_resource_group(crew).with_predecessor("T1"),
//! ];
//!
//! let mut solver = HeuristicSolver::with_default_order(tasks, resources).unwrap();
//! let results = solver.solve().unwrap();
//! assert_eq!(results[0].end(), Some(3));
//! assert_eq!(results[1].start(), Some(5));
//! assert_eq!(results[1].end(), Some(9));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kolisch & Hartmann (1999), "Heuristic Algorithms for Solving the
//!   Resource-Constrained Project Scheduling Problem"

pub mod config;
pub mod error;
pub mod models;
pub mod ordering;
pub mod scheduler;
pub mod validation;

pub use config::SolverConfig;
pub use error::SolverError;
