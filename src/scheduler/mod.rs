//! Heuristic window-allocation engine.
//!
//! Control flow, once per task in a fixed order:
//!
//! ```text
//! HeuristicSolver ──query──▶ WindowManager
//!        │                        │ windows per resource
//!        ▼                        ▼
//!   TaskAllocator ──proposal──▶ WindowManager::commit
//!        │
//!        ▼
//!   TaskResult (scheduled | blocked | no resources | allocation failed)
//! ```
//!
//! # Algorithm
//!
//! The solver is a feasibility-first greedy: each task takes the earliest
//! fitting time available when its turn comes, and committed time is never
//! revisited within a run. It does not minimize makespan.
//!
//! # References
//!
//! - Kolisch & Hartmann (1999), "Heuristic Algorithms for Solving the
//!   Resource-Constrained Project Scheduling Problem"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod allocator;
mod heuristic;
mod summary;
mod window_manager;

pub use allocator::{Allocation, TaskAllocator};
pub use heuristic::HeuristicSolver;
pub use summary::SolveSummary;
pub use window_manager::{ResourceWindows, WindowManager};
