//! Scheduling domain models.
//!
//! Provides the data types for describing a resource-constrained project
//! (resources with concrete availability, tasks with effort and precedence)
//! and the per-task outcomes of a solve run.
//!
//! # Domain Mappings
//!
//! | window-sched | Construction | Manufacturing | Healthcare |
//! |--------------|--------------|---------------|------------|
//! | Task | Work package | Operation | Procedure |
//! | Resource | Crew / Crane | Machine / Worker | Room / Doctor |
//! | ResourceGroup | Trade | Work center | Department |
//! | Calendar | Site hours | Shift plan | Roster |

mod calendar;
mod policy;
mod resource;
mod result;
mod task;

pub use calendar::{Calendar, Time, TimeWindow};
pub use policy::{effort_shares, AllocationConstraints, AssignmentPolicy};
pub use resource::{Resource, ResourceGroup};
pub use result::{ResourceInterval, ScheduledTask, TaskOutcome, TaskResult};
pub use task::Task;
