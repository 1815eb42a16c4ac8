//! Greedy earliest-fit task allocation.
//!
//! # Algorithm
//!
//! 1. Derive the admissible participant counts from the assignment policy.
//! 2. Order candidate resources by (earliest window start, id).
//! 3. For every admissible count `k`, walk the `k`-combinations of the
//!    candidates in lexicographic order (bounded by `max_combinations`).
//! 4. For a combination, intersect the participants' windows and greedily
//!    fill the largest effort share into the common windows, taking the
//!    earliest usable time first and honoring split/min-block rules.
//!    Smaller shares take the same blocks, shortened at the end.
//! 5. Keep the feasible combination with the smallest
//!    (start, end, resource ids). Ties therefore resolve by id.
//!
//! The allocator is stateless: it only proposes sub-intervals drawn from the
//! windows it was given. Committing them is the caller's job.
//!
//! # Complexity
//! O(C * k * W) where C = combinations evaluated, W = windows per resource.

use std::collections::BTreeMap;

use tracing::trace;

use super::ResourceWindows;
use crate::error::AllocationError;
use crate::models::{
    effort_shares, AllocationConstraints, AssignmentPolicy, ResourceInterval, ScheduledTask, Time,
    TimeWindow,
};

/// A proposed allocation: resource ID → sub-intervals to consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    segments: ResourceWindows,
}

impl Allocation {
    /// Sub-intervals per resource, sorted by start.
    pub fn segments(&self) -> &ResourceWindows {
        &self.segments
    }

    /// Participating resource IDs, sorted.
    pub fn resource_ids(&self) -> Vec<&str> {
        self.segments.keys().map(String::as_str).collect()
    }

    /// Earliest start across all resources.
    pub fn start(&self) -> Time {
        self.segments
            .values()
            .filter_map(|s| s.first())
            .map(|w| w.start)
            .min()
            .unwrap_or(0)
    }

    /// Latest end across all resources.
    pub fn end(&self) -> Time {
        self.segments
            .values()
            .filter_map(|s| s.last())
            .map(|w| w.end)
            .max()
            .unwrap_or(0)
    }

    /// Overall (start, end) on one resource.
    pub fn span(&self, resource_id: &str) -> Option<(Time, Time)> {
        let segs = self.segments.get(resource_id)?;
        Some((segs.first()?.start, segs.last()?.end))
    }

    /// Sum of all sub-interval lengths.
    pub fn total_effort(&self) -> Time {
        self.segments
            .values()
            .flatten()
            .map(TimeWindow::duration)
            .sum()
    }

    /// Flattens into committed intervals.
    pub fn to_intervals(&self) -> Vec<ResourceInterval> {
        self.segments
            .iter()
            .flat_map(|(id, segs)| {
                segs.iter()
                    .map(move |w| ResourceInterval::new(id.clone(), w.start, w.end))
            })
            .collect()
    }

    /// Aggregates the proposal into a scheduled-task record.
    pub fn to_scheduled(&self) -> ScheduledTask {
        ScheduledTask {
            resource_ids: self.segments.keys().cloned().collect(),
            start: self.start(),
            end: self.end(),
            intervals: self.to_intervals(),
        }
    }

    fn score(&self) -> (Time, Time, Vec<&str>) {
        (self.start(), self.end(), self.resource_ids())
    }
}

/// Decides which resources and which windows satisfy a task.
///
/// # Example
///
/// ```
/// use window_sched::models::{AllocationConstraints, AssignmentPolicy, TimeWindow};
/// use window_sched::scheduler::{ResourceWindows, TaskAllocator};
///
/// let mut windows = ResourceWindows::new();
/// windows.insert("R".into(), vec![TimeWindow::new(0, 4), TimeWindow::new(5, 10)]);
///
/// let allocation = TaskAllocator::new()
///     .allocate(&windows, &AssignmentPolicy::Single, 6, &AllocationConstraints::default())
///     .unwrap();
/// assert_eq!(
///     allocation.segments()["R"],
///     vec![TimeWindow::new(0, 4), TimeWindow::new(5, 7)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TaskAllocator {
    max_combinations: usize,
}

impl TaskAllocator {
    /// Creates an allocator with the default combination cap.
    pub fn new() -> Self {
        Self {
            max_combinations: 1024,
        }
    }

    /// Sets the cap on combinations evaluated per call.
    pub fn with_max_combinations(mut self, max_combinations: usize) -> Self {
        self.max_combinations = max_combinations.max(1);
        self
    }

    /// Proposes an allocation of `duration` units of effort.
    ///
    /// # Errors
    /// See [`AllocationError`]; the variant names the most specific reason
    /// found for the earliest-evaluated combination.
    pub fn allocate(
        &self,
        resource_windows: &ResourceWindows,
        policy: &AssignmentPolicy,
        duration: Time,
        constraints: &AllocationConstraints,
    ) -> Result<Allocation, AllocationError> {
        if duration <= 0 {
            return Err(AllocationError::InvalidDuration(duration));
        }
        let (min_count, max_count) = policy.count_bounds()?;
        if min_count as Time > duration {
            return Err(AllocationError::InvalidPolicy(format!(
                "effort {duration} cannot be shared among {min_count} resources"
            )));
        }

        let candidates = candidate_order(resource_windows, policy)?;
        if candidates.len() < min_count {
            return Err(AllocationError::NotEnoughResources {
                required: min_count,
                available: candidates.len(),
            });
        }
        let max_count = max_count
            .min(candidates.len())
            .min(usize::try_from(duration).unwrap_or(usize::MAX));

        let mut budget = self.max_combinations;
        let mut best: Option<Allocation> = None;
        let mut first_err: Option<AllocationError> = None;

        for k in min_count..=max_count {
            for_each_combination(candidates.len(), k, &mut budget, |combo| {
                let ids: Vec<&str> = combo.iter().map(|&i| candidates[i]).collect();
                match fit_combination(&ids, resource_windows, duration, constraints) {
                    Ok(allocation) => {
                        let better = best
                            .as_ref()
                            .map_or(true, |b| allocation.score() < b.score());
                        if better {
                            best = Some(allocation);
                        }
                    }
                    Err(e) => {
                        trace!(resources = ?ids, reason = %e, "combination rejected");
                        first_err.get_or_insert(e);
                    }
                }
            });
        }

        best.ok_or_else(|| first_err.unwrap_or(AllocationError::InsufficientAvailability))
    }
}

impl Default for TaskAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate resources sorted by (earliest window start, id).
fn candidate_order<'a>(
    resource_windows: &'a ResourceWindows,
    policy: &AssignmentPolicy,
) -> Result<Vec<&'a str>, AllocationError> {
    let first_start = |id: &str| {
        resource_windows
            .get(id)
            .and_then(|w| w.first())
            .map(|w| w.start)
    };

    let mut candidates: Vec<(Time, &'a str)> = match policy {
        AssignmentPolicy::Named(_) => {
            let mut named = Vec::new();
            for id in policy.required_resources() {
                let (key, _) = resource_windows
                    .get_key_value(id)
                    .ok_or_else(|| AllocationError::RequiredResourceUnavailable(id.to_string()))?;
                let start = first_start(key.as_str())
                    .ok_or_else(|| AllocationError::RequiredResourceUnavailable(id.to_string()))?;
                named.push((start, key.as_str()));
            }
            named
        }
        _ => resource_windows
            .keys()
            .filter_map(|id| first_start(id.as_str()).map(|s| (s, id.as_str())))
            .collect(),
    };

    candidates.sort();
    Ok(candidates.into_iter().map(|(_, id)| id).collect())
}

/// Calls `f` with each `k`-combination of `0..n` in lexicographic order,
/// decrementing `budget` per call and stopping when it reaches zero.
fn for_each_combination(n: usize, k: usize, budget: &mut usize, mut f: impl FnMut(&[usize])) {
    if k == 0 || k > n {
        return;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        if *budget == 0 {
            return;
        }
        *budget -= 1;
        f(&idx);

        let Some(i) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
            return;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

/// Places effort shares for one combination of resources.
///
/// Shares go to participants in id order, larger shares first. The largest
/// share is fitted once into the intersection of all participants' windows;
/// smaller shares reuse those blocks cut short at the end, so every
/// participant works while the largest-share participant does.
fn fit_combination(
    ids: &[&str],
    resource_windows: &ResourceWindows,
    duration: Time,
    constraints: &AllocationConstraints,
) -> Result<Allocation, AllocationError> {
    let mut sorted: Vec<&str> = ids.to_vec();
    sorted.sort_unstable();

    let mut common: Option<Vec<TimeWindow>> = None;
    for id in &sorted {
        let windows = resource_windows
            .get(*id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        common = Some(match common {
            None => windows.to_vec(),
            Some(acc) => intersect(&acc, windows),
        });
    }
    let common = common.unwrap_or_default();
    if common.is_empty() {
        return Err(AllocationError::InsufficientAvailability);
    }

    let shares = effort_shares(duration, sorted.len());
    let Some(&largest) = shares.first() else {
        return Err(AllocationError::InsufficientAvailability);
    };
    let lead = fill(&common, largest, constraints)?;

    let mut segments = BTreeMap::new();
    for (id, share) in sorted.iter().zip(shares) {
        let blocks = if share == largest {
            lead.clone()
        } else {
            let min_block = if constraints.splittable {
                constraints.min_block_for(share)
            } else {
                1
            };
            shorten(&lead, largest - share, min_block)?
        };
        segments.insert(id.to_string(), blocks);
    }
    Ok(Allocation { segments })
}

/// Removes `excess` units from the ends of `blocks`, latest block first,
/// never leaving a block shorter than `min_block`.
///
/// Each result block starts where its source block starts, so a smaller
/// share always overlaps the placement it was cut from.
fn shorten(
    blocks: &[TimeWindow],
    excess: Time,
    min_block: Time,
) -> Result<Vec<TimeWindow>, AllocationError> {
    let mut out = blocks.to_vec();
    let mut excess = excess;
    for block in out.iter_mut().rev() {
        if excess == 0 {
            break;
        }
        let cut = (block.duration() - min_block).clamp(0, excess);
        block.end -= cut;
        excess -= cut;
    }
    if excess > 0 {
        return Err(AllocationError::InsufficientAvailability);
    }
    Ok(out)
}

/// Greedily fits `required` units into `windows`, earliest first.
fn fill(
    windows: &[TimeWindow],
    required: Time,
    constraints: &AllocationConstraints,
) -> Result<Vec<TimeWindow>, AllocationError> {
    if !constraints.splittable {
        return windows
            .iter()
            .find(|w| w.duration() >= required)
            .map(|w| vec![TimeWindow::new(w.start, w.start + required)])
            .ok_or(AllocationError::NoContiguousWindow { duration: required });
    }

    let min_block = constraints.min_block_for(required);
    let mut remaining = required;
    let mut blocks = Vec::new();

    for w in windows {
        if remaining == 0 {
            break;
        }
        let len = w.duration();
        if len < min_block {
            continue;
        }
        let mut take = len.min(remaining);
        let rest = remaining - take;
        if rest > 0 && rest < min_block {
            // Leave enough for a final block of minimum length.
            take = remaining - min_block;
            if take < min_block {
                continue;
            }
        }
        blocks.push(TimeWindow::new(w.start, w.start + take));
        remaining -= take;
    }

    if remaining > 0 {
        return Err(AllocationError::InsufficientAvailability);
    }
    Ok(blocks)
}

/// Intersection of two sorted, disjoint window lists.
fn intersect(a: &[TimeWindow], b: &[TimeWindow]) -> Vec<TimeWindow> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        if let Some(w) = a[i].intersection(&b[j]) {
            out.push(w);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
