//! Assignment policies and allocation constraints.
//!
//! An [`AssignmentPolicy`] decides how many resources a task needs and which
//! ones qualify. [`AllocationConstraints`] restrict the shape of the time
//! each participating resource contributes.
//!
//! # Effort Sharing
//! A task's `duration` is total effort. With one participant it supplies the
//! full effort. With `k` participants the effort is split into equal shares
//! (the first `duration % k` participants, in id order, carry one extra
//! unit) and all participants work at the same time.

use serde::{Deserialize, Serialize};

use super::{ResourceGroup, Time};
use crate::error::AllocationError;

/// How many resources a task needs, and which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AssignmentPolicy {
    /// One resource from the pool does all the work.
    #[default]
    Single,
    /// Exactly `n` pool resources share the work.
    Count(usize),
    /// Between `min` and `max` pool resources share the work.
    Range { min: usize, max: usize },
    /// Exactly these resources share the work.
    Named(Vec<String>),
}

impl AssignmentPolicy {
    /// Creates a range policy.
    pub fn range(min: usize, max: usize) -> Self {
        Self::Range { min, max }
    }

    /// Creates a named-subset policy.
    pub fn named<I, S>(resource_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(resource_ids.into_iter().map(Into::into).collect())
    }

    /// Inclusive bounds on the number of participating resources.
    ///
    /// # Errors
    /// [`AllocationError::InvalidPolicy`] for zero counts, inverted ranges,
    /// or an empty named list.
    pub fn count_bounds(&self) -> Result<(usize, usize), AllocationError> {
        match self {
            Self::Single => Ok((1, 1)),
            Self::Count(0) => Err(AllocationError::InvalidPolicy(
                "resource count must be positive".into(),
            )),
            Self::Count(n) => Ok((*n, *n)),
            Self::Range { min, max } if *min == 0 || min > max => Err(
                AllocationError::InvalidPolicy(format!("invalid resource range [{min}, {max}]")),
            ),
            Self::Range { min, max } => Ok((*min, *max)),
            Self::Named(ids) if ids.is_empty() => Err(AllocationError::InvalidPolicy(
                "named resource list is empty".into(),
            )),
            Self::Named(_) => {
                let n = self.required_resources().len();
                Ok((n, n))
            }
        }
    }

    /// Resources that must all participate (empty unless `Named`).
    pub fn required_resources(&self) -> Vec<&str> {
        match self {
            Self::Named(ids) => {
                let mut unique: Vec<&str> = ids.iter().map(String::as_str).collect();
                unique.sort_unstable();
                unique.dedup();
                unique
            }
            _ => Vec::new(),
        }
    }

    /// Resource IDs whose windows matter for this policy.
    pub fn eligible_resources<'a>(&'a self, group: &'a ResourceGroup) -> Vec<&'a str> {
        match self {
            Self::Named(_) => self.required_resources(),
            _ => group.unique_resource_ids(),
        }
    }
}

/// Restrictions on how a participant's share may be laid out in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConstraints {
    /// Whether a share may be spread over several windows.
    pub splittable: bool,
    /// Minimum length of each contiguous block (0 = no minimum).
    pub min_block: Time,
}

impl AllocationConstraints {
    /// Constraints forcing one contiguous block per participant.
    pub fn no_split() -> Self {
        Self {
            splittable: false,
            min_block: 0,
        }
    }

    /// Sets the minimum block length.
    pub fn with_min_block(mut self, min_block: Time) -> Self {
        self.min_block = min_block.max(0);
        self
    }

    /// Effective minimum block for a share of `required` units.
    ///
    /// A share shorter than the configured minimum is placed as one block.
    pub fn min_block_for(&self, required: Time) -> Time {
        self.min_block.min(required).max(1)
    }
}

impl Default for AllocationConstraints {
    fn default() -> Self {
        Self {
            splittable: true,
            min_block: 0,
        }
    }
}

/// Splits `effort` into `participants` shares, larger shares first.
pub fn effort_shares(effort: Time, participants: usize) -> Vec<Time> {
    if participants == 0 {
        return Vec::new();
    }
    let k = participants as Time;
    let base = effort / k;
    let extra = (effort % k) as usize;
    (0..participants)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_bounds() {
        assert_eq!(AssignmentPolicy::Single.count_bounds(), Ok((1, 1)));
        assert_eq!(AssignmentPolicy::Count(3).count_bounds(), Ok((3, 3)));
        assert_eq!(AssignmentPolicy::range(1, 2).count_bounds(), Ok((1, 2)));
        assert_eq!(
            AssignmentPolicy::named(["B", "A", "B"]).count_bounds(),
            Ok((2, 2))
        );
    }

    #[test]
    fn test_invalid_policies() {
        for policy in [
            AssignmentPolicy::Count(0),
            AssignmentPolicy::range(0, 2),
            AssignmentPolicy::range(3, 2),
            AssignmentPolicy::Named(Vec::new()),
        ] {
            assert!(matches!(
                policy.count_bounds(),
                Err(AllocationError::InvalidPolicy(_))
            ));
        }
    }

    #[test]
    fn test_eligible_resources() {
        let group = ResourceGroup::new("G").with_resources(["M2", "M1"]);
        assert_eq!(
            AssignmentPolicy::Single.eligible_resources(&group),
            vec!["M2", "M1"]
        );
        assert_eq!(
            AssignmentPolicy::named(["M3", "M1"]).eligible_resources(&group),
            vec!["M1", "M3"]
        );
    }

    #[test]
    fn test_effort_shares() {
        assert_eq!(effort_shares(10, 1), vec![10]);
        assert_eq!(effort_shares(10, 3), vec![4, 3, 3]);
        assert_eq!(effort_shares(2, 3), vec![1, 1, 0]);
        assert!(effort_shares(5, 0).is_empty());
        assert_eq!(effort_shares(7, 4).iter().sum::<Time>(), 7);
    }

    #[test]
    fn test_constraints() {
        let c = AllocationConstraints::default();
        assert!(c.splittable);
        assert_eq!(c.min_block_for(5), 1);

        let c = AllocationConstraints::default().with_min_block(4);
        assert_eq!(c.min_block_for(10), 4);
        assert_eq!(c.min_block_for(3), 3);

        assert!(!AllocationConstraints::no_split().splittable);
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&AssignmentPolicy::range(1, 2)).unwrap();
        assert_eq!(json, r#"{"kind":"range","value":{"min":1,"max":2}}"#);
        let back: AssignmentPolicy = serde_json::from_str(r#"{"kind":"single"}"#).unwrap();
        assert_eq!(back, AssignmentPolicy::Single);

        let c: AllocationConstraints = serde_json::from_str(r#"{"min_block":2}"#).unwrap();
        assert!(c.splittable);
        assert_eq!(c.min_block, 2);
    }
}
