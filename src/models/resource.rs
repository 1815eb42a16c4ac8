//! Resource model.
//!
//! Resources are the entities that perform tasks: machines, workers,
//! rooms, vehicles. Each resource carries the calendar of time it can work.
//! Resources are grouped into [`ResourceGroup`]s that describe which of them
//! are interchangeable for a task.
//!
//! # Identity
//! Both types compare and hash by id only. Two values with the same id are
//! the same entity; callers must not build divergent copies within one run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::{Calendar, Time};

/// A resource that can be assigned to tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Concrete availability windows.
    pub calendar: Calendar,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

impl Resource {
    /// Creates a resource with no availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            calendar: Calendar::new(),
            attributes: HashMap::new(),
        }
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the availability calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Adds an availability window.
    pub fn with_window(mut self, start: Time, end: Time) -> Self {
        self.calendar = self.calendar.with_window(start, end);
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the resource can work at `time`.
    pub fn is_available_at(&self, time: Time) -> bool {
        self.calendar.next_available_time(time) == Some(time)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A named pool of interchangeable resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Unique group identifier.
    pub id: String,
    /// Member resource IDs.
    pub resource_ids: Vec<String>,
}

impl ResourceGroup {
    /// Creates an empty group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_ids: Vec::new(),
        }
    }

    /// Adds a member resource.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_ids.push(resource_id.into());
        self
    }

    /// Sets all member resources.
    pub fn with_resources<I, S>(mut self, resource_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_ids = resource_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `resource_id` belongs to this group.
    pub fn contains(&self, resource_id: &str) -> bool {
        self.resource_ids.iter().any(|r| r == resource_id)
    }

    /// Member IDs in first-seen order, without duplicates.
    pub fn unique_resource_ids(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.resource_ids.len());
        for id in &self.resource_ids {
            if !seen.contains(&id.as_str()) {
                seen.push(id.as_str());
            }
        }
        seen
    }
}

impl PartialEq for ResourceGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResourceGroup {}

impl Hash for ResourceGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("M1")
            .with_name("CNC Machine 1")
            .with_window(0, 4)
            .with_window(5, 10)
            .with_attribute("location", "Shop Floor A");

        assert_eq!(r.id, "M1");
        assert_eq!(r.name, "CNC Machine 1");
        assert_eq!(r.calendar.windows().len(), 2);
        assert_eq!(r.attributes.get("location"), Some(&"Shop Floor A".to_string()));
    }

    #[test]
    fn test_resource_availability() {
        let r = Resource::new("M1").with_window(0, 4).with_window(5, 10);
        assert!(r.is_available_at(0));
        assert!(!r.is_available_at(4));
        assert!(r.is_available_at(9));
        assert!(!r.is_available_at(10));

        assert!(!Resource::new("idle").is_available_at(0));
    }

    #[test]
    fn test_resource_identity_by_id() {
        let a = Resource::new("M1").with_window(0, 10);
        let b = Resource::new("M1").with_name("other");
        assert_eq!(a, b);

        let set: HashSet<Resource> = [a, b, Resource::new("M2")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_group_identity_by_id() {
        let a = ResourceGroup::new("G1").with_resources(["M1", "M2"]);
        let b = ResourceGroup::new("G1");
        assert_eq!(a, b);
        assert_ne!(a, ResourceGroup::new("G2"));
    }

    #[test]
    fn test_group_unique_members() {
        let g = ResourceGroup::new("G1")
            .with_resource("M2")
            .with_resource("M1")
            .with_resource("M2");
        assert_eq!(g.unique_resource_ids(), vec!["M2", "M1"]);
        assert!(g.contains("M1"));
        assert!(!g.contains("M3"));
    }
}
