//! Per-resource calendar ownership.
//!
//! The window manager holds one [`Calendar`] per resource for the lifetime
//! of a solve run. It answers availability queries for a candidate set of
//! resources and applies commits once an allocation is accepted. Nothing
//! else mutates the calendars.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::CalendarError;
use crate::models::{Calendar, Resource, Time, TimeWindow};

/// Windows keyed by resource ID, each list sorted and disjoint.
pub type ResourceWindows = BTreeMap<String, Vec<TimeWindow>>;

/// Owns and mutates the calendars of all resources in a run.
#[derive(Debug, Clone, Default)]
pub struct WindowManager {
    calendars: BTreeMap<String, Calendar>,
}

impl WindowManager {
    /// Creates a manager from the resources' initial calendars.
    ///
    /// Resources are identified by id; a repeated id keeps the first calendar.
    pub fn new(resources: &[Resource]) -> Self {
        let mut calendars: BTreeMap<String, Calendar> = BTreeMap::new();
        for r in resources {
            if calendars.contains_key(&r.id) {
                warn!(resource_id = %r.id, "duplicate resource id, keeping first calendar");
                continue;
            }
            calendars.insert(r.id.clone(), r.calendar.clone());
        }
        Self { calendars }
    }

    /// Creates a manager from (resource id, calendar) pairs.
    pub fn from_calendars<I, S>(calendars: I) -> Self
    where
        I: IntoIterator<Item = (S, Calendar)>,
        S: Into<String>,
    {
        Self {
            calendars: calendars
                .into_iter()
                .map(|(id, cal)| (id.into(), cal))
                .collect(),
        }
    }

    /// Current calendar of a resource.
    pub fn calendar(&self, resource_id: &str) -> Option<&Calendar> {
        self.calendars.get(resource_id)
    }

    /// IDs of all managed resources, sorted.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }

    /// Availability at or after `floor` for the requested resources.
    ///
    /// Windows straddling `floor` are clipped. Resources without availability
    /// (or unknown to the manager) are omitted, so an empty map means none of
    /// the requested resources can work after `floor`.
    pub fn windows_from<'a, I>(&self, resource_ids: I, floor: Time) -> ResourceWindows
    where
        I: IntoIterator<Item = &'a str>,
    {
        resource_ids
            .into_iter()
            .filter_map(|id| {
                let windows = self.calendars.get(id)?.windows_from(floor);
                (!windows.is_empty()).then(|| (id.to_string(), windows))
            })
            .collect()
    }

    /// Removes the given spans from the owning resources' calendars.
    ///
    /// All-or-nothing: if any span is rejected, no calendar changes.
    ///
    /// # Errors
    /// - [`CalendarError::UnknownResource`] for a resource not managed here.
    /// - Any [`Calendar::reserve`] error (span not inside a single window).
    pub fn commit(&mut self, segments: &ResourceWindows) -> Result<(), CalendarError> {
        let mut staged = Vec::with_capacity(segments.len());
        for (id, spans) in segments {
            let mut cal = self
                .calendars
                .get(id)
                .cloned()
                .ok_or_else(|| CalendarError::UnknownResource(id.clone()))?;
            cal.reserve_all(spans)?;
            staged.push((id.clone(), cal));
        }

        for (id, cal) in staged {
            debug!(resource_id = %id, remaining = cal.total_available(), "calendar updated");
            self.calendars.insert(id, cal);
        }
        Ok(())
    }
}
