//! The per-employee snapshot shared with every view.

use crate::models::{AspectSummary, ChartPoint, EmployeeId, GeneralSummary, Review};
use serde::Serialize;

/// One resource's contents and the employee they were loaded for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSlot<T> {
    owner: Option<EmployeeId>,
    items: Vec<T>,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self {
            owner: None,
            items: Vec::new(),
        }
    }
}

impl<T> ResourceSlot<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn owner(&self) -> Option<EmployeeId> {
        self.owner
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the slot holds data for someone other than `active`.
    pub fn is_stale_for(&self, active: Option<EmployeeId>) -> bool {
        !self.items.is_empty() && self.owner != active
    }

    pub(crate) fn replace(&mut self, owner: EmployeeId, items: Vec<T>) {
        self.owner = Some(owner);
        self.items = items;
    }
}

/// Everything the dashboard shows about the active employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeeSnapshot {
    /// Employee of the most recent load request.
    pub employee_id: Option<EmployeeId>,
    pub loading: bool,
    pub reviews: ResourceSlot<Review>,
    pub aspect_summaries: ResourceSlot<AspectSummary>,
    /// Summary history, oldest first.
    pub general_summaries: ResourceSlot<GeneralSummary>,
    /// Trend series built from the summaries as received (newest first).
    pub chart: Vec<ChartPoint>,
    /// Sequence number of the most recent load request.
    pub request: u64,
    /// Number of times the loading flag has been released.
    pub settled_cycles: u64,
    /// True once the request numbered `request` has finished.
    #[serde(skip)]
    pub(crate) request_done: bool,
    /// Analyses whose trigger or refresh is still running.
    #[serde(skip)]
    pub(crate) analyses_running: u32,
}

impl EmployeeSnapshot {
    /// Lower the loading flag once the current request is done and no
    /// analysis is running. Returns whether the flag changed.
    pub(crate) fn release_if_idle(&mut self) -> bool {
        if !self.loading || !self.request_done || self.analyses_running > 0 {
            return false;
        }
        self.loading = false;
        self.settled_cycles += 1;
        true
    }
}
