//! Employee roster and psychotype lookups.

use crate::backend::BackendClient;
use crate::error::DashboardError;
use crate::models::{EmployeeId, EmployeeOverview, Psychotype};
use crate::notify::{self, NotificationSink};
use std::sync::Arc;
use tracing::info;

/// Read-only access to what the backend knows about employees.
pub struct EmployeeDirectory {
    backend: BackendClient,
    sink: Arc<dyn NotificationSink>,
}

impl EmployeeDirectory {
    pub fn new(backend: BackendClient, sink: Arc<dyn NotificationSink>) -> Self {
        Self { backend, sink }
    }

    /// All employees, most reviewed first.
    pub async fn list_employees(&self) -> Result<Vec<EmployeeOverview>, DashboardError> {
        let mut employees = self
            .backend
            .employees()
            .await
            .inspect_err(|e| notify::report(self.sink.as_ref(), e))?;

        employees.sort_by(|a, b| {
            b.feedback_count
                .cmp(&a.feedback_count)
                .then(a.employee_id.0.cmp(&b.employee_id.0))
        });
        info!("Roster holds {} employees", employees.len());
        Ok(employees)
    }

    pub async fn psychotype(&self, employee_id: EmployeeId) -> Result<Psychotype, DashboardError> {
        self.backend
            .psychotype(employee_id)
            .await
            .inspect_err(|e| notify::report(self.sink.as_ref(), e))
    }
}
