//! Error taxonomy for dashboard operations.
//!
//! Every failure is caught at the operation boundary, turned into a
//! notification and handed back to the caller as a value.

use crate::models::{EmployeeId, ResourceKind};
use crate::notify::{Notification, NotificationKind};
use thiserror::Error;

/// Outcome of a failed or skipped dashboard operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// The backend answered 404 for the employee.
    #[error("{resource} not found for employee {employee_id}")]
    NotFound {
        resource: ResourceKind,
        employee_id: EmployeeId,
    },

    /// The backend answered 200 with an empty collection.
    #[error("no {resource} available")]
    EmptyResult { resource: ResourceKind },

    /// Transport failure, unexpected status, or a response that failed
    /// schema validation.
    #[error("failed to fetch {resource}: {cause}")]
    NetworkFailure {
        resource: ResourceKind,
        cause: String,
    },

    /// Input rejected before any request was made. Never notified.
    #[error("skipped: {reason}")]
    ValidationSkip { reason: String },
}

impl DashboardError {
    pub fn network(resource: ResourceKind, cause: impl Into<String>) -> Self {
        DashboardError::NetworkFailure {
            resource,
            cause: cause.into(),
        }
    }

    /// The resource the error refers to, if any.
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            DashboardError::NotFound { resource, .. }
            | DashboardError::EmptyResult { resource }
            | DashboardError::NetworkFailure { resource, .. } => Some(*resource),
            DashboardError::ValidationSkip { .. } => None,
        }
    }

    /// Notification kind for this error; `None` for silent skips.
    pub fn notification_kind(&self) -> Option<NotificationKind> {
        match self {
            DashboardError::NotFound { .. } | DashboardError::EmptyResult { .. } => {
                Some(NotificationKind::Warning)
            }
            DashboardError::NetworkFailure { .. } => Some(NotificationKind::Error),
            DashboardError::ValidationSkip { .. } => None,
        }
    }

    /// Human-readable notification for this error.
    pub fn to_notification(&self) -> Option<Notification> {
        let kind = self.notification_kind()?;

        let (title, message) = match self {
            DashboardError::NotFound { employee_id, .. } => (
                "Employee not found".to_string(),
                format!("No employee with id {} exists.", employee_id),
            ),
            DashboardError::EmptyResult { resource } => empty_result_text(*resource),
            DashboardError::NetworkFailure { resource, .. } => (
                "Server error".to_string(),
                network_failure_text(*resource).to_string(),
            ),
            DashboardError::ValidationSkip { .. } => return None,
        };

        Some(Notification {
            kind,
            title,
            message,
        })
    }
}

fn empty_result_text(resource: ResourceKind) -> (String, String) {
    match resource {
        ResourceKind::Reviews => (
            "No reviews".to_string(),
            "Nobody has left feedback for this employee yet.".to_string(),
        ),
        ResourceKind::AspectSummaries | ResourceKind::GeneralSummaries => (
            "No analysis".to_string(),
            "This employee has not been analyzed yet.".to_string(),
        ),
        other => (
            "Nothing to show".to_string(),
            format!("The backend returned no {}.", other),
        ),
    }
}

fn network_failure_text(resource: ResourceKind) -> &'static str {
    match resource {
        ResourceKind::Aspects => "Could not reach the aspect catalog.",
        ResourceKind::Reviews => "Could not fetch the employee's reviews.",
        ResourceKind::AspectSummaries => "Could not fetch the per-aspect analysis.",
        ResourceKind::GeneralSummaries => "Could not fetch the overall analysis.",
        ResourceKind::AnalysisTrigger => "Could not update the employee's analysis.",
        ResourceKind::Employees => "Could not fetch the employee roster.",
        ResourceKind::Psychotype => "Could not fetch the employee's psychotype.",
    }
}
