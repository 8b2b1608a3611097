//! Employee data loading and the "generate analysis" workflow.
//!
//! This module implements:
//! - Concurrent retrieval of reviews, aspect summaries and general summaries,
//!   joined before the load resolves
//! - Request sequencing so a slow, superseded load never overwrites newer data
//! - A loading flag that is released exactly once per request on every exit path

use super::chart;
use super::snapshot::EmployeeSnapshot;
use super::tabs::TabGate;
use crate::backend::BackendClient;
use crate::error::DashboardError;
use crate::models::{EmployeeId, ResourceKind};
use crate::notify::{self, Notification, NotificationSink};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Result of one resource fetch: the number of items stored, or why not.
pub type ResourceOutcome = Result<usize, DashboardError>;

/// Terminal state of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// All three resources were stored.
    Loaded,
    /// Some resources were stored or missing, none failed on the network.
    PartiallyEmpty,
    /// The employee does not exist.
    NotFound,
    /// At least one resource failed on the network.
    Error,
    /// A newer request replaced this one; nothing was stored.
    Superseded,
}

/// Aggregated per-resource outcomes of a load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub employee_id: EmployeeId,
    pub request: u64,
    pub reviews: ResourceOutcome,
    pub aspect_summaries: ResourceOutcome,
    pub general_summaries: ResourceOutcome,
    pub superseded: bool,
}

impl LoadReport {
    pub fn outcomes(&self) -> [(ResourceKind, &ResourceOutcome); 3] {
        [
            (ResourceKind::Reviews, &self.reviews),
            (ResourceKind::AspectSummaries, &self.aspect_summaries),
            (ResourceKind::GeneralSummaries, &self.general_summaries),
        ]
    }

    pub fn errors(&self) -> Vec<&DashboardError> {
        self.outcomes()
            .into_iter()
            .filter_map(|(_, outcome)| outcome.as_ref().err())
            .collect()
    }

    pub fn loaded_any(&self) -> bool {
        self.outcomes().iter().any(|(_, outcome)| outcome.is_ok())
    }

    pub fn outcome(&self) -> LoadOutcome {
        if self.superseded {
            return LoadOutcome::Superseded;
        }

        let errors = self.errors();
        if errors.is_empty() {
            LoadOutcome::Loaded
        } else if errors
            .iter()
            .any(|e| matches!(e, DashboardError::NetworkFailure { .. }))
        {
            LoadOutcome::Error
        } else if errors.len() == 3
            && errors
                .iter()
                .all(|e| matches!(e, DashboardError::NotFound { .. }))
        {
            LoadOutcome::NotFound
        } else {
            LoadOutcome::PartiallyEmpty
        }
    }
}

/// Result of the "generate analysis" workflow.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub trigger: Result<(), DashboardError>,
    pub load: LoadReport,
}

impl AnalysisReport {
    pub fn succeeded(&self) -> bool {
        self.trigger.is_ok() && self.load.outcome() == LoadOutcome::Loaded
    }
}

/// Sole owner and writer of the employee snapshot.
pub struct EmployeeDataOrchestrator {
    backend: BackendClient,
    sink: Arc<dyn NotificationSink>,
    state: watch::Sender<EmployeeSnapshot>,
}

impl EmployeeDataOrchestrator {
    pub fn new(backend: BackendClient, sink: Arc<dyn NotificationSink>) -> Self {
        let (state, _) = watch::channel(EmployeeSnapshot::default());
        Self {
            backend,
            sink,
            state,
        }
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> EmployeeSnapshot {
        self.state.borrow().clone()
    }

    /// Read-only feed of snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<EmployeeSnapshot> {
        self.state.subscribe()
    }

    pub fn tabs(&self) -> TabGate {
        TabGate::evaluate(&self.state.borrow())
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Load all three resources for an employee. Previously loaded data is
    /// kept until a non-empty response replaces it.
    pub async fn load_employee(&self, employee_id: EmployeeId) -> LoadReport {
        let request = self.begin(employee_id);
        let _loading = LoadingGuard {
            state: &self.state,
            request,
        };

        info!("Loading employee {} (request {})", employee_id, request);
        self.refresh(employee_id, request).await
    }

    /// Run the backend analysis, then load the employee again whatever the
    /// trigger's outcome. The refresh is a new request, and the loading flag
    /// stays raised until the whole workflow ends.
    pub async fn generate_analysis(&self, employee_id: EmployeeId) -> AnalysisReport {
        let _running = AnalysisGuard::enter(&self.state);
        let request = self.begin(employee_id);
        let _loading = LoadingGuard {
            state: &self.state,
            request,
        };

        info!("Generating analysis for employee {}", employee_id);
        let trigger = match self.backend.trigger_analysis(employee_id).await {
            Ok(ack) => {
                if let Some(message) = ack.message.as_deref() {
                    debug!("Backend: {}", message);
                }
                if self.is_current(request) {
                    self.sink.show(Notification::success(
                        "Analysis updated",
                        format!("The analysis of employee {} was updated.", employee_id),
                    ));
                }
                Ok(())
            }
            Err(e) => {
                warn!("Analysis trigger failed: {}", e);
                if self.is_current(request) {
                    notify::report(self.sink.as_ref(), &e);
                }
                Err(e)
            }
        };

        let load = self.load_employee(employee_id).await;
        AnalysisReport { trigger, load }
    }

    /// Start a request: bump the sequence number and raise the loading flag.
    fn begin(&self, employee_id: EmployeeId) -> u64 {
        let mut request = 0;
        self.state.send_modify(|s| {
            s.request += 1;
            s.employee_id = Some(employee_id);
            s.loading = true;
            s.request_done = false;
            request = s.request;
        });
        request
    }

    fn is_current(&self, request: u64) -> bool {
        self.state.borrow().request == request
    }

    async fn refresh(&self, employee_id: EmployeeId, request: u64) -> LoadReport {
        let reviews = async {
            let result = self.backend.reviews(employee_id).await;
            self.settle(request, employee_id, result, |s, owner, items| {
                s.reviews.replace(owner, items)
            })
        };

        let aspect_summaries = async {
            let result = self.backend.aspect_summaries(employee_id).await;
            self.settle(request, employee_id, result, |s, owner, items| {
                s.aspect_summaries.replace(owner, items)
            })
        };

        let general_summaries = async {
            let result = self.backend.general_summaries(employee_id).await;
            self.settle(request, employee_id, result, |s, owner, mut items| {
                // Chart follows the received order, history is stored oldest first.
                s.chart = chart::build(&items);
                items.reverse();
                s.general_summaries.replace(owner, items);
            })
        };

        let (reviews, aspect_summaries, general_summaries) =
            tokio::join!(reviews, aspect_summaries, general_summaries);

        let mut report = LoadReport {
            employee_id,
            request,
            reviews,
            aspect_summaries,
            general_summaries,
            superseded: false,
        };

        if !self.is_current(request) {
            debug!("Request {} superseded, results discarded", request);
            report.superseded = true;
            return report;
        }

        debug!("Load of employee {} finished: {:?}", employee_id, report.outcome());
        if report.loaded_any() {
            self.sink.show(Notification::success(
                "Employee data loaded",
                "Open the Reviews tab for feedback and the Summary tab for the analysis.",
            ));
        }

        report
    }

    /// Store or report one resource's result, unless the request is stale.
    fn settle<T>(
        &self,
        request: u64,
        employee_id: EmployeeId,
        result: Result<Vec<T>, DashboardError>,
        store: impl FnOnce(&mut EmployeeSnapshot, EmployeeId, Vec<T>),
    ) -> ResourceOutcome {
        match result {
            Ok(items) => {
                let count = items.len();
                let stored = self.state.send_if_modified(|s| {
                    if s.request != request {
                        return false;
                    }
                    store(s, employee_id, items);
                    true
                });
                if !stored {
                    debug!("Dropping stale response for request {}", request);
                }
                Ok(count)
            }
            Err(e) => {
                if self.is_current(request) {
                    notify::report(self.sink.as_ref(), &e);
                }
                Err(e)
            }
        }
    }
}

/// Marks its request as finished when dropped, and lowers the loading flag
/// if nothing else still holds it.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<EmployeeSnapshot>,
    request: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let request = self.request;
        self.state.send_if_modified(|s| {
            if s.request == request {
                s.request_done = true;
            }
            s.release_if_idle()
        });
    }
}

/// Keeps the loading flag raised for the lifetime of one analysis.
struct AnalysisGuard<'a> {
    state: &'a watch::Sender<EmployeeSnapshot>,
}

impl<'a> AnalysisGuard<'a> {
    fn enter(state: &'a watch::Sender<EmployeeSnapshot>) -> Self {
        // Counting alone is not a visible change.
        state.send_if_modified(|s| {
            s.analyses_running += 1;
            false
        });
        Self { state }
    }
}

impl Drop for AnalysisGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            s.analyses_running = s.analyses_running.saturating_sub(1);
            s.release_if_idle()
        });
    }
}
