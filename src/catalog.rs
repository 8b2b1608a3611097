//! Aspect catalog management.
//!
//! The catalog is never merged locally: every successful mutation is
//! followed by a full re-read from the backend.

use crate::backend::BackendClient;
use crate::error::DashboardError;
use crate::models::{Aspect, AspectId};
use crate::notify::{self, Notification, NotificationSink};
use std::sync::Arc;
use tracing::{debug, info};

/// Client-side view of the shared aspect catalog.
pub struct AspectCatalogClient {
    backend: BackendClient,
    sink: Arc<dyn NotificationSink>,
    aspects: Vec<Aspect>,
    draft: String,
}

impl AspectCatalogClient {
    pub fn new(backend: BackendClient, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            backend,
            sink,
            aspects: Vec::new(),
            draft: String::new(),
        }
    }

    /// The last full catalog read from the backend.
    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    /// Text currently typed into the "new aspect" input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Replace the local catalog with the backend's full list.
    pub async fn list(&mut self) -> Result<&[Aspect], DashboardError> {
        match self.backend.list_aspects().await {
            Ok(aspects) => {
                debug!("Catalog holds {} aspects", aspects.len());
                self.aspects = aspects;
                Ok(&self.aspects)
            }
            Err(e) => {
                notify::report(self.sink.as_ref(), &e);
                Err(e)
            }
        }
    }

    /// Create an aspect. Blank text is skipped without touching the backend;
    /// anything else is sent as typed.
    pub async fn create(&mut self, text: &str) -> Result<(), DashboardError> {
        if text.trim().is_empty() {
            debug!("Skipping blank aspect");
            return Err(DashboardError::ValidationSkip {
                reason: "aspect text is empty".to_string(),
            });
        }

        info!("Creating aspect '{}'", text);
        if let Err(e) = self.backend.create_aspect(text).await {
            notify::report(self.sink.as_ref(), &e);
            return Err(e);
        }

        self.list().await?;
        self.sink.show(Notification::success(
            "Aspect added",
            format!("'{}' was added to the catalog.", text),
        ));
        Ok(())
    }

    /// Submit the draft. The draft is cleared whether or not the backend
    /// accepts it; blank drafts are left alone.
    pub async fn submit_draft(&mut self) -> Result<(), DashboardError> {
        if self.draft.trim().is_empty() {
            return Err(DashboardError::ValidationSkip {
                reason: "aspect text is empty".to_string(),
            });
        }

        let text = std::mem::take(&mut self.draft);
        self.create(&text).await
    }

    /// Delete an aspect by id.
    pub async fn delete(&mut self, id: AspectId) -> Result<(), DashboardError> {
        info!("Deleting aspect {}", id);
        if let Err(e) = self.backend.delete_aspect(id).await {
            notify::report(self.sink.as_ref(), &e);
            return Err(e);
        }

        self.list().await?;
        self.sink.show(Notification::success(
            "Aspect deleted",
            format!("Aspect {} was removed from the catalog.", id),
        ));
        Ok(())
    }
}
