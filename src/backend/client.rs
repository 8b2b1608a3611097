//! HTTP client for the feedback backend REST API.
//!
//! All responses are decoded into explicit schemas and validated here, so
//! callers only ever see typed values or a [`DashboardError`].

use crate::error::DashboardError;
use crate::models::{
    AnalysisAck, Aspect, AspectId, AspectSummary, EmployeeId, EmployeeOverview, GeneralSummary,
    NewAspect, Psychotype, ResourceKind, Review, Validate,
};
use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base URL including the API prefix, e.g. `http://localhost:8000/reviews/api`.
    pub base_url: String,
    /// Optional per-request timeout. `None` waits for the runtime to give up.
    pub timeout_seconds: Option<u64>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/reviews/api".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Typed client for every endpoint the dashboard consumes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    timeout_seconds: Option<u64>,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: settings.timeout_seconds,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // --- aspect catalog ---

    pub async fn list_aspects(&self) -> Result<Vec<Aspect>, DashboardError> {
        self.get_list("/aspects", ResourceKind::Aspects, None).await
    }

    pub async fn create_aspect(&self, text: &str) -> Result<(), DashboardError> {
        let response = self
            .send(
                self.http.post(self.url("/aspects")).json(&NewAspect { text }),
                ResourceKind::Aspects,
            )
            .await?;
        expect_success(response, ResourceKind::Aspects, None).await?;
        Ok(())
    }

    pub async fn delete_aspect(&self, id: AspectId) -> Result<(), DashboardError> {
        let response = self
            .send(
                self.http.delete(self.url(&format!("/aspects/{}", id))),
                ResourceKind::Aspects,
            )
            .await?;
        expect_success(response, ResourceKind::Aspects, None).await?;
        Ok(())
    }

    // --- per-employee resources ---

    pub async fn reviews(&self, employee: EmployeeId) -> Result<Vec<Review>, DashboardError> {
        self.get_employee_list(&format!("/feedback/{}", employee), ResourceKind::Reviews, employee)
            .await
    }

    pub async fn aspect_summaries(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<AspectSummary>, DashboardError> {
        self.get_employee_list(
            &format!("/aspect-summaries/{}", employee),
            ResourceKind::AspectSummaries,
            employee,
        )
        .await
    }

    /// General summaries in the order the backend sends them (most recent first).
    pub async fn general_summaries(
        &self,
        employee: EmployeeId,
    ) -> Result<Vec<GeneralSummary>, DashboardError> {
        self.get_employee_list(
            &format!("/general-summaries/{}", employee),
            ResourceKind::GeneralSummaries,
            employee,
        )
        .await
    }

    /// Ask the backend to (re)run its analysis for an employee.
    pub async fn trigger_analysis(&self, employee: EmployeeId) -> Result<AnalysisAck, DashboardError> {
        let resource = ResourceKind::AnalysisTrigger;
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("/feedback/generate-summary/{}", employee))),
                resource,
            )
            .await?;
        // Any non-2xx, 404 included, is a failed trigger rather than a lookup miss.
        let body = expect_success(response, resource, None).await?;

        // No payload contract; anything undecodable is just an empty ack.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    // --- directory ---

    pub async fn employees(&self) -> Result<Vec<EmployeeOverview>, DashboardError> {
        self.get_list("/employees/feedback-count", ResourceKind::Employees, None)
            .await
    }

    pub async fn psychotype(&self, employee: EmployeeId) -> Result<Psychotype, DashboardError> {
        let resource = ResourceKind::Psychotype;
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/employee/{}/psychotype", employee))),
                resource,
            )
            .await?;
        let body = expect_success(response, resource, Some(employee)).await?;
        let profile: Psychotype = decode(&body, resource)?;
        profile
            .validate()
            .map_err(|e| DashboardError::network(resource, e))?;
        Ok(profile)
    }

    // --- plumbing ---

    /// Fetch an employee-scoped collection; an empty array is `EmptyResult`.
    async fn get_employee_list<T>(
        &self,
        path: &str,
        resource: ResourceKind,
        employee: EmployeeId,
    ) -> Result<Vec<T>, DashboardError>
    where
        T: DeserializeOwned + Validate,
    {
        let items = self.get_list(path, resource, Some(employee)).await?;
        if items.is_empty() {
            return Err(DashboardError::EmptyResult { resource });
        }
        Ok(items)
    }

    async fn get_list<T>(
        &self,
        path: &str,
        resource: ResourceKind,
        employee: Option<EmployeeId>,
    ) -> Result<Vec<T>, DashboardError>
    where
        T: DeserializeOwned + Validate,
    {
        let response = self.send(self.http.get(self.url(path)), resource).await?;
        let body = expect_success(response, resource, employee).await?;

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<T> = decode(&body, resource)?;
        for item in &items {
            item.validate()
                .map_err(|e| DashboardError::network(resource, format!("invalid payload: {}", e)))?;
        }

        debug!("Decoded {} {}", items.len(), resource);
        Ok(items)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        resource: ResourceKind,
    ) -> Result<Response, DashboardError> {
        request.send().await.map_err(|e| {
            let cause = if e.is_timeout() {
                format!(
                    "request timed out after {}s",
                    self.timeout_seconds.unwrap_or_default()
                )
            } else if e.is_connect() {
                format!("cannot connect to backend at {}", self.base_url)
            } else {
                format!("failed to send request: {}", e)
            };
            debug!("Transport error for {}: {}", resource, e);
            DashboardError::network(resource, cause)
        })
    }
}

/// Classify the status and return the body of a successful response.
async fn expect_success(
    response: Response,
    resource: ResourceKind,
    employee: Option<EmployeeId>,
) -> Result<String, DashboardError> {
    let status = response.status();
    debug!("{} {} -> {}", resource, response.url(), status);

    if status == StatusCode::NOT_FOUND {
        if let Some(employee_id) = employee {
            return Err(DashboardError::NotFound {
                resource,
                employee_id,
            });
        }
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DashboardError::network(
            resource,
            format!("backend error {}: {}", status, body.trim()),
        ));
    }

    response
        .text()
        .await
        .map_err(|e| DashboardError::network(resource, format!("failed to read body: {}", e)))
}

fn decode<T: DeserializeOwned>(body: &str, resource: ResourceKind) -> Result<T, DashboardError> {
    serde_json::from_str(body)
        .map_err(|e| DashboardError::network(resource, format!("failed to parse response: {}", e)))
}
