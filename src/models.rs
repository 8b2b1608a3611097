//! Data models for the feedback dashboard.
//!
//! This module contains the wire schemas returned by the feedback backend
//! together with the derived values the dashboard builds from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest score the backend's analysis can produce.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score the backend's analysis can produce.
pub const MAX_SCORE: f64 = 5.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map($name)
            }
        }
    };
}

id_newtype!(AspectId);
id_newtype!(EmployeeId);
id_newtype!(ReviewerId);

/// The backend resources the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Aspects,
    Reviews,
    AspectSummaries,
    GeneralSummaries,
    AnalysisTrigger,
    Employees,
    Psychotype,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Aspects => write!(f, "aspects"),
            ResourceKind::Reviews => write!(f, "reviews"),
            ResourceKind::AspectSummaries => write!(f, "aspect summaries"),
            ResourceKind::GeneralSummaries => write!(f, "general summaries"),
            ResourceKind::AnalysisTrigger => write!(f, "analysis"),
            ResourceKind::Employees => write!(f, "employees"),
            ResourceKind::Psychotype => write!(f, "psychotype"),
        }
    }
}

/// Boundary validation applied to every decoded record.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

fn check_score(score: f64) -> Result<(), String> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(format!(
            "score {} outside [{}, {}]",
            score, MIN_SCORE, MAX_SCORE
        ))
    }
}

/// A named dimension of evaluation kept in the shared catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: AspectId,
    pub text: String,
}

impl Validate for Aspect {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Request body for creating an aspect.
#[derive(Debug, Serialize)]
pub struct NewAspect<'a> {
    pub text: &'a str,
}

/// A single piece of feedback about an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Author of the review.
    #[serde(rename = "ID_reviewer")]
    pub reviewer_id: ReviewerId,
    /// Subject of the review, when the backend includes it.
    #[serde(rename = "ID_under_review", default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    /// Review body.
    #[serde(rename = "review")]
    pub text: String,
    /// True when the employee reviewed themselves.
    #[serde(default)]
    pub is_self_review: bool,
    /// Weight the backend assigned to this review during analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Review {
    /// Badge shown next to the review.
    pub fn badge(&self) -> &'static str {
        if self.is_self_review {
            "Self-review"
        } else {
            "Peer review"
        }
    }
}

impl Validate for Review {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Per-aspect score and narrative produced by the backend's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub aspect_name: String,
    pub score: f64,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Validate for AspectSummary {
    fn validate(&self) -> Result<(), String> {
        check_score(self.score).map_err(|e| format!("aspect '{}': {}", self.aspect_name, e))
    }
}

/// Overall score and narrative for one employee at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSummary {
    pub score: f64,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Validate for GeneralSummary {
    fn validate(&self) -> Result<(), String> {
        check_score(self.score)
    }
}

/// Positional point of the score trend. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub index: usize,
    pub score: f64,
}

/// Roster entry from the backend's employee listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeOverview {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub psychotype: Option<String>,
    #[serde(default)]
    pub psychotype_description: Option<String>,
    #[serde(default)]
    pub feedback_count: usize,
}

impl Validate for EmployeeOverview {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Psychotype profile the analysis attaches to an employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Psychotype {
    #[serde(default)]
    pub psychotype: Option<String>,
    #[serde(default)]
    pub psychotype_description: Option<String>,
}

impl Psychotype {
    /// True when the analysis has not produced a profile yet.
    pub fn is_empty(&self) -> bool {
        self.psychotype.is_none() && self.psychotype_description.is_none()
    }
}

impl Validate for Psychotype {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Response of the analysis trigger. The backend gives no payload contract,
/// so every field is optional and only used for logging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisAck {
    #[serde(default)]
    pub message: Option<String>,
}
