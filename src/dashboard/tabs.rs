//! Tab availability derived from the snapshot.

use super::snapshot::EmployeeSnapshot;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Aspects,
    Reviews,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Aspects, Tab::Reviews, Tab::Summary];
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Aspects => write!(f, "Aspects"),
            Tab::Reviews => write!(f, "Reviews"),
            Tab::Summary => write!(f, "Summary"),
        }
    }
}

/// Which tabs the view may open for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabGate {
    reviews: bool,
    summary: bool,
}

impl TabGate {
    pub fn evaluate(snapshot: &EmployeeSnapshot) -> Self {
        Self {
            reviews: !snapshot.reviews.is_empty(),
            summary: !snapshot.aspect_summaries.is_empty()
                && !snapshot.general_summaries.is_empty(),
        }
    }

    pub fn is_enabled(&self, tab: Tab) -> bool {
        match tab {
            Tab::Aspects => true,
            Tab::Reviews => self.reviews,
            Tab::Summary => self.summary,
        }
    }

    pub fn enabled_tabs(&self) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| self.is_enabled(*tab))
            .collect()
    }
}
