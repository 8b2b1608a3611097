//! Per-employee dashboard state.
//!
//! The orchestrator owns the snapshot; the chart builder and the tab gate
//! are pure functions of what it holds.

pub mod chart;
pub mod orchestrator;
pub mod snapshot;
pub mod tabs;

pub use orchestrator::{EmployeeDataOrchestrator, LoadOutcome};
pub use snapshot::EmployeeSnapshot;
pub use tabs::{Tab, TabGate};
