//! Job application tracking core: the application store with its two-phase
//! import, the dashboard projection, and resume keyword scoring.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod keywords;
pub mod telemetry;
pub mod tracker;
