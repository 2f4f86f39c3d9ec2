//! Chartship Core - chart metadata model and version rewriting
//!
//! This crate provides the pieces of Chartship that understand a chart
//! without talking to anything external:
//! - `Chart`: the Chart.yaml model with publish-time validation
//! - `patch_versions` / `update_chart_file`: format-preserving version
//!   bumps that keep comments and field order intact

pub mod chart;
pub mod error;
pub mod version;

pub use chart::{ACCEPTED_API_VERSIONS, CHART_FILE, Chart, ChartDependency, Maintainer, chart_file};
pub use error::{CoreError, Result};
pub use version::{patch_versions, update_chart_file};
