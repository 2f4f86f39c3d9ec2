//! Chartship Repository Publishing
//!
//! This crate uploads packaged chart archives to the supported backends:
//!
//! - **OCI registries**: session-style login/logout plus `helm push`
//! - **ChartMuseum**: authenticated POST to the collection endpoint
//! - **HTTP object stores**: authenticated PUT of the archive
//!
//! The backend set is closed by design; dispatch is one exhaustive match
//! over [`RepositoryKind`], not a plugin registry. A push is a single
//! attempt with a bounded timeout, and failures carry enough detail
//! (status code and response body, or the network-level cause) to
//! diagnose the remote end.

pub mod config;
pub mod credentials;
pub mod error;
pub mod publish;

pub use config::{RepositoryKind, RepositoryTarget};
pub use credentials::Credentials;
pub use error::{RepoError, Result};
pub use publish::Publisher;
