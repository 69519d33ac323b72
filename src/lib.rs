//! `health-probe` runs a retried HTTP health check against one endpoint.
//!
//! The crate is split into two pieces:
//! - [`HttpExecutor`] issues a single GET with a timeout and measures
//!   end-to-end latency;
//! - [`RetryController`] drives attempts against the configured status and
//!   latency criteria and produces a [`Verdict`].

pub mod config;
mod controller;
mod error;
mod executor;
mod options;
mod preview;
pub mod report;
mod types;

pub use config::{MonitoringConfig, TargetOverrides};
pub use controller::RetryController;
pub use error::{ExecuteError, ProbeError};
pub use executor::{Execute, HttpExecutor};
pub use options::{ProbeOptions, DEFAULT_USER_AGENT};
pub use preview::{BodyPreview, PREVIEW_LIMIT};
pub use types::{AttemptEvent, AttemptOutcome, AttemptResult, HttpResponse, Verdict};

pub type Result<T> = std::result::Result<T, ProbeError>;
