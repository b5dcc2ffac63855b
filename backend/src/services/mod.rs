//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the shared domain crate and external systems.

pub mod analysis;
pub mod auth;
pub mod profile;

pub use analysis::{AnalysisError, AnalysisInput, AnalysisReport, AnalysisWorkflow};
pub use auth::{AuthClient, AuthClientError};
pub use profile::ProfileService;
