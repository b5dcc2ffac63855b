//! AquaFit Shared Library
//!
//! This crate contains the domain types, health calculations, validation and
//! analysis layout handling used by the backend and WASM modules.

pub mod analysis;
pub mod errors;
pub mod health_metrics;
pub mod image;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use analysis::{parse_analysis_response, AnalysisRequest, ParsedAnalysis};
pub use errors::*;
pub use health_metrics::*;
pub use image::{ImageAsset, MAX_IMAGE_BYTES};
pub use models::*;
pub use types::*;
