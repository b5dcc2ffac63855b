//! Vision model capability
//!
//! The analysis workflow only needs "instruction + inline image in, free text
//! out". Anything implementing [`VisionModel`] can stand in for the hosted
//! model, which keeps the workflow testable without the network.

use aquafit_shared::ImageAsset;
use async_trait::async_trait;
use thiserror::Error;

mod gemini;

pub use gemini::GeminiVisionClient;

/// Failure of a single completion request
///
/// Every variant counts as a service failure for the attempt that saw it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisionError {
    #[error("request to the vision model timed out")]
    Timeout,

    #[error("vision model unreachable: {0}")]
    Transport(String),

    #[error("vision model returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("vision model response could not be decoded: {0}")]
    InvalidResponse(String),

    #[error("vision model returned no completion text")]
    EmptyCompletion,
}

/// Text completion over an instruction and one inline image
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Request exactly one completion
    async fn complete(&self, instruction: &str, image: &ImageAsset) -> Result<String, VisionError>;

    /// Model identifier used in logs
    fn model_name(&self) -> &str;
}
