//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Clients are built once at startup and every field is cheap to clone.

use crate::config::AppConfig;
use crate::services::{AnalysisWorkflow, AuthClient};
use crate::vision::{GeminiVisionClient, VisionModel};
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Analysis workflow, absent when AI is disabled or has no key
    pub analysis: Option<Arc<AnalysisWorkflow>>,
    /// Upstream account endpoints
    pub auth: AuthClient,
    /// Prometheus render handle, if the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state from configuration, wiring the Gemini client when enabled
    pub fn new(config: AppConfig) -> Result<Self> {
        let model: Option<Arc<dyn VisionModel>> = match (config.ai.enabled, config.ai.api_key()) {
            (true, Some(key)) => {
                info!(model = %config.ai.model, "AI analysis enabled");
                let client = GeminiVisionClient::new(&config.ai, key)?;
                Some(Arc::new(client) as Arc<dyn VisionModel>)
            }
            (true, None) => {
                warn!("AI analysis enabled but no API key configured; analysis disabled");
                None
            }
            (false, _) => None,
        };
        Self::with_model(config, model)
    }

    /// Create state around an explicit vision model
    pub fn with_model(config: AppConfig, model: Option<Arc<dyn VisionModel>>) -> Result<Self> {
        let auth = AuthClient::new(&config.auth, config.ai.request_timeout())?;
        let analysis = model
            .map(|model| Arc::new(AnalysisWorkflow::new(model, config.analysis.max_attempts)));

        Ok(Self {
            config: Arc::new(config),
            analysis,
            auth,
            metrics: None,
        })
    }

    /// Attach the Prometheus handle served at /metrics
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Analysis workflow, if AI is configured
    #[inline]
    pub fn analysis(&self) -> Option<&AnalysisWorkflow> {
        self.analysis.as_deref()
    }
}
