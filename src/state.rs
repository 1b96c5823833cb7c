//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::ParsePipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    pipeline: ParsePipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: ParsePipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the parse workflow
    pub fn pipeline(&self) -> &ParsePipeline {
        &self.inner.pipeline
    }
}
