//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::delivery::Delivery;
use crate::highlight::HighlightPipeline;
use crate::oracle::SelectionOracle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    delivery: Delivery,
    pipeline: HighlightPipeline,
}

impl AppState {
    /// Create a new application state around the given oracle
    pub fn new(config: Config, oracle: Arc<dyn SelectionOracle>) -> Self {
        let delivery = Delivery::new(config.output.clone());
        let pipeline = HighlightPipeline::new(oracle, delivery.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                delivery,
                pipeline,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the output delivery
    pub fn delivery(&self) -> &Delivery {
        &self.inner.delivery
    }

    /// Get the highlight pipeline
    pub fn pipeline(&self) -> &HighlightPipeline {
        &self.inner.pipeline
    }
}
