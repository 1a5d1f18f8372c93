use crate::engine::core::result::NullOrder;
use crate::shared::config::{CONFIG, Settings};

/// How result rows are ordered and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Rendered in place of an aggregated-away dimension
    pub aggregated_marker: String,
    /// Default placement of NULL and aggregated slots
    pub null_order: NullOrder,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            aggregated_marker: "TOTAL".to_string(),
            null_order: NullOrder::Last,
        }
    }
}

/// Engine tuning, decoupled from the global configuration so that library
/// callers and tests can build one directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub max_dimensions: usize,
    /// 0 = one partition per rayon worker
    pub worker_threads: usize,
    pub batch_size: usize,
    pub display: DisplayOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_dimensions: 8,
            worker_threads: 0,
            batch_size: 1024,
            display: DisplayOptions::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_dimensions: settings.engine.max_dimensions,
            worker_threads: settings.engine.worker_threads,
            batch_size: settings.engine.batch_size.max(1),
            display: DisplayOptions {
                aggregated_marker: settings.display.aggregated_marker.clone(),
                null_order: settings.display.null_order,
            },
        }
    }

    pub fn from_app_config() -> Self {
        Self::from_settings(&CONFIG)
    }

    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_max_dimensions(mut self, max: usize) -> Self {
        self.max_dimensions = max;
        self
    }

    pub fn with_null_order(mut self, order: NullOrder) -> Self {
        self.display.null_order = order;
        self
    }

    pub fn with_aggregated_marker(mut self, marker: &str) -> Self {
        self.display.aggregated_marker = marker.to_string();
        self
    }
}
