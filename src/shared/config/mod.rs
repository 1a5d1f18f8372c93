mod global;
mod model;

pub use global::CONFIG;
pub use model::{
    DisplayConfig, EngineConfig, LoggingConfig, Settings, load_settings, load_settings_from,
};
