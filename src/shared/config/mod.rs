pub mod model;

pub use model::{
    GeneratorConfig, LoggingConfig, Settings, StoreConfig, load_settings, load_settings_from,
};
