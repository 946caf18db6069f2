//! Config loading and persistence.

mod load;
mod merge;
mod schema;

pub use load::{ConfigError, config_path, load, load_or_init, load_user_config, write_config};
pub use merge::{apply_env_overrides, merge_layers};
pub use schema::{
    ApiConfigOverride, Config, ConfigLayer, LogFormat, LoggingConfig, LoggingConfigOverride,
    ShippingConfig, ShippingConfigOverride, StorageKeys, StorageKeysOverride,
};
