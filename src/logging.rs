//! Logger initialization.

use crate::config::LoggingConfig;

/// Install the global logger. `RUST_LOG` overrides `config.level`.
/// Later calls are ignored.
pub fn init_logging(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if !config.timestamps {
        builder.format_timestamp(None);
    }
    builder.format_target(true);
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

/// Initialize logging with defaults.
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}
