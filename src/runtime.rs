//! Runtime initialization - logging and process-wide buffer settings

use crate::buffer::BufferConfig;
use crate::config::RuntimeConfig;
use crate::error::ConfigError;
use crate::logging::{self, debug, info, warn};
use once_cell::sync::OnceCell;

static BUFFER_CONFIG: OnceCell<BufferConfig> = OnceCell::new();

/// Install logging and buffer settings from `config`
///
/// The first call wins; later calls keep the settings already in place.
pub fn init(config: RuntimeConfig) {
    logging::init_with_config(config.log.clone());

    if BUFFER_CONFIG.set(config.buffer).is_err() {
        debug!("Runtime already initialized, keeping existing buffer settings");
        return;
    }

    info!(
        initial_capacity = config.buffer.initial_capacity,
        growth = ?config.buffer.growth,
        "slotrc runtime initialized"
    );
}

/// Initialize from the environment, falling back to defaults on bad settings
pub fn init_from_env() {
    match RuntimeConfig::from_env() {
        Ok(config) => init(config),
        Err(e) => {
            init(RuntimeConfig::default());
            warn!(error = %e, "Ignoring invalid runtime settings from environment");
        }
    }
}

/// Initialize from a TOML file (with environment overrides)
pub fn init_from_file(path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
    init(RuntimeConfig::load(path)?);
    Ok(())
}

/// Settings used for buffers created through the C API
pub fn buffer_config() -> BufferConfig {
    BUFFER_CONFIG.get().copied().unwrap_or_default()
}

/// Runtime initialization for generated code
#[no_mangle]
pub extern "C" fn slotrc_runtime_init() {
    init_from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_config_is_valid() {
        init_from_env();
        assert!(buffer_config().validate().is_ok());
        assert!(logging::is_initialized());
    }
}
