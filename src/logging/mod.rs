//! Logging infrastructure - structured tracing throughout the runtime
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable level from the environment
//! - Zero-cost when disabled (allocation events are `trace!`)
//! - Optional JSON output and span events
//! - Optional file output

use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::io;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub use tracing::{debug, error, info, trace, warn};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level: trace, debug, info, warn, error
    pub level: String,
    /// Log file path; console only when unset
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `SLOTRC_LOG_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(level) = std::env::var("SLOTRC_LOG_LEVEL") {
            self.level = level.to_lowercase();
        }

        if let Ok(path) = std::env::var("SLOTRC_LOG_FILE") {
            self.log_path = Some(path);
        }

        if std::env::var("SLOTRC_LOG_JSON").is_ok() {
            self.json_format = true;
        }

        if std::env::var("SLOTRC_LOG_SPANS").is_ok() {
            self.show_spans = true;
        }
    }

    /// Parsed level; unknown names fall back to INFO
    pub fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Verbose config: every allocation event, span events on
    pub fn debug() -> Self {
        Self {
            level: "trace".to_string(),
            log_path: None,
            json_format: false,
            show_spans: true,
        }
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call installs a subscriber; later calls are no-ops, as is
/// the case when the host process already installed its own.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("slotrc={}", config.level().as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let console = fmt::layer()
            .with_writer(io::stderr)
            .with_span_events(span_events.clone())
            .with_target(true)
            .with_line_number(cfg!(debug_assertions));
        let console = if config.json_format {
            console.json().boxed()
        } else {
            console.boxed()
        };

        let file = config.log_path.as_deref().map(|path| {
            let path = Path::new(path);
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "slotrc.log".into());

            fmt::layer()
                .with_writer(tracing_appender::rolling::never(directory, file_name))
                .with_ansi(false)
                .with_span_events(span_events)
                .boxed()
        });

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(file)
            .try_init();
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Runtime-specific logging functions
// ============================================================================

/// Log managed block allocation
#[inline]
pub fn log_allocation(size: usize, ptr: *const u8) {
    trace!(
        event = "allocation",
        size_bytes = size,
        address = ?ptr,
        "Managed block allocated"
    );
}

/// Log managed block deallocation
#[inline]
pub fn log_deallocation(ptr: *const u8) {
    trace!(
        event = "deallocation",
        address = ?ptr,
        "Managed block freed"
    );
}

/// Log buffer growth (reallocation of the backing storage)
#[inline]
pub fn log_growth(old_capacity: usize, new_capacity: usize, length: usize) {
    debug!(
        event = "buffer_grow",
        old_capacity,
        new_capacity,
        length,
        "Slot buffer grown"
    );
}

/// Log a rejected out-of-range read
#[inline]
pub fn log_index_rejected(index: f64, length: usize) {
    warn!(
        event = "index_out_of_range",
        index,
        length,
        "Slot buffer read rejected"
    );
}

/// Log FFI error
pub fn log_ffi_error(fn_name: &str, error: &str) {
    error!(
        event = "ffi_error",
        function = fn_name,
        error = error,
        "FFI function error"
    );
}
