//! Recoverable error conditions
//!
//! Allocation exhaustion is deliberately absent: it is fatal and never
//! surfaces as a `Result`.

use core::fmt;

/// Slot buffer errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferError {
    /// Read outside `0..length`; the index is kept as received (it may be
    /// negative or non-finite when it came from script code)
    IndexOutOfRange { index: f64, length: usize },
    /// Requested capacity cannot be represented
    CapacityOverflow,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, length } => {
                write!(f, "Index {} out of range for buffer of length {}", index, length)
            }
            Self::CapacityOverflow => write!(f, "Buffer capacity overflow"),
        }
    }
}

impl std::error::Error for BufferError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// Fixed growth with a zero increment could never make room
    ZeroIncrement,
    /// Unrecognised growth policy name
    UnknownGrowth(String),
    /// Malformed numeric setting
    InvalidNumber { key: &'static str, value: String },
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroIncrement => write!(f, "Fixed growth increment must be at least 1"),
            Self::UnknownGrowth(name) => write!(f, "Unknown growth policy: {}", name),
            Self::InvalidNumber { key, value } => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
            Self::Io(e) => write!(f, "Failed to read config: {}", e),
            Self::Parse(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}
