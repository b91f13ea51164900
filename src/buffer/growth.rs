//! Growth policy - how much capacity a full buffer gains
//!
//! Both policies are deterministic: the capacity sequence depends only on the
//! initial capacity and the policy, so the set of pushes that reallocate
//! (and invalidate the backing address) is known in advance.

use crate::error::ConfigError;
use serde::Deserialize;
use std::str::FromStr;

/// Initial capacity used by [`super::GrowableSlotBuffer::new`]
pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

/// Increment used by the fixed reference policy
pub const DEFAULT_INCREMENT: usize = 10;

/// Capacity growth strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Add a constant number of slots (amortised O(n) per push for long runs)
    Fixed { increment: usize },
    /// Double the capacity, growing an empty buffer to one slot
    Doubling,
}

impl GrowthPolicy {
    /// Capacity after one growth step from `current`; `None` on overflow
    #[inline]
    pub fn next_capacity(self, current: usize) -> Option<usize> {
        match self {
            Self::Fixed { increment } => current.checked_add(increment),
            Self::Doubling => current.checked_mul(2).map(|doubled| doubled.max(1)),
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::Doubling
    }
}

/// Parses `double` / `doubling` or `fixed:<increment>`
impl FromStr for GrowthPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "double" | "doubling" => Ok(Self::Doubling),
            "fixed" => Ok(Self::Fixed { increment: DEFAULT_INCREMENT }),
            _ => {
                let increment = normalized
                    .strip_prefix("fixed:")
                    .ok_or_else(|| ConfigError::UnknownGrowth(s.to_string()))?;
                let increment = increment.parse().map_err(|_| ConfigError::InvalidNumber {
                    key: "growth increment",
                    value: increment.to_string(),
                })?;
                Ok(Self::Fixed { increment })
            }
        }
    }
}

/// Buffer construction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub initial_capacity: usize,
    pub growth: GrowthPolicy,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth: GrowthPolicy::Doubling,
        }
    }
}

impl BufferConfig {
    /// Constant-increment growth
    pub const fn fixed(initial_capacity: usize, increment: usize) -> Self {
        Self {
            initial_capacity,
            growth: GrowthPolicy::Fixed { increment },
        }
    }

    /// Ten slots up front, ten more each time the buffer fills
    pub const fn reference() -> Self {
        Self::fixed(DEFAULT_INITIAL_CAPACITY, DEFAULT_INCREMENT)
    }

    /// Reject settings under which a full buffer could never grow
    pub fn validate(&self) -> Result<(), ConfigError> {
        if std::alloc::Layout::array::<u64>(self.initial_capacity).is_err() {
            return Err(ConfigError::InvalidNumber {
                key: "initial_capacity",
                value: self.initial_capacity.to_string(),
            });
        }

        match self.growth {
            GrowthPolicy::Fixed { increment: 0 } => Err(ConfigError::ZeroIncrement),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_adds_increment() {
        let policy = GrowthPolicy::Fixed { increment: 10 };
        assert_eq!(policy.next_capacity(10), Some(20));
        assert_eq!(policy.next_capacity(20), Some(30));
        assert_eq!(policy.next_capacity(usize::MAX), None);
    }

    #[test]
    fn test_doubling_from_empty() {
        let policy = GrowthPolicy::Doubling;
        assert_eq!(policy.next_capacity(0), Some(1));
        assert_eq!(policy.next_capacity(1), Some(2));
        assert_eq!(policy.next_capacity(10), Some(20));
        assert_eq!(policy.next_capacity(usize::MAX / 2 + 1), None);
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("double".parse::<GrowthPolicy>().unwrap(), GrowthPolicy::Doubling);
        assert_eq!(" Doubling ".parse::<GrowthPolicy>().unwrap(), GrowthPolicy::Doubling);
        assert_eq!(
            "fixed".parse::<GrowthPolicy>().unwrap(),
            GrowthPolicy::Fixed { increment: DEFAULT_INCREMENT }
        );
        assert_eq!(
            "fixed:32".parse::<GrowthPolicy>().unwrap(),
            GrowthPolicy::Fixed { increment: 32 }
        );
        assert!(matches!(
            "fixed:lots".parse::<GrowthPolicy>(),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            "triple".parse::<GrowthPolicy>(),
            Err(ConfigError::UnknownGrowth(_))
        ));
    }

    #[test]
    fn test_unknown_growth_keeps_input() {
        match " Triple ".parse::<GrowthPolicy>() {
            Err(ConfigError::UnknownGrowth(value)) => assert_eq!(value, " Triple "),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_increment() {
        assert!(BufferConfig::fixed(10, 0).validate().is_err());
        assert!(BufferConfig::fixed(0, 1).validate().is_ok());
        assert!(BufferConfig::default().validate().is_ok());
        assert!(matches!(
            BufferConfig::fixed(usize::MAX, 1).validate(),
            Err(ConfigError::InvalidNumber { key: "initial_capacity", .. })
        ));
    }

    #[test]
    fn test_reference_config() {
        let config = BufferConfig::reference();
        assert_eq!(config.initial_capacity, 10);
        assert_eq!(config.growth, GrowthPolicy::Fixed { increment: 10 });
    }
}
