//! Per-channel log filtering keyed by wildcard patterns.
//!
//! A channel is a dotted name such as `plugseek.discovery`. Filters are
//! applied in insertion order and every matching filter overrides what came
//! before it, so broad patterns go first and specific ones after:
//!
//! ```
//! use plugseek_core::channel_filter::{ChannelFilterList, ChannelLevel};
//!
//! let filters = ChannelFilterList::from_entries([
//!     ("plugseek.*", "warn"),
//!     ("plugseek.discovery", "verbose"),
//! ]);
//!
//! let setting = filters.resolve("plugseek.discovery");
//! assert_eq!(setting.level, Some(ChannelLevel::Verbose));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::Error;
use crate::wildcard::match_wildcard;

/// Severity threshold for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLevel {
    Verbose,
    Info,
    Warn,
    Error,
    Fatal,
    /// Turns the channel off.
    Disabled,
}

impl ChannelLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            ChannelLevel::Verbose => LevelFilter::TRACE,
            ChannelLevel::Info => LevelFilter::INFO,
            ChannelLevel::Warn => LevelFilter::WARN,
            ChannelLevel::Error | ChannelLevel::Fatal => LevelFilter::ERROR,
            ChannelLevel::Disabled => LevelFilter::OFF,
        }
    }
}

impl FromStr for ChannelLevel {
    type Err = Error;

    /// Only the first character is significant, case-insensitively, so
    /// `"w"`, `"warn"` and `"Warning"` are all [`ChannelLevel::Warn`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s.trim().chars().next().map(|c| c.to_ascii_lowercase());
        match first {
            Some('v') => Ok(ChannelLevel::Verbose),
            Some('i') => Ok(ChannelLevel::Info),
            Some('w') => Ok(ChannelLevel::Warn),
            Some('e') => Ok(ChannelLevel::Error),
            Some('f') => Ok(ChannelLevel::Fatal),
            Some('d') => Ok(ChannelLevel::Disabled),
            _ => Err(Error::UnknownLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ChannelLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChannelLevel::Verbose => "verbose",
            ChannelLevel::Info => "info",
            ChannelLevel::Warn => "warn",
            ChannelLevel::Error => "error",
            ChannelLevel::Fatal => "fatal",
            ChannelLevel::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// One pattern and what it does to matching channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFilter {
    pub pattern: String,
    pub enabled: bool,
    /// `None` leaves the level untouched.
    pub level: Option<ChannelLevel>,
}

impl ChannelFilter {
    /// A filter built from a configured level. [`ChannelLevel::Disabled`]
    /// disables the channel; anything else enables it at that level.
    pub fn from_level(pattern: impl Into<String>, level: ChannelLevel) -> Self {
        let pattern = pattern.into();
        match level {
            ChannelLevel::Disabled => Self {
                pattern,
                enabled: false,
                level: None,
            },
            level => Self {
                pattern,
                enabled: true,
                level: Some(level),
            },
        }
    }

    pub fn matches(&self, channel: &str) -> bool {
        match_wildcard(channel, &self.pattern)
    }
}

/// Effective configuration of a channel after all filters have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelSetting {
    /// `None` when no filter said anything about enablement.
    pub enabled: Option<bool>,
    pub level: Option<ChannelLevel>,
}

impl ChannelSetting {
    /// The `tracing` level this setting allows, falling back to `default`
    /// when no filter set a level.
    pub fn level_filter(&self, default: LevelFilter) -> LevelFilter {
        if self.enabled == Some(false) {
            return LevelFilter::OFF;
        }
        self.level.map_or(default, ChannelLevel::to_level_filter)
    }
}

/// Ordered, pattern-deduplicated list of channel filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelFilterList {
    filters: Vec<ChannelFilter>,
}

impl ChannelFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from `(pattern, level)` pairs. Entries with an unknown
    /// level or an empty pattern are logged and skipped.
    pub fn from_entries<I, P, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, L)>,
        P: AsRef<str>,
        L: AsRef<str>,
    {
        let mut list = Self::new();
        for (pattern, level) in entries {
            let (pattern, level) = (pattern.as_ref(), level.as_ref());
            if pattern.is_empty() {
                tracing::warn!(channel_level = level, "Ignoring log channel filter with an empty pattern");
                continue;
            }
            match level.parse::<ChannelLevel>() {
                Ok(level) => list.insert(ChannelFilter::from_level(pattern, level)),
                Err(e) => tracing::warn!(pattern, error = %e, "Ignoring log channel filter"),
            }
        }
        list
    }

    /// Add a filter. A filter with the same pattern is replaced in place,
    /// keeping its original position.
    pub fn insert(&mut self, filter: ChannelFilter) {
        match self.filters.iter_mut().find(|f| f.pattern == filter.pattern) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    pub fn remove(&mut self, pattern: &str) -> Option<ChannelFilter> {
        let index = self.filters.iter().position(|f| f.pattern == pattern)?;
        Some(self.filters.remove(index))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelFilter> {
        self.filters.iter()
    }

    /// Apply every filter matching `channel` in order.
    pub fn resolve(&self, channel: &str) -> ChannelSetting {
        self.filters
            .iter()
            .filter(|f| f.matches(channel))
            .fold(ChannelSetting::default(), |mut setting, f| {
                setting.enabled = Some(f.enabled);
                if f.level.is_some() {
                    setting.level = f.level;
                }
                setting
            })
    }
}
