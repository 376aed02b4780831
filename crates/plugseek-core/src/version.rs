//! Interface versions and the compatibility policy between them.
//!
//! A [`Version`] is a `(major, minor)` pair. The major version gates breaking
//! changes; the minor version counts backward-compatible additions. The `0.x`
//! line is unstable, so any minor difference there is treated as noteworthy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// A two-component interface version.
///
/// Ordering is lexicographic on `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether this version is on the unstable `0.x` line.
    pub const fn is_prerelease(&self) -> bool {
        self.major == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Parse `"1.2"` or `"v1.2"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        let (major, minor) = digits
            .split_once('.')
            .ok_or_else(|| Error::VersionParse(s.to_string()))?;

        let component = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::VersionParse(s.to_string()));
            }
            part.parse::<u32>()
                .map_err(|_| Error::VersionParse(s.to_string()))
        };

        Ok(Self {
            major: component(major)?,
            minor: component(minor)?,
        })
    }
}

impl TryFrom<&semver::Version> for Version {
    type Error = Error;

    /// Keep major and minor; patch and pre-release tags carry no
    /// compatibility meaning here. Components beyond `u32` are rejected.
    fn try_from(v: &semver::Version) -> Result<Self, Self::Error> {
        let component = |n: u64| u32::try_from(n).map_err(|_| Error::VersionParse(v.to_string()));
        Ok(Self {
            major: component(v.major)?,
            minor: component(v.minor)?,
        })
    }
}

impl From<(u32, u32)> for Version {
    fn from((major, minor): (u32, u32)) -> Self {
        Self { major, minor }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of comparing a required version against a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    /// Usable, but the candidate is newer within an unstable `0.x` line.
    CompatibleWithWarning(String),
    Incompatible,
}

impl Compatibility {
    /// Whether the candidate may be used, with or without a warning.
    pub fn is_compatible(&self) -> bool {
        !matches!(self, Compatibility::Incompatible)
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Compatibility::CompatibleWithWarning(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Decide whether `candidate` satisfies a component that requires `required`.
///
/// - A major mismatch is always incompatible.
/// - On the `0.x` line, an older candidate minor is incompatible and a newer
///   one is compatible with a warning.
/// - On a stable line, an older candidate minor is incompatible; an equal or
///   newer one is compatible.
///
/// Pure comparison, nothing is logged. Use [`is_compatible`] at the point
/// where a module is actually about to be used.
pub fn compare(name: &str, required: Version, candidate: Version) -> Compatibility {
    if required.major != candidate.major {
        return Compatibility::Incompatible;
    }

    if required.is_prerelease() {
        return match required.minor.cmp(&candidate.minor) {
            std::cmp::Ordering::Greater => Compatibility::Incompatible,
            std::cmp::Ordering::Equal => Compatibility::Compatible,
            std::cmp::Ordering::Less => Compatibility::CompatibleWithWarning(format!(
                "Possible version incompatibility. Attempting to load {} with version v{} against v{}",
                name, candidate, required
            )),
        };
    }

    if required.minor > candidate.minor {
        Compatibility::Incompatible
    } else {
        Compatibility::Compatible
    }
}

/// Same verdict as [`compare`]. The warning case also emits a `tracing`
/// warning naming `name` and both versions.
pub fn is_compatible(name: &str, required: Version, candidate: Version) -> Compatibility {
    let verdict = compare(name, required, candidate);
    if let Some(message) = verdict.warning() {
        tracing::warn!(
            component = %name,
            required = %required,
            candidate = %candidate,
            "{}",
            message
        );
    }
    verdict
}
