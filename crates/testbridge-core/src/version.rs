//! Four-part engine versions and runtime tags
//!
//! Engine products are versioned `major.minor.build.revision` and compared
//! ordinally part by part. Runtime compatibility is expressed with tags such
//! as `v2.0.50727`, which compare by the version after the leading `v`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// A `major.minor[.build[.revision]]` version
///
/// Missing trailing parts compare as zero but are remembered so the version
/// prints the way it was written.
#[derive(Debug, Clone, Copy)]
pub struct EngineVersion {
    parts: [u32; 4],
    len: u8,
}

impl EngineVersion {
    /// Create a full four-part version
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            parts: [major, minor, build, revision],
            len: 4,
        }
    }

    /// Parse a version with two to four dot-separated parts
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let pieces: Vec<&str> = trimmed.split('.').collect();
        if pieces.len() < 2 || pieces.len() > 4 {
            return Err(VersionError::ParseFailed(
                input.to_string(),
                "expected 2 to 4 dot-separated parts".to_string(),
            ));
        }

        let mut parts = [0u32; 4];
        for (i, piece) in pieces.iter().enumerate() {
            parts[i] = piece.parse::<u32>().map_err(|e| {
                VersionError::ParseFailed(input.to_string(), format!("part {}: {}", i + 1, e))
            })?;
        }

        Ok(Self {
            parts,
            len: pieces.len() as u8,
        })
    }

    pub fn major(&self) -> u32 {
        self.parts[0]
    }

    pub fn minor(&self) -> u32 {
        self.parts[1]
    }

    pub fn build(&self) -> u32 {
        self.parts[2]
    }

    pub fn revision(&self) -> u32 {
        self.parts[3]
    }

    /// `major.minor.build`, the form used in runner labels
    pub fn short(&self) -> String {
        format!("{}.{}.{}", self.major(), self.minor(), self.build())
    }
}

impl PartialEq for EngineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for EngineVersion {}

impl std::hash::Hash for EngineVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<String> = self.parts[..self.len as usize]
            .iter()
            .map(|p| p.to_string())
            .collect();
        f.write_str(&shown.join("."))
    }
}

impl FromStr for EngineVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EngineVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EngineVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A platform runtime tag such as `v2.0.50727`
#[derive(Debug, Clone)]
pub struct RuntimeVersion {
    tag: String,
    version: EngineVersion,
}

impl RuntimeVersion {
    /// Parse a `v`-prefixed runtime tag
    pub fn parse(tag: &str) -> Result<Self, VersionError> {
        let trimmed = tag.trim();
        let body = trimmed
            .strip_prefix('v')
            .ok_or_else(|| VersionError::InvalidRuntimeTag(tag.to_string()))?;
        let version =
            EngineVersion::parse(body).map_err(|_| VersionError::InvalidRuntimeTag(tag.to_string()))?;

        Ok(Self {
            tag: trimmed.to_string(),
            version,
        })
    }

    /// The tag as written, e.g. `v2.0.50727`
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn version(&self) -> EngineVersion {
        self.version
    }

    /// Whether an engine built for `self` can run on the `host` runtime
    pub fn runs_on(&self, host: &RuntimeVersion) -> bool {
        self.version <= host.version
    }
}

impl PartialEq for RuntimeVersion {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for RuntimeVersion {}

impl PartialOrd for RuntimeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RuntimeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for RuntimeVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RuntimeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag)
    }
}

impl<'de> Deserialize<'de> for RuntimeVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
