//! Identifier wrappers for FormFlow.
//!
//! The submission key is the correlation value shared by every flattened
//! answer row of one logical submission. It is UUIDv7-backed: globally
//! unique (even for submissions landing in the same millisecond) and
//! time-ordered, so sorting keys descending yields newest-first.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Error returned when parsing a submission key fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError {
    message: String,
}

impl KeyParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for KeyParseError {}

/// Correlation key identifying one logical submission.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionKey(String);

impl SubmissionKey {
    /// Generate a fresh key. UUIDv7, never derived from wall-clock millis alone.
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn parse(value: &str) -> Result<Self, KeyParseError> {
        Uuid::parse_str(value)
            .map_err(|e| KeyParseError::new(format!("Invalid submission key: {}", e)))?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for SubmissionKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubmissionKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
