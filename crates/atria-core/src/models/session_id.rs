use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Human-enterable session identifier in the fixed format `AAA-BBB-NNN`:
/// three uppercase letters (clinician code), three uppercase letters or
/// digits (subject code), three digits in [100, 999]. Immutable once
/// assigned; the sole primary key for persistence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct SessionId(String);

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}

/// The three segments of a parsed [`SessionId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionIdParts {
    pub clinician_code: String,
    pub subject_code: String,
    pub number: u16,
}

impl SessionId {
    /// Parse a candidate identifier. Case-normalizes a copy of the input
    /// (the caller's string is untouched) and stores the normalized form.
    pub fn parse(candidate: &str) -> Result<Self, CoreError> {
        let normalized = candidate.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();

        let well_formed = bytes.len() == 11
            && bytes[3] == b'-'
            && bytes[7] == b'-'
            && bytes[..3].iter().all(u8::is_ascii_uppercase)
            && bytes[4..7]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            && bytes[8..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(CoreError::InvalidSessionId(candidate.to_string()));
        }

        // Three digits can still encode values below the floor (e.g. "012").
        let number: u16 = normalized[8..]
            .parse()
            .map_err(|_| CoreError::InvalidSessionId(candidate.to_string()))?;
        if number < 100 {
            return Err(CoreError::InvalidSessionId(candidate.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn is_valid(candidate: &str) -> bool {
        Self::parse(candidate).is_ok()
    }

    /// Assemble an identifier from already-derived segments. Callers are
    /// expected to supply codes matching the grammar and a number in
    /// [100, 999].
    pub fn from_parts(clinician_code: &str, subject_code: &str, number: u16) -> Self {
        Self(format!("{clinician_code}-{subject_code}-{number}"))
    }

    pub fn parts(&self) -> SessionIdParts {
        SessionIdParts {
            clinician_code: self.0[..3].to_string(),
            subject_code: self.0[4..7].to_string(),
            number: self.0[8..].parse().unwrap_or(0),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
