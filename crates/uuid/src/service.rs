//! Implementation of the facility key type.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

use uuid::Uuid;

/// Stable, non-owning handle to a facility.
///
/// Once constructed, the contained UUID is guaranteed to be valid. Two keys compare equal
/// exactly when they name the same facility, which is how "is this patient currently at this
/// hospital" and "has this patient registered at this clinic" are answered.
///
/// # Construction
/// - [`FacilityKey::new`] generates a fresh key (for a newly constructed facility).
/// - [`FacilityKey::parse`] validates an externally supplied identifier.
///
/// # Display format
/// Always the canonical 32-character lowercase hex form without hyphens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacilityKey(Uuid);

impl Default for FacilityKey {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityKey {
    /// Generates a new random (v4) key.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a key that must already be in canonical form.
    ///
    /// Hyphenated or uppercase UUIDs are **not** normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "facility key must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid facility key '{}': {}", input, e)))
    }

    /// Returns true if `input` is in canonical key form.
    ///
    /// Purely syntactic: 32 bytes, all in `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for FacilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for FacilityKey {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacilityKey::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FacilityKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FacilityKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FacilityKey::parse(&s).map_err(serde::de::Error::custom)
    }
}
