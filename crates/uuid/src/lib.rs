//! Stable identity handles for facilities.
//!
//! Facilities carry a dense display id that is recomputed after every insertion or deletion, so
//! it cannot be used to refer to a facility over time. Patients instead hold a [`FacilityKey`]:
//! a UUID allocated once when the facility is constructed and never changed afterwards.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`. Keys read
//! back from a snapshot must already be canonical; anything else is rejected.

mod service;

pub use service::FacilityKey;

/// Error type for key operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for key operations.
pub type UuidResult<T> = Result<T, UuidError>;
