//! Constants used throughout the health service core crate.

/// Default snapshot file used when no explicit data file is configured.
pub const DEFAULT_DATA_FILE: &str = "health_service.json";

/// Environment variable naming the snapshot file.
pub const DATA_FILE_ENV: &str = "HSM_DATA_FILE";

/// Format version written into every snapshot envelope.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Flat charge to a private patient for an elective procedure.
pub const PRIVATE_ELECTIVE_FEE: f64 = 4000.0;

/// Flat charge to a private patient for a non-elective procedure.
pub const PRIVATE_NON_ELECTIVE_FEE: f64 = 2500.0;

/// Largest fee or procedure cost accepted from user input.
pub const MAX_AMOUNT: f64 = 1.0e12;

/// Largest gap percentage accepted from user input.
pub const MAX_PERCENTAGE: f64 = 1.0e6;
