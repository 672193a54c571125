use hsm_uuid::FacilityKey;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid text: {0}")]
    Text(#[from] hsm_types::TextError),

    #[error("failed to serialize snapshot: {0}")]
    SnapshotEncode(serde_json::Error),
    #[error("failed to decode snapshot: {0}")]
    SnapshotDecode(serde_json::Error),
    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },
    #[error("cannot snapshot non-finite {field} on {owner}")]
    NonFiniteValue { field: &'static str, owner: String },
    #[error("snapshot contains duplicate facility key {0}")]
    DuplicateFacilityKey(FacilityKey),

    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read snapshot file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write snapshot file: {0}")]
    FileWrite(std::io::Error),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
