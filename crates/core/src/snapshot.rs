//! Whole-registry snapshots.
//!
//! A snapshot captures every facility (with nested procedures) and every patient (with balance,
//! current facility and clinic registrations). Cross-references are stored as facility keys, so
//! after a restore a patient's `current_facility` resolves to the very facility in the restored
//! registry's list that it pointed at before.
//!
//! The blob is a versioned JSON envelope. Its layout is not a public contract; only
//! `restore(snapshot(x)) == x` is.

use crate::constants::SNAPSHOT_FORMAT_VERSION;
use crate::error::{RegistryError, RegistryResult};
use crate::facility::Facility;
use crate::registry::Registry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SnapshotOut<'a> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    registry: &'a Registry,
}

#[derive(Deserialize)]
struct SnapshotIn {
    format_version: u32,
    saved_at: DateTime<Utc>,
    registry: Registry,
}

/// Serialises `registry` into a snapshot blob.
///
/// # Errors
///
/// Returns `RegistryError::NonFiniteValue` if any balance, fee, gap, cost or admission probability
/// is infinite or NaN. JSON has no representation for those, so nothing is encoded.
pub fn encode(registry: &Registry) -> RegistryResult<Vec<u8>> {
    ensure_finite(registry)?;

    let envelope = SnapshotOut {
        format_version: SNAPSHOT_FORMAT_VERSION,
        saved_at: Utc::now(),
        registry,
    };
    serde_json::to_vec_pretty(&envelope).map_err(RegistryError::SnapshotEncode)
}

fn check_finite(value: f64, field: &'static str, owner: &dyn std::fmt::Display) -> RegistryResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    tracing::warn!("refusing to snapshot {} = {} on {}", field, value, owner);
    Err(RegistryError::NonFiniteValue {
        field,
        owner: owner.to_string(),
    })
}

fn ensure_finite(registry: &Registry) -> RegistryResult<()> {
    for facility in registry.facilities() {
        match facility {
            Facility::Hospital(hospital) => {
                check_finite(
                    hospital.admission_probability(),
                    "admission probability",
                    hospital.name(),
                )?;
                for procedure in hospital.procedures() {
                    check_finite(procedure.cost(), "procedure cost", procedure.name())?;
                }
            }
            Facility::Clinic(clinic) => {
                check_finite(
                    clinic.stored_consultation_fee(),
                    "consultation fee",
                    clinic.name(),
                )?;
                check_finite(clinic.gap_percent(), "gap percentage", clinic.name())?;
            }
        }
    }
    for patient in registry.patients() {
        check_finite(patient.balance(), "balance", patient.name())?;
    }
    Ok(())
}

/// Restores a registry from a snapshot blob.
///
/// # Errors
///
/// Returns a `RegistryError` if:
/// - the blob is not a readable snapshot (`SnapshotDecode`),
/// - it was written by an unknown format version (`UnsupportedSnapshotVersion`),
/// - two facilities share a key (`DuplicateFacilityKey`).
pub fn decode(blob: &[u8]) -> RegistryResult<Registry> {
    decode_envelope(blob).map(|(registry, _)| registry)
}

fn decode_envelope(blob: &[u8]) -> RegistryResult<(Registry, DateTime<Utc>)> {
    let envelope: SnapshotIn = serde_json::from_slice(blob).map_err(|e| {
        tracing::warn!("rejected snapshot: {}", e);
        RegistryError::SnapshotDecode(e)
    })?;

    if envelope.format_version != SNAPSHOT_FORMAT_VERSION {
        tracing::warn!(
            "rejected snapshot with format version {}",
            envelope.format_version
        );
        return Err(RegistryError::UnsupportedSnapshotVersion {
            found: envelope.format_version,
            expected: SNAPSHOT_FORMAT_VERSION,
        });
    }

    let mut registry = envelope.registry;
    let mut seen = HashSet::new();
    for facility in registry.facilities() {
        if !seen.insert(facility.key()) {
            tracing::warn!("rejected snapshot with duplicate facility key {}", facility.key());
            return Err(RegistryError::DuplicateFacilityKey(facility.key()));
        }
    }
    registry.reassign_all_ids();

    Ok((registry, envelope.saved_at))
}

/// Writes a snapshot of `registry` to `path`.
///
/// The blob is written to a sibling temporary file first and then renamed over `path`, so an
/// interrupted save never leaves a truncated snapshot behind. Missing parent directories are
/// created.
pub fn save_to_path(registry: &Registry, path: &Path) -> RegistryResult<()> {
    let blob = encode(registry)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(RegistryError::DataDirCreation)?;
    }

    let tmp = temporary_path(path);
    fs::write(&tmp, &blob).map_err(RegistryError::FileWrite)?;
    fs::rename(&tmp, path).map_err(RegistryError::FileWrite)?;

    tracing::info!(
        "saved {} facilities and {} patients to {}",
        registry.facilities().len(),
        registry.patients().len(),
        path.display()
    );
    Ok(())
}

/// Reads a snapshot from `path`.
pub fn load_from_path(path: &Path) -> RegistryResult<Registry> {
    let blob = fs::read(path).map_err(RegistryError::FileRead)?;
    let (registry, saved_at) = decode_envelope(&blob)?;

    tracing::info!(
        "loaded {} facilities and {} patients from {} (saved {})",
        registry.facilities().len(),
        registry.patients().len(),
        path.display(),
        saved_at.to_rfc3339()
    );
    Ok(registry)
}

/// Like [`load_from_path`], but a missing file yields an empty registry.
pub fn load_or_default(path: &Path) -> RegistryResult<Registry> {
    match load_from_path(path) {
        Err(RegistryError::FileRead(e)) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("no snapshot at {}, starting empty", path.display());
            Ok(Registry::new())
        }
        other => other,
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
