//! # HSM Core
//!
//! Domain model for the health service manager: medical facilities, the patients who visit them,
//! and the procedures hospitals perform.
//!
//! - [`Registry`] owns facilities and patients and keeps their ids dense (`1..=N`)
//! - [`Facility`] is either a [`Hospital`] (stochastic admission, procedure charging) or a
//!   [`Clinic`] (free registration, then billed consultations)
//! - [`snapshot`] saves and restores the whole object graph
//!
//! **No presentation concerns**: argument parsing, output formatting and logging setup belong in
//! `hsm-cli`.

pub mod clinic;
pub mod config;
pub mod constants;
pub mod error;
pub mod facility;
pub mod hospital;
pub mod ids;
pub mod patient;
pub mod procedure;
pub mod registry;
pub mod sample;
pub mod snapshot;
pub mod validation;

pub use clinic::Clinic;
pub use config::CoreConfig;
pub use error::{RegistryError, RegistryResult};
pub use facility::{Facility, Visit, VisitOutcome};
pub use hospital::{procedure_charge, Hospital};
pub use hsm_types::NonEmptyText;
pub use hsm_uuid::FacilityKey;
pub use patient::Patient;
pub use procedure::Procedure;
pub use registry::Registry;
