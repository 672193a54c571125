//! Hospitals: stochastic admission and procedure charging.

use crate::constants::{PRIVATE_ELECTIVE_FEE, PRIVATE_NON_ELECTIVE_FEE};
use crate::facility::{FacilityIdentity, Visit};
use crate::ids;
use crate::patient::Patient;
use crate::procedure::Procedure;
use hsm_types::NonEmptyText;
use hsm_uuid::FacilityKey;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A hospital and the procedures it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    #[serde(flatten)]
    pub(crate) identity: FacilityIdentity,
    admission_probability: f64,
    #[serde(default)]
    procedures: Vec<Procedure>,
}

impl Hospital {
    /// Creates a hospital with no procedures.
    ///
    /// `admission_probability` is expected in `[0, 1]`; see
    /// [`crate::validation::admission_probability`].
    pub fn new(name: NonEmptyText, admission_probability: f64) -> Self {
        Self {
            identity: FacilityIdentity::new(name),
            admission_probability,
            procedures: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.identity.id
    }

    pub fn key(&self) -> FacilityKey {
        self.identity.key
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.identity.name
    }

    pub fn admission_probability(&self) -> f64 {
        self.admission_probability
    }

    pub fn set_admission_probability(&mut self, admission_probability: f64) {
        self.admission_probability = admission_probability;
    }

    // ------------------------------------------------------------------
    // Procedures
    // ------------------------------------------------------------------

    /// Procedures in insertion order.
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// Appends a procedure and renumbers this hospital's procedures.
    ///
    /// # Returns
    ///
    /// The dense id the procedure received.
    pub fn add_procedure(&mut self, procedure: Procedure) -> usize {
        let id = ids::push_and_reassign(&mut self.procedures, procedure);
        tracing::debug!(hospital = %self.identity.name, procedure_id = id, "procedure added");
        id
    }

    /// Removes the procedure with the given id and renumbers.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn remove_procedure(&mut self, id: usize) -> Option<Procedure> {
        let removed = ids::remove_and_reassign(&mut self.procedures, id);
        if removed.is_some() {
            tracing::debug!(hospital = %self.identity.name, procedure_id = id, "procedure removed");
        }
        removed
    }

    pub fn procedure(&self, id: usize) -> Option<&Procedure> {
        ids::find_by_id(&self.procedures, id)
    }

    pub fn procedure_mut(&mut self, id: usize) -> Option<&mut Procedure> {
        ids::find_by_id_mut(&mut self.procedures, id)
    }

    /// First procedure with the given name, in list order.
    pub fn find_procedure_by_name(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name().as_str() == name)
    }

    pub(crate) fn reassign_procedure_ids(&mut self) {
        ids::reassign_ids(&mut self.procedures);
    }

    // ------------------------------------------------------------------
    // Charging
    // ------------------------------------------------------------------

    /// Performs `procedure` on `patient`, charging their balance.
    ///
    /// Fails without side effects unless the patient is currently at this hospital.
    ///
    /// # Returns
    ///
    /// `true` if the procedure was performed and charged.
    pub fn perform_procedure(&self, patient: &mut Patient, procedure: &Procedure) -> bool {
        if patient.current_facility() != Some(self.key()) {
            tracing::debug!(
                hospital = %self.identity.name,
                patient = %patient.name(),
                "procedure refused: patient is not at this hospital"
            );
            return false;
        }

        let charge = procedure_charge(patient.is_private(), procedure);
        patient.add_balance(charge);
        tracing::debug!(
            hospital = %self.identity.name,
            patient = %patient.name(),
            procedure = %procedure.name(),
            charge,
            "procedure performed"
        );
        true
    }
}

/// Amount charged for a procedure.
///
/// Private patients pay a flat fee that ignores the listed cost (4000 elective, 2500
/// non-elective). Public patients pay the listed cost for elective procedures and nothing for
/// non-elective ones.
pub fn procedure_charge(is_private: bool, procedure: &Procedure) -> f64 {
    match (is_private, procedure.is_elective()) {
        (true, true) => PRIVATE_ELECTIVE_FEE,
        (true, false) => PRIVATE_NON_ELECTIVE_FEE,
        (false, true) => procedure.cost(),
        (false, false) => 0.0,
    }
}

impl Visit for Hospital {
    /// Draws uniformly from `[0, 1)` and admits the patient iff the draw is at most the admission
    /// probability. Admission moves the patient here; a refusal has no side effects.
    fn visit<R: Rng + ?Sized>(&self, patient: &mut Patient, rng: &mut R) -> bool {
        let draw: f64 = rng.gen();
        // a zero probability must never admit, even on a draw of exactly 0.0
        let admitted = self.admission_probability > 0.0 && draw <= self.admission_probability;

        if admitted {
            patient.set_current_facility(Some(self.key()));
        }
        tracing::debug!(
            hospital = %self.identity.name,
            patient = %patient.name(),
            admitted,
            "hospital visit"
        );
        admitted
    }
}
