//! The health service registry.
//!
//! The [`Registry`] owns the canonical, ordered collections of facilities and patients and is the
//! only writer of their dense ids. Front ends read the live lists through [`Registry::facilities`]
//! and [`Registry::patients`] and change their structure only through the add/remove operations,
//! which renumber `1..=N` after every change.
//!
//! Operations that address an unknown id are silent no-ops and report this with `None`.

use crate::clinic::Clinic;
use crate::error::RegistryResult;
use crate::facility::{Facility, VisitOutcome};
use crate::hospital::Hospital;
use crate::ids;
use crate::patient::Patient;
use hsm_uuid::FacilityKey;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    facilities: Vec<Facility>,
    #[serde(default)]
    patients: Vec<Patient>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // FACILITIES
    // ========================================================================

    /// Facilities in display order.
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Appends a facility and renumbers every facility id.
    ///
    /// Identical names are permitted.
    ///
    /// # Returns
    ///
    /// The dense id the facility received.
    pub fn add_facility(&mut self, facility: impl Into<Facility>) -> usize {
        let facility = facility.into();
        let kind = facility.kind_name();
        let id = ids::push_and_reassign(&mut self.facilities, facility);
        tracing::debug!(facility_id = id, kind, "facility added");
        id
    }

    /// Removes the facility with the given id and renumbers the rest.
    ///
    /// Patients referring to the removed facility keep their (now stale) keys.
    pub fn remove_facility(&mut self, id: usize) -> Option<Facility> {
        let removed = ids::remove_and_reassign(&mut self.facilities, id);
        if let Some(facility) = &removed {
            tracing::debug!(facility_id = id, name = %facility.name(), "facility removed");
        }
        removed
    }

    pub fn facility(&self, id: usize) -> Option<&Facility> {
        ids::find_by_id(&self.facilities, id)
    }

    pub fn facility_mut(&mut self, id: usize) -> Option<&mut Facility> {
        ids::find_by_id_mut(&mut self.facilities, id)
    }

    /// Resolves a key held by a patient. Stale keys resolve to `None`.
    pub fn facility_by_key(&self, key: FacilityKey) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.key() == key)
    }

    /// First facility with the given name, in list order.
    pub fn find_facility_by_name(&self, name: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.name().as_str() == name)
    }

    pub fn hospital(&self, id: usize) -> Option<&Hospital> {
        self.facility(id).and_then(Facility::as_hospital)
    }

    pub fn hospital_mut(&mut self, id: usize) -> Option<&mut Hospital> {
        self.facility_mut(id).and_then(Facility::as_hospital_mut)
    }

    pub fn hospitals(&self) -> impl Iterator<Item = &Hospital> + '_ {
        self.facilities.iter().filter_map(Facility::as_hospital)
    }

    pub fn clinics(&self) -> impl Iterator<Item = &Clinic> + '_ {
        self.facilities.iter().filter_map(Facility::as_clinic)
    }

    // ========================================================================
    // PATIENTS
    // ========================================================================

    /// Patients in display order.
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Appends a patient and renumbers every patient id.
    pub fn add_patient(&mut self, patient: Patient) -> usize {
        let id = ids::push_and_reassign(&mut self.patients, patient);
        tracing::debug!(patient_id = id, "patient added");
        id
    }

    /// Removes the patient with the given id and renumbers the rest.
    pub fn remove_patient(&mut self, id: usize) -> Option<Patient> {
        let removed = ids::remove_and_reassign(&mut self.patients, id);
        if let Some(patient) = &removed {
            tracing::debug!(patient_id = id, name = %patient.name(), "patient removed");
        }
        removed
    }

    pub fn patient(&self, id: usize) -> Option<&Patient> {
        ids::find_by_id(&self.patients, id)
    }

    pub fn patient_mut(&mut self, id: usize) -> Option<&mut Patient> {
        ids::find_by_id_mut(&mut self.patients, id)
    }

    /// First patient with the given name, in list order.
    pub fn find_patient_by_name(&self, name: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.name().as_str() == name)
    }

    // ========================================================================
    // INTERACTIONS
    // ========================================================================

    /// Sends a patient to a facility.
    ///
    /// # Returns
    ///
    /// `None` if either id is unknown, otherwise what happened during the visit.
    pub fn visit<R: Rng + ?Sized>(
        &mut self,
        patient_id: usize,
        facility_id: usize,
        rng: &mut R,
    ) -> Option<VisitOutcome> {
        let facility = ids::find_by_id(&self.facilities, facility_id)?;
        let patient = ids::find_by_id_mut(&mut self.patients, patient_id)?;
        Some(facility.visit_outcome(patient, rng))
    }

    /// Has a hospital perform one of its procedures on a patient.
    ///
    /// # Returns
    ///
    /// `None` if the patient, the hospital, or the procedure within that hospital is unknown.
    /// Otherwise the result of [`Hospital::perform_procedure`].
    pub fn perform_procedure(
        &mut self,
        patient_id: usize,
        hospital_id: usize,
        procedure_id: usize,
    ) -> Option<bool> {
        let hospital = ids::find_by_id(&self.facilities, hospital_id)?.as_hospital()?;
        let procedure = hospital.procedure(procedure_id)?;
        let patient = ids::find_by_id_mut(&mut self.patients, patient_id)?;
        Some(hospital.perform_procedure(patient, procedure))
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Captures the whole object graph as an opaque blob.
    pub fn snapshot(&self) -> RegistryResult<Vec<u8>> {
        crate::snapshot::encode(self)
    }

    /// Rebuilds a registry from a blob produced by [`Registry::snapshot`].
    pub fn restore(blob: &[u8]) -> RegistryResult<Self> {
        crate::snapshot::decode(blob)
    }

    /// Replaces this registry with the one stored in `blob`.
    ///
    /// On failure `self` is left exactly as it was.
    pub fn restore_in_place(&mut self, blob: &[u8]) -> RegistryResult<()> {
        *self = Self::restore(blob)?;
        Ok(())
    }

    /// Recomputes every dense id. Used after deserialisation.
    pub(crate) fn reassign_all_ids(&mut self) {
        ids::reassign_ids(&mut self.facilities);
        ids::reassign_ids(&mut self.patients);
        for facility in &mut self.facilities {
            if let Some(hospital) = facility.as_hospital_mut() {
                hospital.reassign_procedure_ids();
            }
        }
    }
}
