//! Patients of the health service.
//!
//! A patient is a plain data container. Every balance change and every facility relationship is
//! driven by a facility's `visit` or a hospital's `perform_procedure`; the patient itself has no
//! business rules beyond storage.

use crate::ids::DenseId;
use hsm_types::NonEmptyText;
use hsm_uuid::FacilityKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A patient record.
///
/// Facility relationships are stored as [`FacilityKey`] handles rather than references, so a
/// deleted facility simply leaves a stale key behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    id: usize,
    name: NonEmptyText,
    is_private: bool,
    balance: f64,
    #[serde(default)]
    current_facility: Option<FacilityKey>,
    #[serde(default)]
    registered_clinics: BTreeSet<FacilityKey>,
}

impl Patient {
    /// Creates a patient with a zero balance who has not visited anywhere.
    pub fn new(name: NonEmptyText, is_private: bool) -> Self {
        Self {
            id: 0,
            name,
            is_private,
            balance: 0.0,
            current_facility: None,
            registered_clinics: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn set_name(&mut self, name: NonEmptyText) {
        self.name = name;
    }

    /// Private status is fixed at creation.
    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Adds a charge to the balance. Balances only ever grow.
    pub fn add_balance(&mut self, amount: f64) {
        debug_assert!(amount >= 0.0, "charges are never negative");
        self.balance += amount;
    }

    /// Key of the last facility that admitted or registered this patient.
    pub fn current_facility(&self) -> Option<FacilityKey> {
        self.current_facility
    }

    pub fn set_current_facility(&mut self, facility: Option<FacilityKey>) {
        self.current_facility = facility;
    }

    /// Records membership at a clinic. Membership is never revoked.
    pub fn register_at(&mut self, clinic: FacilityKey) {
        self.registered_clinics.insert(clinic);
    }

    pub fn is_registered_at(&self, clinic: FacilityKey) -> bool {
        self.registered_clinics.contains(&clinic)
    }

    pub fn registered_clinics(&self) -> impl Iterator<Item = FacilityKey> + '_ {
        self.registered_clinics.iter().copied()
    }
}

impl DenseId for Patient {
    fn dense_id(&self) -> usize {
        self.id
    }

    fn set_dense_id(&mut self, id: usize) {
        self.id = id;
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Private: {}, Balance: {}",
            self.id, self.name, self.is_private, self.balance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(name: &str, is_private: bool) -> Patient {
        Patient::new(NonEmptyText::new(name).unwrap(), is_private)
    }

    #[test]
    fn test_new_patient_starts_unseen() {
        let p = patient("Jackie", true);

        assert_eq!(p.balance(), 0.0);
        assert!(p.current_facility().is_none());
        assert_eq!(p.registered_clinics().count(), 0);
        assert!(p.is_private());
    }

    #[test]
    fn test_add_balance_accumulates() {
        let mut p = patient("Chan", false);
        p.add_balance(50.0);
        p.add_balance(0.0);
        p.add_balance(12.5);

        assert_eq!(p.balance(), 62.5);
    }

    #[test]
    fn test_registration_is_membership_only() {
        let mut p = patient("Bruce", true);
        let clinic = FacilityKey::new();
        let other = FacilityKey::new();

        p.register_at(clinic);
        p.register_at(clinic);

        assert!(p.is_registered_at(clinic));
        assert!(!p.is_registered_at(other));
        assert_eq!(p.registered_clinics().count(), 1);
        // registering does not move the patient
        assert!(p.current_facility().is_none());
    }

    #[test]
    fn test_display_format() {
        let mut p = patient("A", true);
        p.set_dense_id(1);
        p.add_balance(4000.0);

        assert_eq!(p.to_string(), "ID: 1, Name: A, Private: true, Balance: 4000");
    }
}
