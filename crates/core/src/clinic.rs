//! Clinics: free registration on the first visit, billed consultations afterwards.

use crate::facility::{FacilityIdentity, Visit};
use crate::patient::Patient;
use hsm_types::NonEmptyText;
use hsm_uuid::FacilityKey;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    #[serde(flatten)]
    pub(crate) identity: FacilityIdentity,
    consultation_fee: f64,
    gap_percent: f64,
}

impl Clinic {
    pub fn new(name: NonEmptyText, consultation_fee: f64, gap_percent: f64) -> Self {
        Self {
            identity: FacilityIdentity::new(name),
            consultation_fee,
            gap_percent,
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

    /// Consultation fee rounded to one decimal place.
    ///
    /// Rounding applies to reads only; consultations are charged on the stored value.
    pub fn consultation_fee(&self) -> f64 {
        let scaled = self.consultation_fee * 10.0;
        if !scaled.is_finite() {
            return self.consultation_fee;
        }
        scaled.round() / 10.0
    }

    /// Fee exactly as stored, without read rounding.
    pub(crate) fn stored_consultation_fee(&self) -> f64 {
        self.consultation_fee
    }

    pub fn set_consultation_fee(&mut self, consultation_fee: f64) {
        self.consultation_fee = consultation_fee;
    }

    /// Extra percentage of the fee charged to private patients.
    pub fn gap_percent(&self) -> f64 {
        self.gap_percent
    }

    pub fn set_gap_percent(&mut self, gap_percent: f64) {
        self.gap_percent = gap_percent;
    }

    /// Amount a repeat visit costs a patient of the given kind.
    pub fn consultation_charge(&self, is_private: bool) -> f64 {
        let mut charge = self.consultation_fee;
        if is_private {
            charge += self.consultation_fee * (self.gap_percent / 100.0);
        }
        charge
    }
}

impl Visit for Clinic {
    /// The first visit registers the patient and moves them here without charge (returns
    /// `true`). Every later visit bills a consultation and returns `false`.
    fn visit<R: Rng + ?Sized>(&self, patient: &mut Patient, _rng: &mut R) -> bool {
        if !patient.is_registered_at(self.key()) {
            patient.register_at(self.key());
            patient.set_current_facility(Some(self.key()));
            tracing::debug!(clinic = %self.identity.name, patient = %patient.name(), "patient registered");
            return true;
        }

        let charge = self.consultation_charge(patient.is_private());
        patient.add_balance(charge);
        tracing::debug!(
            clinic = %self.identity.name,
            patient = %patient.name(),
            charge,
            "consultation charged"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    #[test]
    fn test_first_visit_registers_without_charge() {
        let clinic = Clinic::new(text("General"), 50.0, 10.0);
        let mut patient = Patient::new(text("Jackie"), true);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(clinic.visit(&mut patient, &mut rng));
        assert_eq!(patient.balance(), 0.0);
        assert!(patient.is_registered_at(clinic.key()));
        assert_eq!(patient.current_facility(), Some(clinic.key()));
    }

    #[test]
    fn test_second_visit_charges_public_fee() {
        let clinic = Clinic::new(text("General"), 50.0, 10.0);
        let mut patient = Patient::new(text("Chan"), false);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(clinic.visit(&mut patient, &mut rng));
        assert!(!clinic.visit(&mut patient, &mut rng));
        assert_eq!(patient.balance(), 50.0);
    }

    #[test]
    fn test_second_visit_charges_private_gap() {
        let clinic = Clinic::new(text("Northside"), 65.0, 20.0);
        let mut patient = Patient::new(text("Michelle"), true);
        let mut rng = StdRng::seed_from_u64(0);

        clinic.visit(&mut patient, &mut rng);
        assert!(!clinic.visit(&mut patient, &mut rng));
        assert!((patient.balance() - 78.0).abs() < 1e-9);

        assert!(!clinic.visit(&mut patient, &mut rng));
        assert!((patient.balance() - 156.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeat_visit_does_not_move_patient() {
        let clinic = Clinic::new(text("Uptown"), 55.0, 12.0);
        let elsewhere = FacilityKey::new();
        let mut patient = Patient::new(text("Yen"), false);
        let mut rng = StdRng::seed_from_u64(0);

        clinic.visit(&mut patient, &mut rng);
        patient.set_current_facility(Some(elsewhere));
        clinic.visit(&mut patient, &mut rng);

        assert_eq!(patient.current_facility(), Some(elsewhere));
    }

    #[test]
    fn test_registration_is_per_clinic() {
        let first = Clinic::new(text("Eastside"), 45.0, 8.0);
        let second = Clinic::new(text("Eastside"), 45.0, 8.0);
        let mut patient = Patient::new(text("Donnie"), true);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(first.visit(&mut patient, &mut rng));
        assert!(second.visit(&mut patient, &mut rng));
        assert_eq!(patient.balance(), 0.0);
    }

    #[test]
    fn test_consultation_fee_rounds_on_read() {
        let mut clinic = Clinic::new(text("Downtown"), 60.04, 15.0);
        assert_eq!(clinic.consultation_fee(), 60.0);

        clinic.set_consultation_fee(59.96);
        assert_eq!(clinic.consultation_fee(), 60.0);
        assert_eq!(clinic.consultation_charge(false), 59.96);

        clinic.set_gap_percent(0.0);
        assert_eq!(clinic.consultation_charge(true), 59.96);
    }

    #[test]
    fn test_consultation_fee_rounding_does_not_overflow() {
        let clinic = Clinic::new(text("Huge"), f64::MAX, 0.0);
        assert_eq!(clinic.consultation_fee(), f64::MAX);
    }
}
