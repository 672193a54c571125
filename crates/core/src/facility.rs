//! Facilities a patient can visit.
//!
//! [`Facility`] is a closed sum over the two facility kinds. Each variant carries its own policy
//! data and implements the shared [`Visit`] contract; the enum simply dispatches.

use crate::clinic::Clinic;
use crate::hospital::Hospital;
use crate::ids::DenseId;
use crate::patient::Patient;
use hsm_types::NonEmptyText;
use hsm_uuid::FacilityKey;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields every facility kind shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct FacilityIdentity {
    pub(crate) id: usize,
    pub(crate) key: FacilityKey,
    pub(crate) name: NonEmptyText,
}

impl FacilityIdentity {
    pub(crate) fn new(name: NonEmptyText) -> Self {
        Self {
            id: 0,
            key: FacilityKey::new(),
            name,
        }
    }
}

/// The "receive a visit from a patient" capability.
///
/// The meaning of the returned flag depends on the facility: a hospital reports whether the
/// patient was admitted, a clinic whether this was the patient's first (registration) visit.
/// Randomness is injected so callers can make admission deterministic.
pub trait Visit {
    fn visit<R: Rng + ?Sized>(&self, patient: &mut Patient, rng: &mut R) -> bool;
}

/// What happened when a patient visited a facility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisitOutcome {
    /// Hospital admitted the patient.
    Admitted,
    /// Hospital turned the patient away.
    NotAdmitted,
    /// First visit to a clinic; the patient was registered free of charge.
    Registered,
    /// Repeat visit to a clinic; a consultation was charged.
    Consulted { charge: f64 },
}

impl VisitOutcome {
    /// The boolean result of [`Visit::visit`] this outcome corresponds to.
    pub fn as_bool(&self) -> bool {
        matches!(self, VisitOutcome::Admitted | VisitOutcome::Registered)
    }
}

/// A hospital or a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Facility {
    Hospital(Hospital),
    Clinic(Clinic),
}

impl Facility {
    fn identity(&self) -> &FacilityIdentity {
        match self {
            Facility::Hospital(h) => &h.identity,
            Facility::Clinic(c) => &c.identity,
        }
    }

    fn identity_mut(&mut self) -> &mut FacilityIdentity {
        match self {
            Facility::Hospital(h) => &mut h.identity,
            Facility::Clinic(c) => &mut c.identity,
        }
    }

    pub fn id(&self) -> usize {
        self.identity().id
    }

    pub fn key(&self) -> FacilityKey {
        self.identity().key
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.identity().name
    }

    pub fn set_name(&mut self, name: NonEmptyText) {
        self.identity_mut().name = name;
    }

    /// Human-readable kind, as shown in listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Facility::Hospital(_) => "Hospital",
            Facility::Clinic(_) => "Clinic",
        }
    }

    pub fn as_hospital(&self) -> Option<&Hospital> {
        match self {
            Facility::Hospital(h) => Some(h),
            Facility::Clinic(_) => None,
        }
    }

    pub fn as_hospital_mut(&mut self) -> Option<&mut Hospital> {
        match self {
            Facility::Hospital(h) => Some(h),
            Facility::Clinic(_) => None,
        }
    }

    pub fn as_clinic(&self) -> Option<&Clinic> {
        match self {
            Facility::Clinic(c) => Some(c),
            Facility::Hospital(_) => None,
        }
    }

    pub fn as_clinic_mut(&mut self) -> Option<&mut Clinic> {
        match self {
            Facility::Clinic(c) => Some(c),
            Facility::Hospital(_) => None,
        }
    }

    /// Dispatches a visit to the underlying facility and describes what happened.
    pub fn visit_outcome<R: Rng + ?Sized>(
        &self,
        patient: &mut Patient,
        rng: &mut R,
    ) -> VisitOutcome {
        match self {
            Facility::Hospital(hospital) => {
                if hospital.visit(patient, rng) {
                    VisitOutcome::Admitted
                } else {
                    VisitOutcome::NotAdmitted
                }
            }
            Facility::Clinic(clinic) => {
                let charge = clinic.consultation_charge(patient.is_private());
                if clinic.visit(patient, rng) {
                    VisitOutcome::Registered
                } else {
                    VisitOutcome::Consulted { charge }
                }
            }
        }
    }
}

impl Visit for Facility {
    fn visit<R: Rng + ?Sized>(&self, patient: &mut Patient, rng: &mut R) -> bool {
        self.visit_outcome(patient, rng).as_bool()
    }
}

impl DenseId for Facility {
    fn dense_id(&self) -> usize {
        self.id()
    }

    fn set_dense_id(&mut self, id: usize) {
        self.identity_mut().id = id;
    }
}

impl From<Hospital> for Facility {
    fn from(hospital: Hospital) -> Self {
        Facility::Hospital(hospital)
    }
}

impl From<Clinic> for Facility {
    fn from(clinic: Clinic) -> Self {
        Facility::Clinic(clinic)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Type: {}",
            self.id(),
            self.name(),
            self.kind_name()
        )
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
    fn test_kind_and_accessors() {
        let mut hospital: Facility = Hospital::new(text("City"), 0.6).into();
        let clinic: Facility = Clinic::new(text("General"), 50.0, 10.0).into();

        assert_eq!(hospital.kind_name(), "Hospital");
        assert_eq!(clinic.kind_name(), "Clinic");
        assert!(hospital.as_hospital().is_some());
        assert!(hospital.as_clinic().is_none());
        assert!(clinic.as_clinic().is_some());
        assert_ne!(hospital.key(), clinic.key());

        hospital.set_name(text("City General"));
        assert_eq!(hospital.name(), "City General");
    }

    #[test]
    fn test_visit_outcome_for_hospital() {
        let mut rng = StdRng::seed_from_u64(11);
        let always: Facility = Hospital::new(text("Always"), 1.0).into();
        let never: Facility = Hospital::new(text("Never"), 0.0).into();
        let mut patient = Patient::new(text("A"), false);

        assert_eq!(
            never.visit_outcome(&mut patient, &mut rng),
            VisitOutcome::NotAdmitted
        );
        assert_eq!(
            always.visit_outcome(&mut patient, &mut rng),
            VisitOutcome::Admitted
        );
        assert_eq!(patient.current_facility(), Some(always.key()));
    }

    #[test]
    fn test_visit_outcome_for_clinic_reports_charge() {
        let mut rng = StdRng::seed_from_u64(3);
        let clinic: Facility = Clinic::new(text("Downtown"), 60.0, 15.0).into();
        let mut patient = Patient::new(text("Jet"), true);

        assert_eq!(
            clinic.visit_outcome(&mut patient, &mut rng),
            VisitOutcome::Registered
        );
        match clinic.visit_outcome(&mut patient, &mut rng) {
            VisitOutcome::Consulted { charge } => assert!((charge - 69.0).abs() < 1e-9),
            other => panic!("Expected consultation, got {:?}", other),
        }
        assert!((patient.balance() - 69.0).abs() < 1e-9);
    }

    #[test]
    fn test_visit_trait_matches_outcome_flag() {
        let mut rng = StdRng::seed_from_u64(5);
        let clinic: Facility = Clinic::new(text("Eastside"), 45.0, 8.0).into();
        let mut patient = Patient::new(text("Li"), false);

        assert!(Visit::visit(&clinic, &mut patient, &mut rng));
        assert!(!Visit::visit(&clinic, &mut patient, &mut rng));
        assert!(VisitOutcome::Admitted.as_bool());
        assert!(!VisitOutcome::Consulted { charge: 1.0 }.as_bool());
    }

    #[test]
    fn test_display_format() {
        let mut facility: Facility = Hospital::new(text("City"), 1.0).into();
        facility.set_dense_id(2);

        assert_eq!(facility.to_string(), "ID: 2, Name: City, Type: Hospital");
    }
}
