//! Demonstration data set.
//!
//! Five hospitals with their procedure lists, five clinics interleaved between them, and ten
//! patients alternating private and public.

use crate::clinic::Clinic;
use crate::hospital::Hospital;
use crate::patient::Patient;
use crate::procedure::Procedure;
use crate::registry::Registry;
use crate::RegistryResult;
use hsm_types::NonEmptyText;

/// (name, description, elective, cost)
type ProcedureRow = (&'static str, &'static str, bool, f64);

const MAIN_PROCEDURES: &[ProcedureRow] = &[
    ("Knee Replacement", "Surgical replacement of the knee joint", true, 1500.0),
    ("Appendectomy", "Surgical removal of the appendix", false, 850.0),
    ("Hip Replacement", "Surgical replacement of the hip joint", true, 2000.0),
    ("Cataract Surgery", "Removal of cataract from the eye", true, 1200.0),
    ("Heart Bypass", "Surgical bypass of blocked heart arteries", false, 2000.0),
    ("Tonsillectomy", "Removal of tonsils", true, 600.0),
    ("Gallbladder Removal", "Surgical removal of the gallbladder", false, 1000.0),
    ("Hernia Repair", "Surgical repair of hernia", true, 800.0),
    ("Colonoscopy", "Examination of the colon", false, 400.0),
    ("Mammogram", "Breast cancer screening", true, 300.0),
];

const CITY_PROCEDURES: &[ProcedureRow] = &[
    ("Cardiac Checkup", "Comprehensive heart examination", false, 1200.0),
    ("Liver Transplant", "Surgical replacement of the liver", false, 2000.0),
    ("Dialysis", "Kidney dialysis treatment", false, 500.0),
];

const SUBURBAN_PROCEDURES: &[ProcedureRow] = &[
    ("Dental Cleaning", "Routine dental cleaning", true, 100.0),
    ("Root Canal", "Dental root canal treatment", true, 800.0),
    ("Braces Installation", "Orthodontic braces installation", true, 1700.0),
];

const RURAL_PROCEDURES: &[ProcedureRow] = &[
    ("Vaccination", "Routine vaccination", true, 50.0),
    ("Fracture Treatment", "Treatment for bone fractures", false, 700.0),
    ("Childbirth", "Assistance in childbirth", false, 2000.0),
];

const WESTSIDE_PROCEDURES: &[ProcedureRow] = &[
    ("Eye Exam", "Comprehensive eye examination", true, 150.0),
    ("Glaucoma Surgery", "Surgical treatment for glaucoma", false, 2000.0),
    ("Lasik Surgery", "Laser eye surgery", true, 2000.0),
];

enum Row {
    Hospital(&'static str, f64, &'static [ProcedureRow]),
    Clinic(&'static str, f64, f64),
}

const FACILITIES: &[Row] = &[
    Row::Hospital("Main Hospital", 0.5, MAIN_PROCEDURES),
    Row::Clinic("General Clinic", 50.0, 10.0),
    Row::Hospital("City Hospital", 0.6, CITY_PROCEDURES),
    Row::Clinic("Downtown Clinic", 60.0, 15.0),
    Row::Hospital("Suburban Hospital", 0.4, SUBURBAN_PROCEDURES),
    Row::Clinic("Uptown Clinic", 55.0, 12.0),
    Row::Hospital("Rural Hospital", 0.7, RURAL_PROCEDURES),
    Row::Clinic("Eastside Clinic", 45.0, 8.0),
    Row::Hospital("Westside Hospital", 0.3, WESTSIDE_PROCEDURES),
    Row::Clinic("Northside Clinic", 65.0, 20.0),
];

const PATIENTS: &[(&str, bool)] = &[
    ("Jackie", true),
    ("Chan", false),
    ("Bruce", true),
    ("Lee", false),
    ("Jet", true),
    ("Li", false),
    ("Donnie", true),
    ("Yen", false),
    ("Michelle", true),
    ("Yeoh", false),
];

/// Builds the demonstration registry.
pub fn sample_registry() -> RegistryResult<Registry> {
    let mut registry = Registry::new();

    for row in FACILITIES {
        match row {
            Row::Hospital(name, admission_probability, procedures) => {
                let mut hospital = Hospital::new(NonEmptyText::new(name)?, *admission_probability);
                for (name, description, is_elective, cost) in procedures.iter() {
                    hospital.add_procedure(Procedure::new(
                        NonEmptyText::new(name)?,
                        NonEmptyText::new(description)?,
                        *is_elective,
                        *cost,
                    ));
                }
                registry.add_facility(hospital);
            }
            Row::Clinic(name, fee, gap_percent) => {
                registry.add_facility(Clinic::new(NonEmptyText::new(name)?, *fee, *gap_percent));
            }
        }
    }

    for (name, is_private) in PATIENTS {
        registry.add_patient(Patient::new(NonEmptyText::new(name)?, *is_private));
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;

    #[test]
    fn test_sample_counts() {
        let registry = sample_registry().unwrap();

        assert_eq!(registry.facilities().len(), 10);
        assert_eq!(registry.hospitals().count(), 5);
        assert_eq!(registry.clinics().count(), 5);
        assert_eq!(registry.patients().len(), 10);
    }

    #[test]
    fn test_sample_order_and_ids() {
        let registry = sample_registry().unwrap();
        let kinds: Vec<_> = registry.facilities().iter().map(Facility::kind_name).collect();

        assert_eq!(
            kinds,
            vec![
                "Hospital", "Clinic", "Hospital", "Clinic", "Hospital", "Clinic", "Hospital",
                "Clinic", "Hospital", "Clinic"
            ]
        );
        let ids: Vec<_> = registry.facilities().iter().map(Facility::id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(registry.facility(3).unwrap().name(), "City Hospital");
    }

    #[test]
    fn test_sample_procedures() {
        let registry = sample_registry().unwrap();
        let main = registry.hospital(1).unwrap();

        assert_eq!(main.procedures().len(), 10);
        let mammogram = main.procedure(10).unwrap();
        assert_eq!(mammogram.name(), "Mammogram");
        assert!(mammogram.is_elective());
        assert_eq!(mammogram.cost(), 300.0);

        let westside = registry.find_facility_by_name("Westside Hospital").unwrap();
        assert_eq!(westside.as_hospital().unwrap().admission_probability(), 0.3);
    }

    #[test]
    fn test_sample_patients_alternate_private() {
        let registry = sample_registry().unwrap();

        for (index, patient) in registry.patients().iter().enumerate() {
            assert_eq!(patient.is_private(), index % 2 == 0);
            assert_eq!(patient.balance(), 0.0);
        }
        assert_eq!(registry.patient(9).unwrap().name(), "Michelle");
    }
}
