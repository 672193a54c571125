use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hsm_core::{
    config::data_file_from_env_value, constants::DATA_FILE_ENV, sample::sample_registry,
    snapshot, validation, Clinic, CoreConfig, Facility, Hospital, Patient, Procedure, Registry,
    VisitOutcome,
};
use hsm_types::NonEmptyText;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hsm")]
#[command(about = "Health service manager: facilities, patients and procedures")]
struct Cli {
    /// Snapshot file to read and write (defaults to $HSM_DATA_FILE, then health_service.json)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new data file
    Init {
        /// Populate the file with the demonstration data set
        #[arg(long)]
        sample: bool,
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
    /// Manage hospitals and clinics
    #[command(subcommand)]
    Facility(FacilityCommand),
    /// Manage patients
    #[command(subcommand)]
    Patient(PatientCommand),
    /// Manage the procedures a hospital offers
    #[command(subcommand)]
    Procedure(ProcedureCommand),
    /// Send a patient to a facility
    Visit {
        patient_id: usize,
        facility_id: usize,
    },
    /// Have a hospital perform a procedure on a patient
    Perform {
        patient_id: usize,
        hospital_id: usize,
        procedure_id: usize,
    },
}

#[derive(Subcommand)]
enum FacilityCommand {
    /// List all facilities
    List,
    /// Add a hospital
    AddHospital {
        name: NonEmptyText,
        /// Probability in [0, 1] that a visiting patient is admitted
        #[arg(value_parser = validation::admission_probability)]
        admission_probability: f64,
    },
    /// Add a clinic
    AddClinic {
        name: NonEmptyText,
        #[arg(value_parser = validation::non_negative_amount)]
        consultation_fee: f64,
        /// Extra percentage charged to private patients
        #[arg(value_parser = validation::percentage)]
        gap_percent: f64,
    },
    /// Remove a facility
    Remove { id: usize },
    /// Edit a facility
    Edit {
        id: usize,
        #[arg(long)]
        name: Option<NonEmptyText>,
        /// Hospitals only
        #[arg(long, value_parser = validation::admission_probability)]
        admission_probability: Option<f64>,
        /// Clinics only
        #[arg(long, value_parser = validation::non_negative_amount)]
        fee: Option<f64>,
        /// Clinics only
        #[arg(long, value_parser = validation::percentage)]
        gap: Option<f64>,
    },
}

#[derive(Subcommand)]
enum PatientCommand {
    /// List all patients
    List,
    /// Add a patient
    Add {
        name: NonEmptyText,
        /// Register the patient as private
        #[arg(long)]
        private: bool,
    },
    /// Remove a patient
    Remove { id: usize },
    /// Rename a patient
    Rename { id: usize, name: NonEmptyText },
}

#[derive(Subcommand)]
enum ProcedureCommand {
    /// List a hospital's procedures
    List { hospital_id: usize },
    /// Add a procedure to a hospital
    Add {
        hospital_id: usize,
        name: NonEmptyText,
        description: NonEmptyText,
        #[arg(value_parser = validation::non_negative_amount)]
        cost: f64,
        #[arg(long)]
        elective: bool,
    },
    /// Remove a procedure from a hospital
    Remove { hospital_id: usize, id: usize },
    /// Edit a procedure
    Edit {
        hospital_id: usize,
        id: usize,
        #[arg(long)]
        name: Option<NonEmptyText>,
        #[arg(long)]
        description: Option<NonEmptyText>,
        #[arg(long)]
        elective: Option<bool>,
        #[arg(long, value_parser = validation::non_negative_amount)]
        cost: Option<f64>,
    },
}

fn log_filter(verbose: bool) -> anyhow::Result<tracing_subscriber::EnvFilter> {
    let level = if verbose { "debug" } else { "warn" };

    Ok(tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("hsm_core={}", level).parse()?)
        .add_directive(format!("hsm={}", level).parse()?))
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter(verbose)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let data_file = cli
        .data
        .unwrap_or_else(|| data_file_from_env_value(std::env::var(DATA_FILE_ENV).ok()));
    let cfg = CoreConfig::new(data_file)?;
    tracing::info!("data file: {}", cfg.data_file().display());

    let Some(command) = cli.command else {
        println!("Use 'hsm --help' for commands");
        return Ok(());
    };

    let path = cfg.data_file();
    let mut registry = match &command {
        Commands::Init { force, .. } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            Registry::new()
        }
        _ => snapshot::load_or_default(path)
            .with_context(|| format!("could not load {}", path.display()))?,
    };

    let changed = match command {
        Commands::Init { sample, .. } => {
            if sample {
                registry = sample_registry()?;
            }
            println!(
                "Initialised {} with {} facilities and {} patients",
                path.display(),
                registry.facilities().len(),
                registry.patients().len()
            );
            true
        }
        Commands::Facility(cmd) => facility(&mut registry, cmd)?,
        Commands::Patient(cmd) => patient(&mut registry, cmd),
        Commands::Procedure(cmd) => procedure(&mut registry, cmd)?,
        Commands::Visit {
            patient_id,
            facility_id,
        } => visit(&mut registry, patient_id, facility_id),
        Commands::Perform {
            patient_id,
            hospital_id,
            procedure_id,
        } => perform(&mut registry, patient_id, hospital_id, procedure_id),
    };

    if changed {
        tracing::debug!("registry changed, saving");
        snapshot::save_to_path(&registry, path)
            .with_context(|| format!("could not save {}", path.display()))?;
    }

    Ok(())
}

fn describe_facility(facility: &Facility) -> String {
    match facility {
        Facility::Hospital(h) => format!(
            "{}, Admission Probability: {}, Procedures: {}",
            facility,
            h.admission_probability(),
            h.procedures().len()
        ),
        Facility::Clinic(c) => format!(
            "{}, Consultation Fee: {:.1}, Gap: {}%",
            facility,
            c.consultation_fee(),
            c.gap_percent()
        ),
    }
}

fn facility(registry: &mut Registry, cmd: FacilityCommand) -> anyhow::Result<bool> {
    match cmd {
        FacilityCommand::List => {
            if registry.facilities().is_empty() {
                println!("No facilities found.");
            }
            for facility in registry.facilities() {
                println!("{}", describe_facility(facility));
            }
            Ok(false)
        }
        FacilityCommand::AddHospital {
            name,
            admission_probability,
        } => {
            let id = registry.add_facility(Hospital::new(name, admission_probability));
            println!("Added hospital with ID: {}", id);
            Ok(true)
        }
        FacilityCommand::AddClinic {
            name,
            consultation_fee,
            gap_percent,
        } => {
            let id = registry.add_facility(Clinic::new(name, consultation_fee, gap_percent));
            println!("Added clinic with ID: {}", id);
            Ok(true)
        }
        FacilityCommand::Remove { id } => match registry.remove_facility(id) {
            Some(removed) => {
                if let Facility::Hospital(h) = &removed {
                    for procedure in h.procedures() {
                        println!("- removed procedure {}", procedure.name());
                    }
                }
                println!("Facility deleted.");
                Ok(true)
            }
            None => {
                println!("Facility not found.");
                Ok(false)
            }
        },
        FacilityCommand::Edit {
            id,
            name,
            admission_probability,
            fee,
            gap,
        } => {
            let Some(facility) = registry.facility_mut(id) else {
                println!("Facility not found.");
                return Ok(false);
            };
            match &mut *facility {
                Facility::Hospital(h) => {
                    if fee.is_some() || gap.is_some() {
                        bail!("--fee and --gap only apply to clinics");
                    }
                    if let Some(p) = admission_probability {
                        h.set_admission_probability(p);
                    }
                }
                Facility::Clinic(c) => {
                    if admission_probability.is_some() {
                        bail!("--admission-probability only applies to hospitals");
                    }
                    if let Some(fee) = fee {
                        c.set_consultation_fee(fee);
                    }
                    if let Some(gap) = gap {
                        c.set_gap_percent(gap);
                    }
                }
            }
            if let Some(name) = name {
                facility.set_name(name);
            }
            println!("{}", describe_facility(facility));
            Ok(true)
        }
    }
}

fn patient(registry: &mut Registry, cmd: PatientCommand) -> bool {
    match cmd {
        PatientCommand::List => {
            if registry.patients().is_empty() {
                println!("No patients found.");
            }
            for patient in registry.patients() {
                let location = match patient.current_facility() {
                    None => "-".to_string(),
                    Some(key) => registry
                        .facility_by_key(key)
                        .map(|f| f.name().to_string())
                        .unwrap_or_else(|| "(removed facility)".to_string()),
                };
                println!("{}, Current Facility: {}", patient, location);
            }
            false
        }
        PatientCommand::Add { name, private } => {
            let id = registry.add_patient(Patient::new(name, private));
            println!("Added patient with ID: {}", id);
            true
        }
        PatientCommand::Remove { id } => {
            if registry.remove_patient(id).is_some() {
                println!("Patient deleted.");
                true
            } else {
                println!("Patient not found.");
                false
            }
        }
        PatientCommand::Rename { id, name } => match registry.patient_mut(id) {
            Some(patient) => {
                patient.set_name(name);
                println!("{}", patient);
                true
            }
            None => {
                println!("Patient not found.");
                false
            }
        },
    }
}

fn procedure(registry: &mut Registry, cmd: ProcedureCommand) -> anyhow::Result<bool> {
    match cmd {
        ProcedureCommand::List { hospital_id } => {
            let Some(hospital) = registry.hospital(hospital_id) else {
                println!("Hospital not found.");
                return Ok(false);
            };
            if hospital.procedures().is_empty() {
                println!("No procedures available.");
            }
            for procedure in hospital.procedures() {
                println!("{}", procedure);
            }
            Ok(false)
        }
        ProcedureCommand::Add {
            hospital_id,
            name,
            description,
            cost,
            elective,
        } => {
            let Some(hospital) = registry.hospital_mut(hospital_id) else {
                println!("Hospital not found.");
                return Ok(false);
            };
            let id = hospital.add_procedure(Procedure::new(name, description, elective, cost));
            println!("Added procedure with ID: {}", id);
            Ok(true)
        }
        ProcedureCommand::Remove { hospital_id, id } => {
            let Some(hospital) = registry.hospital_mut(hospital_id) else {
                println!("Hospital not found.");
                return Ok(false);
            };
            if hospital.remove_procedure(id).is_some() {
                println!("Procedure deleted.");
                Ok(true)
            } else {
                println!("Procedure not found.");
                Ok(false)
            }
        }
        ProcedureCommand::Edit {
            hospital_id,
            id,
            name,
            description,
            elective,
            cost,
        } => {
            let Some(procedure) = registry
                .hospital_mut(hospital_id)
                .and_then(|h| h.procedure_mut(id))
            else {
                println!("Procedure not found.");
                return Ok(false);
            };
            if let Some(name) = name {
                procedure.set_name(name);
            }
            if let Some(description) = description {
                procedure.set_description(description);
            }
            if let Some(elective) = elective {
                procedure.set_elective(elective);
            }
            if let Some(cost) = cost {
                procedure.set_cost(cost);
            }
            println!("{}", procedure);
            Ok(true)
        }
    }
}

fn visit(registry: &mut Registry, patient_id: usize, facility_id: usize) -> bool {
    let outcome = registry.visit(patient_id, facility_id, &mut rand::thread_rng());
    let (Some(outcome), Some(patient), Some(facility)) = (
        outcome,
        registry.patient(patient_id),
        registry.facility(facility_id),
    ) else {
        println!("> Patient or Facility not found.");
        return false;
    };

    let action = match outcome {
        VisitOutcome::Admitted => "was admitted at".to_string(),
        VisitOutcome::NotAdmitted => "was not admitted at".to_string(),
        VisitOutcome::Registered => "was registered at".to_string(),
        VisitOutcome::Consulted { charge } => {
            format!("was charged {:.2} for a consultation at", charge)
        }
    };
    println!("> Patient {} {} {}", patient.name(), action, facility.name());
    outcome != VisitOutcome::NotAdmitted
}

fn perform(
    registry: &mut Registry,
    patient_id: usize,
    hospital_id: usize,
    procedure_id: usize,
) -> bool {
    let Some(success) = registry.perform_procedure(patient_id, hospital_id, procedure_id) else {
        println!("> Patient, Hospital or Procedure not found.");
        return false;
    };

    let (Some(patient), Some(procedure)) = (
        registry.patient(patient_id),
        registry
            .hospital(hospital_id)
            .and_then(|h| h.procedure(procedure_id)),
    ) else {
        return success;
    };
    println!(
        "> Procedure {} {} on patient {}.",
        procedure.name(),
        if success {
            "performed"
        } else {
            "could not be performed"
        },
        patient.name()
    );
    success
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter_covers_binary_and_core() {
        let verbose = log_filter(true).unwrap().to_string();
        assert!(verbose.contains("hsm_core=debug"));
        assert!(verbose.contains("hsm=debug"));

        let quiet = log_filter(false).unwrap().to_string();
        assert!(quiet.contains("hsm=warn"));
    }

    #[test]
    fn test_parses_add_hospital() {
        let cli = Cli::try_parse_from(["hsm", "facility", "add-hospital", "City", "0.6"]).unwrap();
        match cli.command {
            Some(Commands::Facility(FacilityCommand::AddHospital {
                name,
                admission_probability,
            })) => {
                assert_eq!(name, "City");
                assert_eq!(admission_probability, 0.6);
            }
            _ => panic!("Expected add-hospital"),
        }
    }

    #[test]
    fn test_rejects_invalid_input_at_boundary() {
        assert!(Cli::try_parse_from(["hsm", "facility", "add-hospital", "City", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["hsm", "facility", "add-hospital", " ", "0.5"]).is_err());
        assert!(
            Cli::try_parse_from(["hsm", "facility", "add-clinic", "Gen", "-1", "10"]).is_err()
        );
        assert!(Cli::try_parse_from(["hsm", "patient", "add", ""]).is_err());
    }

    #[test]
    fn test_global_data_flag() {
        let cli =
            Cli::try_parse_from(["hsm", "patient", "list", "--data", "/tmp/x.json"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x.json")));
    }

    #[test]
    fn test_facility_commands_mutate_registry() {
        let mut registry = Registry::new();
        let changed = facility(
            &mut registry,
            FacilityCommand::AddClinic {
                name: NonEmptyText::new("General").unwrap(),
                consultation_fee: 50.0,
                gap_percent: 10.0,
            },
        )
        .unwrap();
        assert!(changed);
        assert_eq!(registry.facilities().len(), 1);

        assert!(!facility(&mut registry, FacilityCommand::Remove { id: 4 }).unwrap());
        assert!(facility(&mut registry, FacilityCommand::Remove { id: 1 }).unwrap());
        assert!(registry.facilities().is_empty());
    }

    #[test]
    fn test_edit_rejects_mismatched_kind_flags() {
        let mut registry = Registry::new();
        registry.add_facility(Clinic::new(NonEmptyText::new("General").unwrap(), 50.0, 10.0));

        let result = facility(
            &mut registry,
            FacilityCommand::Edit {
                id: 1,
                name: None,
                admission_probability: Some(0.5),
                fee: None,
                gap: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_visit_and_perform_report_changes() {
        let mut registry = Registry::new();
        let mut city = Hospital::new(NonEmptyText::new("City").unwrap(), 1.0);
        city.add_procedure(Procedure::new(
            NonEmptyText::new("X").unwrap(),
            NonEmptyText::new("x").unwrap(),
            true,
            1500.0,
        ));
        registry.add_facility(city);
        registry.add_patient(Patient::new(NonEmptyText::new("A").unwrap(), true));

        assert!(!visit(&mut registry, 1, 2));
        assert!(visit(&mut registry, 1, 1));
        assert!(perform(&mut registry, 1, 1, 1));
        assert_eq!(registry.patient(1).unwrap().balance(), 4000.0);
        assert!(!perform(&mut registry, 1, 1, 2));
    }

    #[test]
    fn test_refused_admission_reports_no_change() {
        let mut registry = Registry::new();
        registry.add_facility(Hospital::new(NonEmptyText::new("Closed").unwrap(), 0.0));
        registry.add_facility(Clinic::new(NonEmptyText::new("General").unwrap(), 50.0, 10.0));
        registry.add_patient(Patient::new(NonEmptyText::new("A").unwrap(), false));
        let before = registry.clone();

        assert!(!visit(&mut registry, 1, 1));
        assert_eq!(registry, before);

        assert!(visit(&mut registry, 1, 2));
        assert!(visit(&mut registry, 1, 2));
        assert_eq!(registry.patient(1).unwrap().balance(), 50.0);
    }
}
