//! Built-in demo dataset.
//!
//! First runs start from an empty data directory; this module fills a fresh
//! store with a plausible clinic so every menu entry has something to show.

use crate::engine;
use crate::store::RecordStore;
use crate::types::{Department, Doctor, MedicalService, Patient, ServiceKind};
use crate::Result;
use chrono::{Duration, Local};

/// Build a demo clinic: 20 patients, 10 doctors, 15 services and 30 booked
/// appointments with their invoices.
///
/// Patient, doctor, service and start time all derive from the loop index,
/// so the dataset is reproducible. Each doctor receives at most one
/// appointment per day, which keeps the schedule conflict-free; every
/// booking still goes through the engine so the invariants hold the same
/// way they do for user bookings.
pub fn demo_store() -> Result<RecordStore> {
    let mut store = RecordStore::new();

    for i in 1..=20 {
        store.add_patient(Patient::new(
            format!("Patient {}", i),
            format!("090-{:04}", i),
            format!("{} Clinic Road", i),
            Some(format!("INS-{}", i)),
        ));
    }

    for i in 1..=10usize {
        store.add_doctor(Doctor::new(
            format!("Dr {}", i),
            format!("098-{:04}", i),
            format!("Ward {}", i),
            Department::ALL[i % Department::ALL.len()],
        ));
    }

    for i in 1..=5 {
        store.add_service(MedicalService::new(
            ServiceKind::Examination,
            format!("General check-up {}", i),
            150_000.0,
            20,
        ));
    }
    for i in 1..=5 {
        store.add_service(MedicalService::new(
            ServiceKind::Test,
            format!("Lab test {}", i),
            200_000.0,
            15,
        ));
    }
    for i in 1..=5 {
        store.add_service(MedicalService::new(
            ServiceKind::Surgery,
            format!("Surgery {}", i),
            5_000_000.0,
            120,
        ));
    }

    let first_morning = Local::now()
        .date_naive()
        .and_hms_opt(8, 0, 0)
        .expect("08:00 is a valid time")
        + Duration::days(1);

    for i in 0..30 {
        let patient_id = store.patients[i % 20].id;
        let doctor_id = store.doctors[i % 10].id;
        let service_id = store.services[i % 15].id;
        // Doctor i % 10 appears once per day: days advance every 10 bookings
        let start = first_morning + Duration::days((i / 10) as i64);
        engine::book(&mut store, patient_id, doctor_id, service_id, start)?;
    }

    tracing::info!(
        "Seeded demo store: {} patients, {} doctors, {} services, {} appointments",
        store.patients.len(),
        store.doctors.len(),
        store.services.len(),
        store.appointments.len()
    );
    Ok(store)
}
