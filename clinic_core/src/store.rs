//! In-memory record store.
//!
//! Owns the five entity collections in insertion order. The store is a plain
//! value handed by reference to the engine and the shell; tests construct a
//! fresh one each time.

use crate::types::{Appointment, Doctor, Invoice, MedicalService, Patient};
use uuid::Uuid;

/// All clinic records, addressable by id via linear scan
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    pub patients: Vec<Patient>,
    pub doctors: Vec<Doctor>,
    pub services: Vec<MedicalService>,
    pub appointments: Vec<Appointment>,
    pub invoices: Vec<Invoice>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no master data exists at all; used to trigger demo seeding
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.doctors.is_empty() && self.services.is_empty()
    }

    pub fn patient(&self, id: Uuid) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn doctor(&self, id: Uuid) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.id == id)
    }

    pub fn service(&self, id: Uuid) -> Option<&MedicalService> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn appointment_mut(&mut self, id: Uuid) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| a.id == id)
    }

    pub fn add_patient(&mut self, patient: Patient) {
        self.patients.push(patient);
    }

    pub fn add_doctor(&mut self, doctor: Doctor) {
        self.doctors.push(doctor);
    }

    pub fn add_service(&mut self, service: MedicalService) {
        self.services.push(service);
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }

    pub fn add_invoice(&mut self, invoice: Invoice) {
        self.invoices.push(invoice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Department;

    #[test]
    fn test_lookup_by_id() {
        let mut store = RecordStore::new();
        let patient = Patient::new("An", "0901", "Elm St", None);
        let id = patient.id;
        store.add_patient(patient);

        assert_eq!(store.patient(id).unwrap().full_name, "An");
        assert!(store.patient(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut store = RecordStore::new();
        for i in 0..5 {
            store.add_doctor(Doctor::new(
                format!("Dr {}", i),
                "098",
                "Clinic",
                Department::General,
            ));
        }
        let names: Vec<_> = store.doctors.iter().map(|d| d.full_name.as_str()).collect();
        assert_eq!(names, ["Dr 0", "Dr 1", "Dr 2", "Dr 3", "Dr 4"]);
    }

    #[test]
    fn test_empty_store_reports_empty() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());
        store.add_patient(Patient::new("An", "0901", "Elm St", None));
        assert!(!store.is_empty());
    }
}
