//! Appointment scheduling engine.
//!
//! Owns the no-double-booking rule: for any doctor, non-cancelled
//! appointments never overlap. Booking resolves the referenced records,
//! checks the requested window, then appends the appointment together with
//! its invoice. All operations are synchronous and immediately consistent
//! against the store; nothing here touches the filesystem.

use crate::store::RecordStore;
use crate::types::{Appointment, AppointmentStatus, Invoice};
use crate::{Error, Result};
use chrono::{Duration, Local, NaiveDateTime, Timelike};
use uuid::Uuid;

/// Book `service_id` with `doctor_id` for `patient_id` starting at `start`.
///
/// Lookups happen in patient, doctor, service order; the first missing id
/// determines the error. On success one appointment (Scheduled) and one
/// unpaid invoice are appended and the appointment is returned. The invoice
/// amount is the service cost evaluated now; it is never recomputed. A
/// failed booking leaves the store unchanged, and no booking writes to
/// disk — callers flush through `storage::save`.
pub fn book(
    store: &mut RecordStore,
    patient_id: Uuid,
    doctor_id: Uuid,
    service_id: Uuid,
    start: NaiveDateTime,
) -> Result<Appointment> {
    store
        .patient(patient_id)
        .ok_or(Error::PatientNotFound(patient_id))?;
    let doctor_name = store
        .doctor(doctor_id)
        .ok_or(Error::DoctorNotFound(doctor_id))?
        .full_name
        .clone();
    let service = store
        .service(service_id)
        .ok_or(Error::ServiceNotFound(service_id))?;
    let amount = service.cost();
    let end = start + Duration::minutes(i64::from(service.duration_minutes));

    if !is_available(store, doctor_id, start, end) {
        tracing::warn!("Booking conflict for doctor {} at {}", doctor_id, start);
        return Err(Error::Conflict { doctor: doctor_name });
    }

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        service_id,
        start,
        end,
        status: AppointmentStatus::Scheduled,
    };
    let invoice = Invoice {
        id: Uuid::new_v4(),
        appointment_id: appointment.id,
        amount,
        created_at: now_minute(),
        paid: false,
    };

    tracing::info!(
        "Booked appointment {} for doctor {} ({} -> {}), invoiced {}",
        appointment.id,
        doctor_id,
        start,
        end,
        amount
    );
    store.add_appointment(appointment.clone());
    store.add_invoice(invoice);
    Ok(appointment)
}

/// Whether `doctor_id` is free over the half-open window `[start, end)`.
///
/// Overlap rule: `a.start < end && start < a.end`. Touching boundaries do
/// not conflict, so back-to-back appointments are allowed. Cancelled
/// appointments no longer block their window. A doctor with no
/// appointments is always available.
pub fn is_available(
    store: &RecordStore,
    doctor_id: Uuid,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    store
        .appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id && a.status != AppointmentStatus::Cancelled)
        .all(|a| !a.overlaps(start, end))
}

/// Cancel a scheduled appointment. The invoice is left untouched.
pub fn cancel(store: &mut RecordStore, appointment_id: Uuid) -> Result<()> {
    transition(store, appointment_id, AppointmentStatus::Cancelled)
}

/// Mark a scheduled appointment as completed
pub fn complete(store: &mut RecordStore, appointment_id: Uuid) -> Result<()> {
    transition(store, appointment_id, AppointmentStatus::Completed)
}

/// All appointments for the doctor in insertion order, any status.
/// An unknown doctor id yields an empty list, never an error.
pub fn appointments_by_doctor(store: &RecordStore, doctor_id: Uuid) -> Vec<&Appointment> {
    store
        .appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id)
        .collect()
}

/// Scheduled is the only state with outgoing transitions; Completed and
/// Cancelled are terminal.
fn transition(
    store: &mut RecordStore,
    appointment_id: Uuid,
    to: AppointmentStatus,
) -> Result<()> {
    let appointment = store
        .appointment_mut(appointment_id)
        .ok_or(Error::AppointmentNotFound(appointment_id))?;
    match appointment.status {
        AppointmentStatus::Scheduled => {
            appointment.status = to;
            tracing::debug!("Appointment {} is now {}", appointment_id, to);
            Ok(())
        }
        from => Err(Error::InvalidTransition { from, to }),
    }
}

/// Current local time at minute precision, matching the flat-file layout
fn now_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Department, Doctor, MedicalService, Patient, ServiceKind};
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// Store with one patient, one doctor and one 60-minute examination
    fn clinic() -> (RecordStore, Uuid, Uuid, Uuid) {
        let mut store = RecordStore::new();
        let patient = Patient::new("An Tran", "0901", "12 Elm St", None);
        let doctor = Doctor::new("Dr Chi", "0988", "Clinic 1", Department::General);
        let service =
            MedicalService::new(ServiceKind::Examination, "Check-up", 150_000.0, 60);
        let ids = (patient.id, doctor.id, service.id);
        store.add_patient(patient);
        store.add_doctor(doctor);
        store.add_service(service);
        (store, ids.0, ids.1, ids.2)
    }

    #[test]
    fn test_booking_appends_appointment_and_invoice() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let before = now_minute();

        let appointment = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();

        assert_eq!(store.appointments.len(), 1);
        assert_eq!(store.invoices.len(), 1);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.end, at(10, 0));

        let invoice = &store.invoices[0];
        assert_eq!(invoice.appointment_id, appointment.id);
        assert_eq!(invoice.amount, 150_000.0);
        assert!(!invoice.paid);
        assert!(invoice.created_at >= before);
    }

    #[test]
    fn test_overlapping_booking_is_rejected_and_store_unchanged() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();

        let result = book(&mut store, patient_id, doctor_id, service_id, at(9, 30));
        match result {
            Err(Error::Conflict { doctor }) => assert_eq!(doctor, "Dr Chi"),
            other => panic!("expected conflict, got {:?}", other),
        }
        assert_eq!(store.appointments.len(), 1);
        assert_eq!(store.invoices.len(), 1);
    }

    #[test]
    fn test_back_to_back_bookings_are_allowed() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();

        // Starts exactly when the first one ends
        book(&mut store, patient_id, doctor_id, service_id, at(10, 0)).unwrap();
        assert_eq!(store.appointments.len(), 2);
    }

    #[test]
    fn test_unknown_ids_fail_in_lookup_order() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let ghost = Uuid::new_v4();

        assert!(matches!(
            book(&mut store, ghost, doctor_id, service_id, at(9, 0)),
            Err(Error::PatientNotFound(id)) if id == ghost
        ));
        assert!(matches!(
            book(&mut store, patient_id, ghost, service_id, at(9, 0)),
            Err(Error::DoctorNotFound(_))
        ));
        assert!(matches!(
            book(&mut store, patient_id, doctor_id, ghost, at(9, 0)),
            Err(Error::ServiceNotFound(_))
        ));
        // Patient is resolved first, so all-unknown reports the patient
        assert!(matches!(
            book(&mut store, ghost, ghost, ghost, at(9, 0)),
            Err(Error::PatientNotFound(_))
        ));
        assert!(store.appointments.is_empty());
        assert!(store.invoices.is_empty());
    }

    #[test]
    fn test_doctor_with_no_appointments_is_available() {
        let (store, _, doctor_id, _) = clinic();
        assert!(is_available(&store, doctor_id, at(9, 0), at(10, 0)));
    }

    #[test]
    fn test_cancelled_slot_can_be_rebooked() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let first = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();
        cancel(&mut store, first.id).unwrap();

        assert!(is_available(&store, doctor_id, at(9, 0), at(10, 0)));
        book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();
    }

    #[test]
    fn test_completed_appointment_still_blocks_its_window() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let first = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();
        complete(&mut store, first.id).unwrap();

        assert!(!is_available(&store, doctor_id, at(9, 30), at(10, 30)));
    }

    #[test]
    fn test_completed_and_cancelled_are_terminal() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let appointment = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();

        complete(&mut store, appointment.id).unwrap();
        assert!(matches!(
            cancel(&mut store, appointment.id),
            Err(Error::InvalidTransition {
                from: AppointmentStatus::Completed,
                ..
            })
        ));
        assert!(matches!(
            complete(&mut store, appointment.id),
            Err(Error::InvalidTransition { .. })
        ));
        assert_eq!(
            store.appointment(appointment.id).unwrap().status,
            AppointmentStatus::Completed
        );
    }

    #[test]
    fn test_cancel_unknown_appointment() {
        let (mut store, ..) = clinic();
        assert!(matches!(
            cancel(&mut store, Uuid::new_v4()),
            Err(Error::AppointmentNotFound(_))
        ));
    }

    #[test]
    fn test_cancellation_leaves_invoice_untouched() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let appointment = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();

        cancel(&mut store, appointment.id).unwrap();
        assert_eq!(store.invoices.len(), 1);
        assert_eq!(store.invoices[0].amount, 150_000.0);
        assert!(!store.invoices[0].paid);
    }

    #[test]
    fn test_schedule_listing_order_and_unknown_doctor() {
        let (mut store, patient_id, doctor_id, service_id) = clinic();
        let first = book(&mut store, patient_id, doctor_id, service_id, at(9, 0)).unwrap();
        let second = book(&mut store, patient_id, doctor_id, service_id, at(11, 0)).unwrap();
        cancel(&mut store, second.id).unwrap();

        // Any status, insertion order
        let listed = appointments_by_doctor(&store, doctor_id);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);

        assert!(appointments_by_doctor(&store, Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_invoice_amount_fixed_at_booking_time() {
        let (mut store, patient_id, doctor_id, _) = clinic();
        let surgery = MedicalService::new(ServiceKind::Surgery, "Appendectomy", 5_000_000.0, 31);
        let surgery_id = surgery.id;
        store.add_service(surgery);

        book(&mut store, patient_id, doctor_id, surgery_id, at(9, 0)).unwrap();
        // ceil(31/30) = 2 blocks on top of base
        assert_eq!(store.invoices[0].amount, 6_000_000.0);
    }
}
