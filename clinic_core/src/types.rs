//! Core domain types for the clinic management system.
//!
//! This module defines the fundamental types used throughout the system:
//! - People (patients, doctors) and departments
//! - Medical services and their cost model
//! - Appointments and their status
//! - Invoices

use chrono::NaiveDateTime;
use std::fmt;
use uuid::Uuid;

/// Surcharge applied to surgeries per started 30-minute block
const SURGERY_BLOCK_FEE: f64 = 500_000.0;

/// Flat supply surcharge applied to lab tests
const TEST_SURCHARGE: f64 = 1.15;

// ============================================================================
// People
// ============================================================================

/// Clinic department a doctor belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Department {
    General,
    Cardiology,
    Neurology,
    Orthopedics,
    Pediatrics,
    Dermatology,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::General,
        Department::Cardiology,
        Department::Neurology,
        Department::Orthopedics,
        Department::Pediatrics,
        Department::Dermatology,
    ];

    /// Stable token used in the flat files
    pub fn name(&self) -> &'static str {
        match self {
            Department::General => "GENERAL",
            Department::Cardiology => "CARDIOLOGY",
            Department::Neurology => "NEUROLOGY",
            Department::Orthopedics => "ORTHOPEDICS",
            Department::Pediatrics => "PEDIATRICS",
            Department::Dermatology => "DERMATOLOGY",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Department::ALL.iter().copied().find(|d| d.name() == name)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered patient
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub insurance_number: Option<String>,
}

impl Patient {
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        insurance_number: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            phone: phone.into(),
            address: address.into(),
            insurance_number,
        }
    }
}

/// A doctor attached to one department
#[derive(Clone, Debug, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub department: Department,
}

impl Doctor {
    pub fn new(
        full_name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        department: Department,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            phone: phone.into(),
            address: address.into(),
            department,
        }
    }
}

// ============================================================================
// Medical services
// ============================================================================

/// The closed set of service variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceKind {
    Examination,
    Surgery,
    Test,
}

impl ServiceKind {
    /// Variant tag used in the flat files
    pub fn tag(&self) -> &'static str {
        match self {
            ServiceKind::Examination => "Examination",
            ServiceKind::Surgery => "Surgery",
            ServiceKind::Test => "Test",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Examination" => Some(ServiceKind::Examination),
            "Surgery" => Some(ServiceKind::Surgery),
            "Test" => Some(ServiceKind::Test),
            _ => None,
        }
    }
}

/// A bookable medical service. Immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct MedicalService {
    pub id: Uuid,
    pub kind: ServiceKind,
    pub name: String,
    pub base_cost: f64,
    pub duration_minutes: u32,
}

impl MedicalService {
    pub fn new(
        kind: ServiceKind,
        name: impl Into<String>,
        base_cost: f64,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            base_cost,
            duration_minutes,
        }
    }

    /// Billable amount for this service.
    ///
    /// Surgery bills the base cost plus a fee per 30-minute block, where a
    /// trailing partial block counts as a full one (31 minutes → 2 blocks).
    pub fn cost(&self) -> f64 {
        match self.kind {
            ServiceKind::Examination => self.base_cost,
            ServiceKind::Surgery => {
                let blocks = self.duration_minutes.div_ceil(30);
                self.base_cost + f64::from(blocks) * SURGERY_BLOCK_FEE
            }
            ServiceKind::Test => self.base_cost * TEST_SURCHARGE,
        }
    }
}

// ============================================================================
// Appointments and invoices
// ============================================================================

/// Lifecycle state of an appointment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Stable token used in the flat files
    pub fn name(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A booked visit linking one patient, one doctor and one service.
///
/// The end time is derived from the service duration at booking. For a fixed
/// doctor, non-cancelled appointments never overlap; the scheduling engine
/// enforces this.
#[derive(Clone, Debug, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub service_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Half-open overlap test: `[self.start, self.end)` against
    /// `[start, end)`. Touching boundaries do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// The bill issued for one appointment.
///
/// The amount is fixed when the booking is made; later changes to the
/// service catalog never alter issued invoices.
#[derive(Clone, Debug, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub amount: f64,
    pub created_at: NaiveDateTime,
    pub paid: bool,
}

impl Invoice {
    pub fn mark_paid(&mut self) {
        self.paid = true;
    }
}
