//! Error types for the clinic_core library.

use crate::types::AppointmentStatus;
use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for clinic_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced patient does not exist in the store
    #[error("Patient not found: {0}")]
    PatientNotFound(Uuid),

    /// Referenced doctor does not exist in the store
    #[error("Doctor not found: {0}")]
    DoctorNotFound(Uuid),

    /// Referenced service does not exist in the store
    #[error("Service not found: {0}")]
    ServiceNotFound(Uuid),

    /// Referenced appointment does not exist in the store
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(Uuid),

    /// The doctor already has an appointment overlapping the requested window
    #[error("Doctor {doctor} already has an appointment in this time window")]
    Conflict { doctor: String },

    /// Completed and Cancelled are terminal states
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Malformed flat-file record
    #[error("Malformed record: {0}")]
    Parse(String),
}
