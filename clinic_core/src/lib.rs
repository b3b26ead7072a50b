#![forbid(unsafe_code)]

//! Core domain model and business logic for the clinic management system.
//!
//! This crate provides:
//! - Domain types (patients, doctors, services, appointments, invoices)
//! - The appointment scheduling engine
//! - Flat-file persistence (line codec, record store, bulk storage)
//! - Reports and demo seeding

pub mod types;
pub mod error;
pub mod codec;
pub mod store;
pub mod storage;
pub mod engine;
pub mod reports;
pub mod seed;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::RecordStore;
pub use engine::{appointments_by_doctor, book, cancel, complete, is_available};
pub use seed::demo_store;
