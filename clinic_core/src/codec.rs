//! Line-oriented codec for the flat files.
//!
//! Every entity persists as one line of comma-separated positional fields.
//! A literal comma inside a text field is written as `\,` and restored on
//! read; field order is fixed per entity type.

use crate::types::{
    Appointment, AppointmentStatus, Department, Doctor, Invoice, MedicalService, Patient,
    ServiceKind,
};
use crate::{Error, Result};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Date-time layout used in the flat files
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A record that round-trips through one line of a flat file
pub trait FlatRecord: Sized {
    fn encode(&self) -> String;
    fn decode(line: &str) -> Result<Self>;
}

fn escape(field: &str) -> String {
    field.replace(',', "\\,")
}

/// Split a line on unescaped commas, restoring `\,` to a literal comma.
/// Any other backslash passes through untouched.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                chars.next();
                current.push(',');
            }
            ',' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn expect_fields(line: &str, expected: usize) -> Result<Vec<String>> {
    let fields = split_fields(line);
    if fields.len() != expected {
        return Err(Error::Parse(format!(
            "expected {} fields, got {}: {}",
            expected,
            fields.len(),
            line
        )));
    }
    Ok(fields)
}

fn parse_id(field: &str) -> Result<Uuid> {
    Uuid::parse_str(field).map_err(|e| Error::Parse(format!("bad id '{}': {}", field, e)))
}

fn parse_date_time(field: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(field, DATE_TIME_FORMAT)
        .map_err(|e| Error::Parse(format!("bad date-time '{}': {}", field, e)))
}

fn parse_f64(field: &str) -> Result<f64> {
    field
        .parse()
        .map_err(|e| Error::Parse(format!("bad number '{}': {}", field, e)))
}

fn parse_u32(field: &str) -> Result<u32> {
    field
        .parse()
        .map_err(|e| Error::Parse(format!("bad number '{}': {}", field, e)))
}

fn parse_bool(field: &str) -> Result<bool> {
    field
        .parse()
        .map_err(|e| Error::Parse(format!("bad flag '{}': {}", field, e)))
}

impl FlatRecord for Patient {
    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id,
            escape(&self.full_name),
            escape(&self.phone),
            escape(&self.address),
            escape(self.insurance_number.as_deref().unwrap_or(""))
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let f = expect_fields(line, 5)?;
        Ok(Patient {
            id: parse_id(&f[0])?,
            full_name: f[1].clone(),
            phone: f[2].clone(),
            address: f[3].clone(),
            insurance_number: if f[4].is_empty() { None } else { Some(f[4].clone()) },
        })
    }
}

impl FlatRecord for Doctor {
    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id,
            escape(&self.full_name),
            escape(&self.phone),
            escape(&self.address),
            self.department.name()
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let f = expect_fields(line, 5)?;
        Ok(Doctor {
            id: parse_id(&f[0])?,
            full_name: f[1].clone(),
            phone: f[2].clone(),
            address: f[3].clone(),
            department: Department::from_name(&f[4])
                .ok_or_else(|| Error::Parse(format!("unknown department '{}'", f[4])))?,
        })
    }
}

impl FlatRecord for MedicalService {
    fn encode(&self) -> String {
        // Trailing field is the computed cost; informational only
        format!(
            "{},{},{},{},{},{}",
            self.kind.tag(),
            self.id,
            escape(&self.name),
            self.base_cost,
            self.duration_minutes,
            self.cost()
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let f = expect_fields(line, 6)?;
        // f[5] is the exported computed cost; the cost model is
        // authoritative, so the field is ignored on import.
        Ok(MedicalService {
            kind: ServiceKind::from_tag(&f[0])
                .ok_or_else(|| Error::Parse(format!("unknown service kind '{}'", f[0])))?,
            id: parse_id(&f[1])?,
            name: f[2].clone(),
            base_cost: parse_f64(&f[3])?,
            duration_minutes: parse_u32(&f[4])?,
        })
    }
}

impl FlatRecord for Appointment {
    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.id,
            self.patient_id,
            self.doctor_id,
            self.service_id,
            self.start.format(DATE_TIME_FORMAT),
            self.end.format(DATE_TIME_FORMAT),
            self.status.name()
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let f = expect_fields(line, 7)?;
        Ok(Appointment {
            id: parse_id(&f[0])?,
            patient_id: parse_id(&f[1])?,
            doctor_id: parse_id(&f[2])?,
            service_id: parse_id(&f[3])?,
            start: parse_date_time(&f[4])?,
            end: parse_date_time(&f[5])?,
            status: AppointmentStatus::from_name(&f[6])
                .ok_or_else(|| Error::Parse(format!("unknown status '{}'", f[6])))?,
        })
    }
}

impl FlatRecord for Invoice {
    fn encode(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.id,
            self.appointment_id,
            self.amount,
            self.created_at.format(DATE_TIME_FORMAT),
            self.paid
        )
    }

    fn decode(line: &str) -> Result<Self> {
        let f = expect_fields(line, 5)?;
        Ok(Invoice {
            id: parse_id(&f[0])?,
            appointment_id: parse_id(&f[1])?,
            amount: parse_f64(&f[2])?,
            created_at: parse_date_time(&f[3])?,
            paid: parse_bool(&f[4])?,
        })
    }
}
