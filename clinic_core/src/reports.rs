//! Read-only aggregations over the record store.

use crate::store::RecordStore;
use chrono::Datelike;
use std::collections::HashMap;
use uuid::Uuid;

/// Doctors ranked by total appointment count (any status), descending.
/// Ties break arbitrarily.
pub fn top_doctors_by_appointments(store: &RecordStore, limit: usize) -> Vec<(Uuid, usize)> {
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for appointment in &store.appointments {
        *counts.entry(appointment.doctor_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Total invoiced amount for the given month, paid or not
pub fn monthly_revenue(store: &RecordStore, year: i32, month: u32) -> f64 {
    store
        .invoices
        .iter()
        .filter(|i| i.created_at.year() == year && i.created_at.month() == month)
        .map(|i| i.amount)
        .sum()
}
