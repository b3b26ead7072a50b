//! Flat-file persistence for the record store.
//!
//! Each entity type lives in its own line-oriented file in the data
//! directory. Loads take a shared lock; saves write through a temp file
//! under an exclusive lock and rename into place, so a crash mid-save never
//! leaves a half-written file.

use crate::codec::FlatRecord;
use crate::store::RecordStore;
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const PATIENTS_FILE: &str = "patients.csv";
pub const DOCTORS_FILE: &str = "doctors.csv";
pub const SERVICES_FILE: &str = "services.csv";
pub const APPOINTMENTS_FILE: &str = "appointments.csv";
pub const INVOICES_FILE: &str = "invoices.csv";

/// Load the full store from `dir`.
///
/// Missing files yield empty collections, never an error; a first run
/// against a fresh directory returns an empty store.
pub fn load(dir: &Path) -> Result<RecordStore> {
    let store = RecordStore {
        patients: read_records(&dir.join(PATIENTS_FILE))?,
        doctors: read_records(&dir.join(DOCTORS_FILE))?,
        services: read_records(&dir.join(SERVICES_FILE))?,
        appointments: read_records(&dir.join(APPOINTMENTS_FILE))?,
        invoices: read_records(&dir.join(INVOICES_FILE))?,
    };
    tracing::debug!(
        "Loaded store from {:?}: {} patients, {} doctors, {} services, {} appointments, {} invoices",
        dir,
        store.patients.len(),
        store.doctors.len(),
        store.services.len(),
        store.appointments.len(),
        store.invoices.len()
    );
    Ok(store)
}

/// Save the full store to `dir`, one file per entity type
pub fn save(store: &RecordStore, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_records(&dir.join(PATIENTS_FILE), &store.patients)?;
    write_records(&dir.join(DOCTORS_FILE), &store.doctors)?;
    write_records(&dir.join(SERVICES_FILE), &store.services)?;
    write_records(&dir.join(APPOINTMENTS_FILE), &store.appointments)?;
    write_records(&dir.join(INVOICES_FILE), &store.invoices)?;
    tracing::info!("Saved store to {:?}", dir);
    Ok(())
}

fn read_records<T: FlatRecord>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;
    let result = decode_lines(BufReader::new(&file));
    file.unlock()?;
    result
}

fn decode_lines<T: FlatRecord>(reader: impl BufRead) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for line_result in reader.lines() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(T::decode(&line)?);
    }
    Ok(records)
}

fn write_records<T: FlatRecord>(path: &Path, records: &[T]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "data path missing parent")
    })?;

    // Unique temp file in the same directory for atomic rename
    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        for record in records {
            writer.write_all(record.encode().as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}
