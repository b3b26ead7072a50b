use chrono::{Datelike, Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use clinic_core::codec::DATE_TIME_FORMAT;
use clinic_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic patient and appointment management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (default)
    Menu,

    /// Overwrite the data directory with the demo dataset
    Seed,
}

fn main() -> Result<()> {
    // Initialize logging
    clinic_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Seed) => cmd_seed(&data_dir),
        Some(Commands::Menu) | None => cmd_menu(&data_dir, &config),
    }
}

fn cmd_seed(data_dir: &Path) -> Result<()> {
    let store = demo_store()?;
    storage::save(&store, data_dir)?;
    println!("Seeded demo data in {}", data_dir.display());
    Ok(())
}

fn cmd_menu(data_dir: &Path, config: &Config) -> Result<()> {
    let mut store = storage::load(data_dir)?;

    // First run: nothing on disk yet, start from the demo dataset
    if store.is_empty() {
        store = demo_store()?;
        storage::save(&store, data_dir)?;
        println!("No existing data found; seeded a demo clinic.");
    }

    loop {
        print_menu();
        let Some(choice) = read_line("Enter choice: ")? else { break };
        match choice.as_str() {
            "0" => break,
            "1" => {
                list_patients(&store);
                pause()?;
            }
            "2" => {
                add_patient(&mut store)?;
                pause()?;
            }
            "3" => {
                list_doctors(&store);
                pause()?;
            }
            "4" => {
                add_doctor(&mut store)?;
                pause()?;
            }
            "5" => {
                list_services(&store);
                pause()?;
            }
            "6" => {
                book_appointment(&mut store)?;
                pause()?;
            }
            "7" => {
                show_doctor_schedule(&store)?;
                pause()?;
            }
            "8" => {
                update_appointment_status(&mut store, config)?;
                pause()?;
            }
            "9" => {
                match storage::save(&store, data_dir) {
                    Ok(()) => println!(">> Saved all records to {}", data_dir.display()),
                    Err(e) => println!("!! Save failed: {}", e),
                }
                pause()?;
            }
            "10" => {
                report_top_doctors(&store);
                pause()?;
            }
            "11" => {
                report_monthly_revenue(&store);
                pause()?;
            }
            _ => println!("Invalid choice!"),
        }
    }

    println!("Bye.");
    Ok(())
}

fn print_menu() {
    println!();
    println!("╔══════════════════════════════════════════╗");
    println!("║  PATIENT RECORDS & APPOINTMENTS          ║");
    println!("╠══════════════════════════════════════════╣");
    println!("║  1. List patients                        ║");
    println!("║  2. Add a patient                        ║");
    println!("║  3. List doctors                         ║");
    println!("║  4. Add a doctor                         ║");
    println!("║  5. List services                        ║");
    println!("║  6. Book an appointment                  ║");
    println!("║  7. Doctor schedule                      ║");
    println!("║  8. Cancel / complete an appointment     ║");
    println!("║  9. Save all records                     ║");
    println!("║ 10. Report: top 3 doctors                ║");
    println!("║ 11. Report: revenue this month           ║");
    println!("║  0. Exit                                 ║");
    println!("╚══════════════════════════════════════════╝");
}

fn print_header(title: &str) {
    println!();
    println!("==============================");
    println!("{}", title);
    println!("==============================");
}

/// Read one trimmed line; None once input is exhausted
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn pause() -> Result<()> {
    println!();
    read_line("Press Enter to continue...")?;
    Ok(())
}

/// Read a 1-based selection into a 0-based index
fn pick_index(len: usize) -> Result<Option<usize>> {
    let Some(input) = read_line("Number: ")? else { return Ok(None) };
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Some(n - 1)),
        _ => {
            println!("Invalid selection.");
            Ok(None)
        }
    }
}

fn pick_patient(store: &RecordStore) -> Result<Option<Uuid>> {
    if store.patients.is_empty() {
        println!("No patients on file.");
        return Ok(None);
    }
    println!("Select a patient:");
    for (i, p) in store.patients.iter().enumerate() {
        println!("{}) {} | id={}", i + 1, p.full_name, p.id);
    }
    Ok(pick_index(store.patients.len())?.map(|i| store.patients[i].id))
}

fn pick_doctor(store: &RecordStore) -> Result<Option<Uuid>> {
    if store.doctors.is_empty() {
        println!("No doctors on file.");
        return Ok(None);
    }
    println!("Select a doctor:");
    for (i, d) in store.doctors.iter().enumerate() {
        println!("{}) {} ({}) | id={}", i + 1, d.full_name, d.department, d.id);
    }
    Ok(pick_index(store.doctors.len())?.map(|i| store.doctors[i].id))
}

fn pick_service(store: &RecordStore) -> Result<Option<Uuid>> {
    if store.services.is_empty() {
        println!("No services on file.");
        return Ok(None);
    }
    println!("Select a service:");
    for (i, s) in store.services.iter().enumerate() {
        println!(
            "{}) [{}] {} | cost={:.0} | {} min | id={}",
            i + 1,
            s.kind.tag(),
            s.name,
            s.cost(),
            s.duration_minutes,
            s.id
        );
    }
    Ok(pick_index(store.services.len())?.map(|i| store.services[i].id))
}

fn list_patients(store: &RecordStore) {
    print_header("Patients");
    for p in &store.patients {
        println!(
            "- {} | {} | {} | insurance: {} | id={}",
            p.full_name,
            p.phone,
            p.address,
            p.insurance_number.as_deref().unwrap_or("-"),
            p.id
        );
    }
}

fn list_doctors(store: &RecordStore) {
    print_header("Doctors");
    for d in &store.doctors {
        println!(
            "- {} | {} | {} | id={}",
            d.full_name, d.department, d.phone, d.id
        );
    }
}

fn list_services(store: &RecordStore) {
    print_header("Services");
    for s in &store.services {
        println!(
            "- [{}] {} | base={:.0} | cost={:.0} | {} min | id={}",
            s.kind.tag(),
            s.name,
            s.base_cost,
            s.cost(),
            s.duration_minutes,
            s.id
        );
    }
}

fn add_patient(store: &mut RecordStore) -> Result<()> {
    print_header("Add a patient");
    let Some(name) = read_line("Full name: ")? else { return Ok(()) };
    let Some(phone) = read_line("Phone: ")? else { return Ok(()) };
    let Some(address) = read_line("Address: ")? else { return Ok(()) };
    let Some(insurance) = read_line("Insurance number (blank if none): ")? else {
        return Ok(());
    };
    let insurance = if insurance.is_empty() { None } else { Some(insurance) };

    let patient = Patient::new(name.clone(), phone, address, insurance);
    println!(">> Added patient {}. id={}", name, patient.id);
    store.add_patient(patient);
    Ok(())
}

fn add_doctor(store: &mut RecordStore) -> Result<()> {
    print_header("Add a doctor");
    let Some(name) = read_line("Full name: ")? else { return Ok(()) };
    let Some(phone) = read_line("Phone: ")? else { return Ok(()) };
    let Some(address) = read_line("Address: ")? else { return Ok(()) };

    println!("Select a department:");
    for (i, department) in Department::ALL.iter().enumerate() {
        println!("{}) {}", i + 1, department);
    }
    let Some(index) = pick_index(Department::ALL.len())? else { return Ok(()) };

    let doctor = Doctor::new(name.clone(), phone, address, Department::ALL[index]);
    println!(">> Added doctor {}. id={}", name, doctor.id);
    store.add_doctor(doctor);
    Ok(())
}

fn book_appointment(store: &mut RecordStore) -> Result<()> {
    print_header("Book an appointment");
    let Some(patient_id) = pick_patient(store)? else { return Ok(()) };
    let Some(doctor_id) = pick_doctor(store)? else { return Ok(()) };
    let Some(service_id) = pick_service(store)? else { return Ok(()) };
    let Some(text) = read_line("Start time (yyyy-MM-dd HH:mm): ")? else { return Ok(()) };

    let start = match NaiveDateTime::parse_from_str(&text, DATE_TIME_FORMAT) {
        Ok(start) => start,
        Err(e) => {
            println!("!! Invalid date-time: {}", e);
            return Ok(());
        }
    };

    match book(store, patient_id, doctor_id, service_id, start) {
        Ok(appointment) => println!(">> Booked. Appointment id={}", appointment.id),
        Err(e) => println!("!! Cannot book: {}", e),
    }
    Ok(())
}

fn show_doctor_schedule(store: &RecordStore) -> Result<()> {
    print_header("Doctor schedule");
    let Some(doctor_id) = pick_doctor(store)? else { return Ok(()) };

    let schedule = appointments_by_doctor(store, doctor_id);
    if schedule.is_empty() {
        println!("No appointments.");
        return Ok(());
    }
    for a in schedule {
        println!(
            "- [{}] {} -> {} | {} | id={}",
            service_name(store, a.service_id),
            a.start.format(DATE_TIME_FORMAT),
            a.end.format(DATE_TIME_FORMAT),
            a.status,
            a.id
        );
    }
    Ok(())
}

fn update_appointment_status(store: &mut RecordStore, config: &Config) -> Result<()> {
    print_header("Cancel / complete an appointment");
    let shown: Vec<(Uuid, String)> = store
        .appointments
        .iter()
        .take(config.display.recent_limit)
        .map(|a| {
            (
                a.id,
                format!(
                    "[{}] {} -> {} | {} | id={}",
                    service_name(store, a.service_id),
                    a.start.format(DATE_TIME_FORMAT),
                    a.end.format(DATE_TIME_FORMAT),
                    a.status,
                    a.id
                ),
            )
        })
        .collect();

    if shown.is_empty() {
        println!("No appointments on file.");
        return Ok(());
    }
    for (i, (_, line)) in shown.iter().enumerate() {
        println!("{}) {}", i + 1, line);
    }
    let Some(index) = pick_index(shown.len())? else { return Ok(()) };
    let appointment_id = shown[index].0;

    let Some(action) = read_line("Action (C=cancel, D=done): ")? else { return Ok(()) };
    let result = match action.to_uppercase().as_str() {
        "C" => cancel(store, appointment_id).map(|_| "Cancelled."),
        "D" => complete(store, appointment_id).map(|_| "Completed."),
        _ => {
            println!("Unknown action.");
            return Ok(());
        }
    };
    match result {
        Ok(message) => println!(">> {}", message),
        Err(e) => println!("!! {}", e),
    }
    Ok(())
}

fn report_top_doctors(store: &RecordStore) {
    print_header("Top 3 doctors by appointments");
    let ranked = reports::top_doctors_by_appointments(store, 3);
    if ranked.is_empty() {
        println!("No appointments on file.");
        return;
    }
    for (doctor_id, count) in ranked {
        match store.doctor(doctor_id) {
            Some(d) => println!("- {} ({}): {} appointments", d.full_name, d.department, count),
            None => println!("- {}: {} appointments", doctor_id, count),
        }
    }
}

fn report_monthly_revenue(store: &RecordStore) {
    print_header("Revenue this month");
    let now = Local::now();
    let revenue = reports::monthly_revenue(store, now.year(), now.month());
    println!(">> {}-{:02}: {:.0} VND", now.year(), now.month(), revenue);
}

fn service_name(store: &RecordStore, service_id: Uuid) -> String {
    store
        .service(service_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| service_id.to_string())
}
