use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use dashboard_client::{BasicAuth, NoAuth, PatientClient};
use dashboard_core::{DashboardConfig, DashboardView, DetailView, PatientSnapshot};
use dashboard_records::{dashboard_for, detail_for, load_collection_str, patient_list};

#[derive(Parser, Debug)]
#[command(
    name = "dashboard-cli",
    about = "Print the patient dashboard from a JSON file or the patient endpoint."
)]
struct Args {
    /// Read the patient collection from a JSON file instead of the endpoint.
    #[arg(short, long, conflicts_with = "endpoint")]
    input: Option<PathBuf>,

    /// Patient endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long, env = "DASHBOARD_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "DASHBOARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Show the detail screen of this patient (id or name).
    #[arg(short, long)]
    patient: Option<String>,

    /// Number of months in the blood-pressure chart.
    #[arg(long)]
    window: Option<usize>,

    /// JSON file with dashboard settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the assembled view as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let snapshot = load_snapshot(&args, &config).await?;

    log::info!(
        "Loaded {} patients ({} malformed records dropped)",
        snapshot.patients().len(),
        snapshot.dropped
    );

    match &args.patient {
        Some(id) => {
            let view = detail_for(&snapshot, id, &config)
                .with_context(|| format!("Cannot show patient {id:?}"))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_detail(&view);
            }
        }
        None => {
            let view = dashboard_for(&snapshot, &config).context("Cannot build the dashboard")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_patients(&snapshot, &config);
                print_dashboard(&view);
            }
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read config file {path:?}"))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Invalid config file {path:?}"))?
        }
        None => DashboardConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(window) = args.window {
        config.history_window = window;
    }
    Ok(config)
}

async fn load_snapshot(args: &Args, config: &DashboardConfig) -> anyhow::Result<PatientSnapshot> {
    if let Some(path) = &args.input {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read file {path:?}"))?;
        return Ok(load_collection_str(&data, config)?);
    }

    let snapshot = match (&args.username, &args.password) {
        (Some(username), Some(password)) => {
            PatientClient::new(config.endpoint.clone(), BasicAuth::new(username, password))
                .fetch_snapshot(config)
                .await?
        }
        (None, None) => {
            PatientClient::new(config.endpoint.clone(), NoAuth)
                .fetch_snapshot(config)
                .await?
        }
        _ => bail!("--username and --password must be given together"),
    };
    Ok(snapshot)
}

fn print_patients(snapshot: &PatientSnapshot, config: &DashboardConfig) {
    println!("Patients:");
    for patient in patient_list(snapshot, config) {
        println!("  {} ({})", patient.name, patient.subtitle);
    }
    println!();
}

fn print_dashboard(view: &DashboardView) {
    println!("{}", view.patient.name);
    for field in &view.profile {
        println!("  {}: {}", field.label, field.value);
    }

    println!("\nBlood pressure:");
    if view.blood_pressure.has_data() {
        for point in &view.blood_pressure.points {
            println!(
                "  {:<10} {:>6} / {:<6}",
                point.label,
                format_value(point.systolic),
                format_value(point.diastolic)
            );
        }
    } else {
        println!("  No blood pressure data available");
    }

    println!("\nVitals:");
    for card in &view.vitals {
        println!("  {:<18} {:<10} {}", card.title, card.value, card.level);
    }

    println!("\nDiagnostics:");
    if view.diagnostics.is_empty() {
        println!("  none");
    }
    for row in &view.diagnostics {
        println!("  [{}] {} - {}", row.style.as_str(), row.name, row.status);
    }

    println!("\nLab results:");
    if view.lab_results.is_empty() {
        println!("  No lab results available");
    }
    for row in &view.lab_results {
        println!("  {}", row.name);
    }
}

fn print_detail(view: &DetailView) {
    let record = &view.record;
    println!(
        "{}\n  Date of Birth: {}\n  Gender: {}\n  Age: {}\n  Contact: {}\n  Emergency Contact: {}\n  Insurance: {}",
        view.display_name,
        record.date_of_birth,
        record.gender,
        record.age,
        record.phone_number,
        record.emergency_contact,
        record.insurance_type
    );
    println!(
        "History entries: {} ({} not charted)",
        record.diagnosis_history.len(),
        view.blood_pressure.skipped.len()
    );
    println!("Lab results: {}", view.lab_results.len());
    println!("Diagnostics: {}", view.diagnostics.len());
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |value| format!("{value:.0}"))
}
