use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mb_control::MotorController;
use mb_model::{ModelError, MotorProfile};
use mb_results::{ReportStore, ResultsError, RunStatus};
use mb_sequence::{EngineError, RunProgress, SequenceRunner, load_sequence};

#[derive(Parser)]
#[command(name = "mb-cli")]
#[command(about = "Motorbench CLI - virtual motor test bench", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a test sequence file
    Validate {
        /// Path to the sequence YAML file
        sequence_path: PathBuf,
    },
    /// Execute a test sequence against a simulated motor
    Run {
        /// Path to the sequence YAML file
        sequence_path: PathBuf,
        /// Directory to store the run report in
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
        /// Rated motor speed (RPM)
        #[arg(long, default_value_t = 3000.0)]
        rated_speed: f64,
        /// Thermal trip temperature (Celsius)
        #[arg(long, default_value_t = 150.0)]
        max_temp: f64,
        /// Rotational inertia scale factor
        #[arg(long, default_value_t = 10.0)]
        inertia: f64,
        /// Thermal resistance scale factor
        #[arg(long, default_value_t = 10.0)]
        thermal_resistance: f64,
    },
    /// List stored run reports
    Reports {
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
    },
    /// Show one stored run report
    ShowReport {
        /// Report filename as printed by `reports`
        filename: String,
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum BenchError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type BenchResult<T> = Result<T, BenchError>;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Validate { sequence_path } => cmd_validate(&sequence_path),
        Commands::Run {
            sequence_path,
            reports_dir,
            rated_speed,
            max_temp,
            inertia,
            thermal_resistance,
        } => cmd_run(
            &sequence_path,
            &reports_dir,
            rated_speed,
            max_temp,
            inertia,
            thermal_resistance,
        ),
        Commands::Reports { reports_dir } => cmd_reports(&reports_dir).map(|()| RunStatus::Pass),
        Commands::ShowReport {
            filename,
            reports_dir,
        } => cmd_show_report(&reports_dir, &filename).map(|()| RunStatus::Pass),
    };

    match outcome {
        Ok(RunStatus::Pass) => ExitCode::SUCCESS,
        Ok(status) => {
            eprintln!("Run finished with status {status}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(sequence_path: &Path) -> BenchResult<RunStatus> {
    let def = load_sequence(sequence_path)?;
    println!(
        "OK: \"{}\" ({} steps)",
        def.test_info.name,
        def.sequence.len()
    );
    Ok(RunStatus::Pass)
}

fn cmd_run(
    sequence_path: &Path,
    reports_dir: &Path,
    rated_speed: f64,
    max_temp: f64,
    inertia: f64,
    thermal_resistance: f64,
) -> BenchResult<RunStatus> {
    let def = load_sequence(sequence_path)?;
    let profile = MotorProfile::new(rated_speed, max_temp, inertia, thermal_resistance)?;
    let store = ReportStore::new(reports_dir)?;

    let mut controller = MotorController::new(profile);
    controller.spawn_loop();

    let total = def.sequence.len();
    let runner = SequenceRunner::new(&controller);
    let record = runner.run(
        &def,
        Some(&mut |p: RunProgress| {
            println!("[{}/{}] {}", p.index + 1, total, p.description);
        }),
    );

    controller.shutdown();

    let filename = store.save(&record)?;
    println!();
    println!("Test:     {}", record.test_info.name);
    println!("Status:   {}", record.summary.overall_result);
    println!(
        "Steps:    {} passed, {} failed",
        record.summary.passed_steps, record.summary.failed_steps
    );
    if let Some(reason) = &record.summary.failure_reason {
        println!("Reason:   {reason}");
    }
    println!(
        "Metrics:  max temp {:.2} C, avg speed {:.2} RPM, duration {:.2} s",
        record.metrics.max_temperature_c,
        record.metrics.avg_speed_rpm,
        record.metrics.test_duration_s
    );
    println!("Report:   {}", store.root_dir().join(filename).display());

    Ok(record.summary.overall_result)
}

fn cmd_reports(reports_dir: &Path) -> BenchResult<()> {
    let store = ReportStore::new(reports_dir)?;
    let filenames = store.list()?;
    if filenames.is_empty() {
        println!("No reports in {}", reports_dir.display());
        return Ok(());
    }
    for filename in filenames {
        let record = store.load(&filename)?;
        println!(
            "{}  {:>7}  {}",
            filename,
            record.summary.overall_result.to_string(),
            record.test_info.name
        );
    }
    Ok(())
}

fn cmd_show_report(reports_dir: &Path, filename: &str) -> BenchResult<()> {
    let store = ReportStore::new(reports_dir)?;
    let record = store.load(filename)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
