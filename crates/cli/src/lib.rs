use anyhow::{Context, Result};
use cephalo_core::table::{self, TableExportConfig};
use cephalo_core::{
    clinical_summary, load_record, save_record, Analysis, CalibrationOutcome, ClickOutcome,
    LandmarkGroup, LandmarkKey, Locale, MeasurementSheet, MetricResult, PatientInfo, Point,
    Preferences, Sex, TracingRecord, TracingSession, REGISTRY,
};
use cephalo_storage::Storage;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "cephalo-cli")]
#[command(about = "Cephalometric measurements from landmark tracings")]
pub struct Cli {
    /// Directory holding preferences.json.
    #[arg(long, global = true, env = "CEPHALO_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,
    /// Language for interpretations and the clinical summary (en, es).
    #[arg(long, global = true, value_name = "LOCALE")]
    locale: Option<Locale>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the measurement table for a tracing.
    Measure {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Emit machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Write the measurement table as delimited text.
    ExportCsv {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        #[arg(long)]
        no_headers: bool,
    },
    /// Print the clinical summary paragraph.
    Summary {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Patient sex (F or M).
        #[arg(long)]
        sex: Option<Sex>,
        /// Patient age in years.
        #[arg(long)]
        age: Option<u32>,
    },
    /// Place or move a landmark, creating the tracing if needed.
    Place {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "KEY")]
        key: LandmarkKey,
        #[arg(value_name = "X", allow_negative_numbers = true)]
        x: f64,
        #[arg(value_name = "Y", allow_negative_numbers = true)]
        y: f64,
    },
    /// Calibrate a tracing from two reference points.
    Calibrate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,
        #[arg(long, value_name = "X,Y", value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
        /// Known length of the reference segment; defaults to the configured value.
        #[arg(long)]
        length_mm: Option<f64>,
    },
    /// List every landmark in placement order.
    Landmarks,
    /// Inspect or create the preferences file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective preferences as JSON.
    Show,
    /// Write default preferences if none exist.
    Init,
}

#[derive(Debug, Serialize)]
struct MeasureOutput<'a> {
    mm_per_pixel: Option<f64>,
    scale: String,
    metrics: Vec<&'a MetricResult>,
    summary: String,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match &cli.command {
        Commands::Measure { file, json } => run_measure(&cli, file, *json),
        Commands::ExportCsv { file, output, delimiter, no_headers } => {
            run_export_csv(&cli, file, output.as_deref(), *delimiter, *no_headers)
        }
        Commands::Summary { file, sex, age } => {
            run_summary(&cli, file, PatientInfo { sex: *sex, age_years: *age })
        }
        Commands::Place { file, key, x, y } => run_place(file, *key, Point::new(*x, *y)),
        Commands::Calibrate { file, from, to, length_mm } => {
            run_calibrate(&cli, file, *from, *to, *length_mm)
        }
        Commands::Landmarks => run_landmarks(),
        Commands::Config { command: ConfigCommand::Show } => run_config_show(&cli),
        Commands::Config { command: ConfigCommand::Init } => run_config_init(&cli),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_measure(cli: &Cli, file: &Path, json: bool) -> Result<()> {
    let prefs = load_preferences(cli)?;
    let locale = cli.locale.unwrap_or(prefs.locale);
    let sheet = measure(file, &prefs)?;

    if json {
        let payload = MeasureOutput {
            mm_per_pixel: sheet.mm_per_pixel(),
            scale: sheet.scale_label(),
            metrics: sheet.iter().filter(|m| prefs.analyses.includes(m.analysis)).collect(),
            summary: clinical_summary(&sheet, &PatientInfo::default(), locale),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let rows = table::build_rows(&sheet, &prefs.analyses, locale);
    println!("{}", sheet.scale_label());
    print!("{}", table::render_text(&rows));
    Ok(())
}

fn run_export_csv(
    cli: &Cli,
    file: &Path,
    output: Option<&Path>,
    delimiter: char,
    no_headers: bool,
) -> Result<()> {
    if !delimiter.is_ascii() {
        anyhow::bail!("--delimiter must be a single ASCII character");
    }

    let prefs = load_preferences(cli)?;
    let locale = cli.locale.unwrap_or(prefs.locale);
    let sheet = measure(file, &prefs)?;
    let rows = table::build_rows(&sheet, &prefs.analyses, locale);
    let config = TableExportConfig { include_headers: !no_headers, delimiter: delimiter as u8 };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let out = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            table::export_csv(out, &rows, &config).context("failed to write CSV")?;
            println!("{}", path.display());
        }
        None => {
            let stdout = io::stdout();
            table::export_csv(stdout.lock(), &rows, &config).context("failed to write CSV")?;
        }
    }
    Ok(())
}

fn run_summary(cli: &Cli, file: &Path, patient: PatientInfo) -> Result<()> {
    let prefs = load_preferences(cli)?;
    let locale = cli.locale.unwrap_or(prefs.locale);
    let sheet = measure(file, &prefs)?;
    println!("{}", clinical_summary(&sheet, &patient, locale));
    Ok(())
}

fn run_place(file: &Path, key: LandmarkKey, point: Point) -> Result<()> {
    if !point.is_finite() {
        anyhow::bail!("coordinates must be finite numbers");
    }

    let mut session = open_or_new(file, TracingSession::default())?;
    session.set_active_key(key);
    let ClickOutcome::Placed { key, next } = session.click(point) else {
        anyhow::bail!("tracing is in calibration mode");
    };

    save_record(file, &session.to_record())
        .with_context(|| format!("failed to write tracing {}", file.display()))?;

    println!("placed {key} at ({}, {})", point.x, point.y);
    if next != key {
        println!("next: {next} ({})", next.label());
    }
    Ok(())
}

fn run_calibrate(
    cli: &Cli,
    file: &Path,
    from: Point,
    to: Point,
    length_mm: Option<f64>,
) -> Result<()> {
    let prefs = load_preferences(cli)?;
    let mut session = open_or_new(file, TracingSession::new(prefs.reference_length_mm))?;

    session.begin_calibration();
    if let Some(mm) = length_mm {
        session.set_reference_length(mm);
    }
    session.record_calibration_click(from);
    match session.record_calibration_click(to) {
        CalibrationOutcome::Calibrated { .. } => {}
        CalibrationOutcome::Rejected(reason) => anyhow::bail!("calibration failed: {reason}"),
        outcome => anyhow::bail!("calibration did not complete: {outcome:?}"),
    }

    save_record(file, &session.to_record())
        .with_context(|| format!("failed to write tracing {}", file.display()))?;
    println!("{}", session.calibration().scale_label());
    Ok(())
}

fn run_landmarks() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for info in REGISTRY.iter() {
        writeln!(stdout, "{:<4} {:<24} {}", info.code, info.label, group_label(info.group))?;
    }
    Ok(())
}

fn run_config_show(cli: &Cli) -> Result<()> {
    let prefs = load_preferences(cli)?;
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(())
}

fn run_config_init(cli: &Cli) -> Result<()> {
    let storage = storage(cli)
        .context("unable to resolve a configuration directory; pass --config-dir")?;
    let path = storage.preferences_path();
    if storage.init_preferences().context("failed to write preferences")? {
        println!("created {}", path.display());
    } else {
        println!("exists {}", path.display());
    }
    Ok(())
}

fn group_label(group: LandmarkGroup) -> &'static str {
    match group {
        LandmarkGroup::Skeletal => "skeletal",
        LandmarkGroup::Dental => "dental",
        LandmarkGroup::SoftTissue => "soft tissue",
    }
}

fn storage(cli: &Cli) -> Option<Storage> {
    match &cli.config_dir {
        Some(dir) => Some(Storage::with_root(dir)),
        None => Storage::from_default_project().ok(),
    }
}

fn load_preferences(cli: &Cli) -> Result<Preferences> {
    let Some(storage) = storage(cli) else {
        tracing::debug!("no configuration directory, using default preferences");
        return Ok(Preferences::default());
    };
    storage.load_preferences().with_context(|| {
        format!("failed to load preferences from {}", storage.preferences_path().display())
    })
}

fn measure(file: &Path, prefs: &Preferences) -> Result<MeasurementSheet> {
    let session = TracingSession::from_record(read_tracing(file)?, prefs.reference_length_mm)
        .with_context(|| format!("failed to read tracing {}", file.display()))?;
    let sheet = session.measure(&prefs.norms);

    let skipped: Vec<&str> = Analysis::ALL
        .iter()
        .filter(|a| !prefs.analyses.includes(**a))
        .map(|a| a.title())
        .collect();
    if !skipped.is_empty() {
        tracing::info!(?skipped, "analyses disabled by preferences");
    }
    Ok(sheet)
}

fn read_tracing(file: &Path) -> Result<TracingRecord> {
    ensure_file_exists(file)?;
    load_record(file).with_context(|| format!("failed to read tracing {}", file.display()))
}

fn open_or_new(file: &Path, empty: TracingSession) -> Result<TracingSession> {
    if !file.exists() {
        tracing::debug!(path = %file.display(), "starting a new tracing");
        return Ok(empty);
    }
    let mut session = empty;
    session
        .import_record(read_tracing(file)?)
        .with_context(|| format!("failed to read tracing {}", file.display()))?;
    Ok(session)
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}

fn parse_point(value: &str) -> std::result::Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{value}`"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("`{}` is not a finite number", s.trim()))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}
