// Argentine DNI reader command line
use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use dni_reader::{
    capture::{
        display::birth_date_note, CaptureController, ConsoleDisplay, ReplayCamera, ReplayDecoder,
        ReplaySession, ScanOutcome,
    },
    config::LayoutSetting,
    models::{DniRecord, FieldLayout, SymbolFormat},
    submission::render_json,
    DniError, DniReader, ScannerConfig,
};
use log::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "dni-reader", version, about = "Reads Argentine DNI QR/PDF417 payloads")]
struct Cli {
    /// JSON scanner configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Field layout preset (standard, tramite, compact)
    #[arg(long, global = true)]
    layout: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a decoded payload ("-" reads stdin)
    Parse {
        payload: String,
        #[arg(long, default_value = "qr")]
        format: String,
        #[arg(long)]
        json: bool,
    },
    /// Run a capture session replayed from a file
    Scan {
        session: PathBuf,
        /// Behave as if no camera were attached
        #[arg(long)]
        no_camera: bool,
        /// Deliver events at the configured frame rate
        #[arg(long)]
        paced: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print the pre-filled form URL for a payload
    SubmitUrl {
        payload: String,
        #[arg(long, default_value = "qr")]
        format: String,
    },
    /// Print the built-in field layouts
    Layouts,
}

fn load_config(cli: &Cli) -> Result<ScannerConfig, DniError> {
    let mut config = match &cli.config {
        Some(path) => ScannerConfig::load(path)?,
        None => ScannerConfig::default(),
    };
    if let Some(name) = &cli.layout {
        config.layout = LayoutSetting::Preset(name.clone());
        config.validate()?;
    }
    Ok(config)
}

fn read_payload(arg: &str) -> Result<String, DniError> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

fn print_record(record: &DniRecord, json: bool) -> Result<(), DniError> {
    if json {
        println!("{}", render_json(record)?);
        return Ok(());
    }
    println!("DNI ({}, {:?})", record.format, record.source);
    println!("  Surname:         {}", record.surname);
    println!("  Given name:      {}", record.given_name);
    println!("  Document number: {}", record.document_number);
    println!("  Nationality:     {}", record.nationality);
    match birth_date_note(record) {
        Some(note) => println!("  Date of birth:   {} ({})", record.birth_date, note),
        None => println!("  Date of birth:   {}", record.birth_date),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), DniError> {
    let config = load_config(&cli)?;
    debug!("Using configuration: {:?}", config);

    match cli.command {
        Command::Parse {
            payload,
            format,
            json,
        } => {
            let reader = DniReader::from_config(&config)?;
            let raw = read_payload(&payload)?;
            match reader.read(&raw, &SymbolFormat::from(format.as_str())) {
                Ok(record) => print_record(&record, json),
                Err(err) => {
                    for issue in reader.inspect(&raw).issues {
                        eprintln!("  - [{:?}] {}", issue.issue_type, issue.message);
                    }
                    Err(err)
                }
            }
        }
        Command::Scan {
            session,
            no_camera,
            paced,
            json,
        } => {
            let session = ReplaySession::load(&session)?;
            let camera = if no_camera {
                ReplayCamera::without_devices()
            } else {
                ReplayCamera::new()
            };
            let mut controller = CaptureController::new(
                camera,
                ReplayDecoder::new(session).paced(paced),
                ConsoleDisplay::new(),
                &config,
            )?;

            let stop = controller.stop_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    stop.stop();
                }
            });

            match controller.scan().await? {
                ScanOutcome::Record(record) => {
                    if json {
                        println!("{}", render_json(&record)?);
                    }
                    if controller.display().state().submit_enabled {
                        match controller.submission_url() {
                            Ok(url) => println!("Form: {}", url),
                            Err(err) => eprintln!("Form not available: {}", err),
                        }
                    }
                    Ok(())
                }
                ScanOutcome::Rejected(err) => Err(err.into()),
                ScanOutcome::Stopped => Ok(()),
            }
        }
        Command::SubmitUrl { payload, format } => {
            let reader = DniReader::from_config(&config)?;
            let raw = read_payload(&payload)?;
            let record = reader.read(&raw, &SymbolFormat::from(format.as_str()))?;
            println!("{}", reader.submission_url(&record)?);
            Ok(())
        }
        Command::Layouts => {
            println!("{}", serde_json::to_string_pretty(&FieldLayout::presets())?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(cli).await {
        error!("{}", err);
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
