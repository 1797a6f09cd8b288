use mission_planner::api::{formatter_for, MissionPlanner, OutputFormat};
use mission_planner::utils::config::PlanningConfig;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: mission-planner <payload.json> [--row-spacing <m>] [--config <file>] [--format json|waypoints] [--no-header]
   or: mission-planner --print-default-config";

/// Parsed command line
#[derive(Debug)]
struct CliArgs {
    payload_path: String,
    row_spacing: Option<f64>,
    config_path: Option<String>,
    format: OutputFormat,
    include_header: bool,
}

enum Command {
    Plan(CliArgs),
    PrintDefaultConfig,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    if args.len() == 1 && args[0] == "--print-default-config" {
        return Ok(Command::PrintDefaultConfig);
    }

    let mut payload_path = None;
    let mut row_spacing = None;
    let mut config_path = None;
    let mut format = OutputFormat::Json;
    let mut include_header = true;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--row-spacing" => {
                let value = iter.next().ok_or("--row-spacing needs a value")?;
                let meters = value
                    .parse::<f64>()
                    .map_err(|_| format!("invalid row spacing '{}'", value))?;
                row_spacing = Some(meters);
            }
            "--config" => {
                config_path = Some(iter.next().ok_or("--config needs a file")?.clone());
            }
            "--format" => {
                let value = iter.next().ok_or("--format needs a value")?;
                format = value.parse().map_err(|e| format!("{}", e))?;
            }
            "--no-header" => include_header = false,
            flag if flag.starts_with("--") => return Err(format!("unknown option '{}'", flag)),
            path => {
                if payload_path.replace(path.to_string()).is_some() {
                    return Err("only one payload file may be given".to_string());
                }
            }
        }
    }

    let payload_path = payload_path.ok_or("missing payload file")?;
    Ok(Command::Plan(CliArgs {
        payload_path,
        row_spacing,
        config_path,
        format,
        include_header,
    }))
}

fn run(args: CliArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = match &args.config_path {
        Some(path) => PlanningConfig::from_file(path)?,
        None => PlanningConfig::default(),
    };
    let planner = MissionPlanner::new(config)?;

    let body = std::fs::read_to_string(&args.payload_path)
        .map_err(|e| format!("failed to read '{}': {}", args.payload_path, e))?;
    let mission = planner.plan_payload(&body, args.row_spacing)?;

    Ok(formatter_for(args.format, args.include_header).format(&mission)?)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match command {
        Command::PrintDefaultConfig => match PlanningConfig::default().to_json_string() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "failed to serialize default config");
                ExitCode::FAILURE
            }
        },
        Command::Plan(args) => match run(args) {
            Ok(output) => {
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "mission planning failed");
                ExitCode::FAILURE
            }
        },
    }
}
