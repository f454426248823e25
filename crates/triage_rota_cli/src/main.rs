//! `triage-rota` command-line entry point.
//!
//! # Responsibility
//! - Parse the command surface (`update`, `reset`, `publish`, `status`,
//!   `preview`) and dispatch to core services.
//! - Own process-level concerns: config discovery, logging init, exit codes.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use triage_rota_core::config::LOG_ENV_VAR;
use triage_rota_core::{
    default_log_level, flush_logging, init_logging, publish_output, CommandPublisher, ConfigError,
    RotaConfig, RotaService, RotaServiceError, RotationFallback,
};

const DEFAULT_PREVIEW_COUNT: u16 = 6;

#[derive(Parser, Debug)]
#[command(name = "triage-rota")]
#[command(version)]
#[command(about = "Weekly triage duty rotation with a published calendar")]
#[command(propagate_version = true)]
struct Args {
    /// Path to the YAML config file (default: $TRIAGE_ROTA_CONFIG or ./triage-rota.yaml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = LOG_ENV_VAR)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr only when omitted)
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today instead of the local date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assign the next cycle and regenerate the calendar
    Update,

    /// Clear history and snapshot and write an empty calendar
    Reset,

    /// Push the output directory to the static host
    Publish,

    /// Show the current and next assignment
    Status,

    /// List upcoming assignments without recording them
    Preview {
        /// Number of cycles to show (1-65535)
        #[arg(
            long,
            short = 'n',
            default_value_t = DEFAULT_PREVIEW_COUNT,
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        count: u16,
    },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Service(RotaServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RotaServiceError> for CliError {
    fn from(value: RotaServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, args.log_dir.as_deref()) {
        eprintln!("triage-rota: {err}");
        return ExitCode::FAILURE;
    }

    let code = match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=cli_run module=cli status=error command={} error={}",
                command_name(&args.command),
                err
            );
            eprintln!("triage-rota: {err}");
            ExitCode::FAILURE
        }
    };

    flush_logging();
    code
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = RotaConfig::load(args.config.as_deref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    info!(
        "event=cli_run module=cli status=start command={} roster_size={}",
        command_name(&args.command),
        config.roster.len()
    );

    let service = RotaService::from_config(&config);
    match &args.command {
        Commands::Update => {
            let outcome = service.update(today)?;
            if let Some(fallback @ RotationFallback::UnknownPerson(_)) = &outcome.fallback {
                eprintln!("triage-rota: warning: {fallback}");
            }
            println!(
                "{}: {} (cycle #{})",
                outcome.cycle.start, outcome.cycle.person, outcome.total_cycles
            );
        }
        Commands::Reset => {
            service.reset()?;
            println!("rota reset; {} rewritten", service.paths().calendar.display());
        }
        Commands::Publish => {
            let publisher = CommandPublisher::from_settings(&config.publish);
            let report = publish_output(&publisher, &service.paths().output_dir);
            match report.message {
                None => println!("published {}", service.paths().output_dir.display()),
                Some(message) => eprintln!("triage-rota: publish failed: {message}"),
            }
        }
        Commands::Status => {
            let status = service.status(today)?;
            match &status.current {
                Some(cycle) => println!(
                    "current: {} ({} to {})",
                    cycle.person,
                    cycle.start,
                    cycle.last_day()
                ),
                None => println!("current: nobody assigned for {today}"),
            }
            if let Some(latest) = &status.latest {
                println!("latest:  {} from {}", latest.person, latest.start);
            }
            println!("cycles:  {}", status.total_cycles);
            println!(
                "next:    {} from {}",
                status.next.cycle.person, status.next.cycle.start
            );
        }
        Commands::Preview { count } => {
            for plan in service.preview(today, usize::from(*count))? {
                println!("{}  {}", plan.cycle.start, plan.cycle.person);
            }
        }
    }

    Ok(())
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Update => "update",
        Commands::Reset => "reset",
        Commands::Publish => "publish",
        Commands::Status => "status",
        Commands::Preview { .. } => "preview",
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::try_parse_from([
            "triage-rota",
            "update",
            "--config",
            "rota.yaml",
            "--today",
            "2026-10-21",
        ])
        .unwrap();
        assert!(matches!(args.command, Commands::Update));
        assert_eq!(args.config.unwrap().to_str(), Some("rota.yaml"));
        assert_eq!(args.today.unwrap().to_string(), "2026-10-21");
    }

    #[test]
    fn preview_count_defaults_and_overrides() {
        let args = Args::try_parse_from(["triage-rota", "preview"]).unwrap();
        assert!(matches!(args.command, Commands::Preview { count: 6 }));

        let args = Args::try_parse_from(["triage-rota", "preview", "-n", "2"]).unwrap();
        assert!(matches!(args.command, Commands::Preview { count: 2 }));
    }

    #[test]
    fn preview_count_is_bounded() {
        for count in ["0", "65536", "18446744073709551615", "-1"] {
            assert!(
                Args::try_parse_from(["triage-rota", "preview", "-n", count]).is_err(),
                "count {count} should be rejected"
            );
        }
        let args = Args::try_parse_from(["triage-rota", "preview", "-n", "65535"]).unwrap();
        assert!(matches!(args.command, Commands::Preview { count: 65535 }));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Args::try_parse_from(["triage-rota", "rotate"]).is_err());
    }
}
