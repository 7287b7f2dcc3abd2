use clap::{Parser, ValueEnum};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn, LevelFilter};
use std::path::PathBuf;

use schg::config::Config;
use schg::config_loader;
use schg::loader::{Dialect, LoadedNetwork};
use schg::report::{NetworkReport, ToggleOutcome};

/// Switching safety validator for reconfigurable distribution networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a session configuration YAML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network definition file; overrides the one named in the configuration
    #[arg(short, long)]
    network: Option<PathBuf>,

    /// Definition dialect; guessed from the file extension when omitted
    #[arg(short, long, value_enum)]
    dialect: Option<Dialect>,

    /// Switch to toggle, applied in order after the configured operations
    #[arg(short, long = "toggle", value_name = "NAME")]
    toggles: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Everything a run needs, merged from the configuration file and the CLI
#[derive(Debug)]
struct Session {
    network: PathBuf,
    dialect: Option<Dialect>,
    toggles: Vec<String>,
    continue_on_rejection: bool,
}

impl Session {
    fn from_args(args: &Args, config: Option<&Config>) -> Result<Self> {
        let network = match (&args.network, config) {
            (Some(path), _) => path.clone(),
            (None, Some(config)) => config.network.path.clone(),
            (None, None) => bail!("No network definition given; use --network or --config"),
        };

        let dialect = args
            .dialect
            .or_else(|| config.and_then(|c| c.network.dialect));

        let mut toggles: Vec<String> = config
            .map(|c| {
                c.operations
                    .iter()
                    .map(|op| op.switch_name().to_string())
                    .collect()
            })
            .unwrap_or_default();
        toggles.extend(args.toggles.iter().cloned());

        Ok(Self {
            network,
            dialect,
            toggles,
            continue_on_rejection: config.map_or(true, |c| c.continue_on_rejection),
        })
    }
}

/// Log level named by the configuration, if any
fn configured_level(config: Option<&Config>) -> Result<Option<LevelFilter>> {
    match config.and_then(|c| c.general.log_level.as_deref()) {
        Some(level) => Ok(Some(
            level
                .parse()
                .wrap_err_with(|| format!("Invalid log_level '{}'", level))?,
        )),
        None => Ok(None),
    }
}

/// A rejection fails the run only when the session stops on rejections
fn should_fail(report: &NetworkReport, continue_on_rejection: bool) -> bool {
    !continue_on_rejection && report.has_rejections()
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // RUST_LOG wins; otherwise everything is let through the logger and the
    // level is governed by the global max level.
    let env_filter = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or("trace")).init();
    if !env_filter {
        log::set_max_level(LevelFilter::Info);
    }

    let config = match &args.config {
        Some(path) => {
            info!("Configuration file: {:?}", path);
            Some(config_loader::load_config(path)?)
        }
        None => None,
    };

    if !env_filter {
        if let Some(level) = configured_level(config.as_ref())? {
            log::set_max_level(level);
        }
    }

    let session = Session::from_args(&args, config.as_ref())?;
    info!("Network definition: {:?}", session.network);

    let mut loaded = LoadedNetwork::from_file(&session.network, session.dialect)
        .wrap_err_with(|| format!("Failed to load network '{}'", session.network.display()))?;

    let mut outcomes = Vec::new();
    for name in &session.toggles {
        let outcome = ToggleOutcome::from_result(name, loaded.toggle(name));
        let accepted = outcome.accepted;
        outcomes.push(outcome);

        if !accepted && !session.continue_on_rejection {
            warn!("Stopping after rejected toggle of {}", name);
            break;
        }
    }

    let report = NetworkReport::new(&loaded, outcomes);
    match args.format {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if should_fail(&report, session.continue_on_rejection) {
        bail!("A toggle was rejected and continue_on_rejection is false");
    }

    info!("Switching session completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schg::config::Operation;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(&["schg", "--network", "master.dss"]);

        assert_eq!(args.network, Some(PathBuf::from("master.dss")));
        assert!(args.config.is_none());
        assert!(args.toggles.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_repeated_toggles() {
        let args = Args::parse_from(&[
            "schg",
            "--network", "feeder.txt",
            "--dialect", "plain",
            "--toggle", "sw1",
            "-t", "sw2",
            "--format", "json",
        ]);

        assert_eq!(args.dialect, Some(Dialect::Plain));
        assert_eq!(args.toggles, vec!["sw1", "sw2"]);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_session_merges_config_and_cli() {
        let config: Config = serde_yaml::from_str(
            r#"
network:
  path: /data/master.dss
operations:
  - toggle: a
continue_on_rejection: false
"#,
        )
        .unwrap();
        let args = Args::parse_from(&["schg", "--config", "session.yaml", "--toggle", "b"]);

        let session = Session::from_args(&args, Some(&config)).unwrap();
        assert_eq!(session.network, PathBuf::from("/data/master.dss"));
        assert_eq!(session.toggles, vec!["a", "b"]);
        assert!(!session.continue_on_rejection);
        assert_eq!(config.operations[0], Operation::Toggle("a".to_string()));
    }

    #[test]
    fn test_configured_level() {
        let config: Config = serde_yaml::from_str(
            r#"
general:
  log_level: Debug
network:
  path: master.dss
"#,
        )
        .unwrap();

        assert_eq!(configured_level(Some(&config)).unwrap(), Some(LevelFilter::Debug));
        assert_eq!(configured_level(None).unwrap(), None);
    }

    #[test]
    fn test_rejection_fails_only_when_stopping() {
        let commands: Vec<String> = ["sub onload on substation blade", "blade offload on"]
            .iter()
            .map(|line| line.to_string())
            .collect();
        let mut loaded = LoadedNetwork::from_commands(&commands, Dialect::Plain).unwrap();
        let outcome = ToggleOutcome::from_result("blade", loaded.toggle("blade"));
        let report = NetworkReport::new(&loaded, vec![outcome]);

        assert!(should_fail(&report, false));
        assert!(!should_fail(&report, true));

        let clean = NetworkReport::new(&loaded, Vec::new());
        assert!(!should_fail(&clean, false));
    }

    #[test]
    fn test_session_requires_a_network() {
        let args = Args::parse_from(&["schg", "--toggle", "a"]);
        assert!(Session::from_args(&args, None).is_err());
    }
}
