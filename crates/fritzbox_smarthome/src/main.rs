use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

use fritzbox_smarthome::agent::command_arguments;
use fritzbox_smarthome::config::LoggingConfig;
use fritzbox_smarthome::format_diagnostics;
use fritzbox_smarthome::Config;
use fritzbox_smarthome::Section;
use fritzbox_smarthome::State;

#[derive(Debug, Parser)]
#[command(version, about = "Fritz!Box smarthome device discovery and checks")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one discovered service item per line
    Discover {
        /// Agent output to read, `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,

        #[arg(long)]
        json: bool,
    },

    /// Check services and exit with the worst state
    Check {
        /// Agent output to read, `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,

        /// Service item to check, all discovered services if omitted
        #[arg(long = "item")]
        items: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the agent command line for the configured router
    AgentCommand {
        #[arg(long)]
        host: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("UNKNOWN - {:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.logging);

    match cli.command {
        Command::Discover { input, json } => {
            let section = read_section(&input)?;
            let services = fritzbox_smarthome::discover(&section, &config.params);
            tracing::info!(count = services.len(), "discovery finished");

            if json {
                println!("{}", serde_json::to_string_pretty(&services)?);
            } else {
                for service in services {
                    println!("{}", service.item);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { input, items, json } => {
            let section = read_section(&input)?;
            let items = if items.is_empty() {
                fritzbox_smarthome::discover(&section, &config.params)
                    .into_iter()
                    .map(|service| service.item)
                    .collect()
            } else {
                items
            };

            let mut worst = State::Ok;
            for item in &items {
                let outcome = fritzbox_smarthome::check_item(item, &config.params, &section);
                worst = worst.max(outcome.state());

                if json {
                    let value = serde_json::json!({ "item": item, "outcome": outcome });
                    println!("{}", serde_json::to_string(&value)?);
                } else {
                    println!("{}: {}", item, outcome.render());
                }
            }
            Ok(ExitCode::from(worst.exit_code() as u8))
        }
        Command::AgentCommand { host } => {
            let params = config
                .agent
                .context("no [agent] section in the config file")?;
            for arg in command_arguments(&params, &host) {
                println!("{}", arg);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let (config, diagnostics, source) = Config::from_file(path)
        .with_context(|| format!("Failed to load config from '{}'", path.display()))?;

    if !diagnostics.is_empty() {
        eprint!("{}", format_diagnostics(&diagnostics, source.as_ref()));
    }

    Ok(config)
}

fn init_logging(logging: &LoggingConfig) {
    let targets = logging.overrides.iter().fold(
        Targets::new().with_default(LevelFilter::from(logging.level)),
        |targets, (target, level)| targets.with_target(target.clone(), LevelFilter::from(*level)),
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(targets),
        )
        .init();
}

fn read_section(input: &str) -> anyhow::Result<Section> {
    let (name, text) = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read agent output from stdin")?;
        ("<stdin>".to_string(), text)
    } else {
        let text = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read agent output from '{}'", input))?;
        (input.to_string(), text)
    };

    Section::from_agent_output(&text).map_err(|e| {
        eprint!("{}", e.render(&name));
        anyhow::Error::new(e)
    })
}
