//! simverify - headless-browser verification flows
//!
//! Main entry point for the CLI application.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use simverify::cli::commands::{self, RunOptions};
use simverify::cli::report;
use simverify::core::logging;
use simverify::Config;

/// Click through the simulator UI in a headless browser and screenshot it
#[derive(Parser, Debug)]
#[command(name = "simverify")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/simverify/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Base URL of the running dev server
    #[arg(long, short = 'u', global = true)]
    url: Option<String>,

    /// Screenshot output directory
    #[arg(long, short = 'o', global = true)]
    out: Option<PathBuf>,

    /// Run in headed browser mode (visible window)
    #[arg(long, global = true)]
    headed: bool,

    /// Enable debug output
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Print the run summary as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios (all when none are named)
    Run {
        /// Scenario names, see `list`
        scenarios: Vec<String>,

        /// Do not check that the target answers before starting
        #[arg(long)]
        skip_preflight: bool,

        /// Open captured screenshots for review
        #[arg(long)]
        open: bool,
    },
    /// List available scenarios
    List,
    /// Check the browser CLI and the target server
    Doctor,
    /// Show the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        init: bool,
    },
}

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;

    // Apply CLI overrides
    if let Some(ref url) = args.url {
        config.target.base_url = url.clone();
    }

    if let Some(ref out) = args.out {
        config.output.screenshot_dir = out.clone();
    }

    if args.headed {
        config.browser.headed = true;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn execute(args: Args) -> anyhow::Result<ExitCode> {
    let config = build_config(&args)?;

    let command = args.command.unwrap_or(Command::Run {
        scenarios: Vec::new(),
        skip_preflight: false,
        open: false,
    });

    match command {
        Command::Run {
            scenarios,
            skip_preflight,
            open,
        } => {
            let options = RunOptions {
                scenarios,
                skip_preflight,
                open,
            };
            let reports = commands::run(&config, &options).await?;

            if args.json {
                println!("{}", report::to_json(&reports)?);
            } else {
                println!("{}", report::format_summary(&reports));
            }
            Ok(ExitCode::from(report::exit_code(&reports)))
        }

        Command::List => {
            print!("{}", commands::list_text());
            Ok(ExitCode::SUCCESS)
        }

        Command::Doctor => {
            let doctor = commands::doctor(&config).await;
            println!("{}", doctor.render());
            Ok(if doctor.healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Config { init } => {
            let path = args.config.clone().unwrap_or_else(Config::config_file);
            let output = commands::config_command(&config, init.then_some(path.as_path()))?;
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.debug);

    match execute(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
