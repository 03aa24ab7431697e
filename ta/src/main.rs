//! Tollgate Admin (ta) - storage layout and scenario tool
//!
//! Offline companion for token deployments.
//!
//! # Usage
//!
//! ```bash
//! # Print the namespaced location of one or more identifiers
//! ta locate tollgate.storage.TransferControl
//!
//! # Check every pinned slot family before a deployment
//! ta verify
//!
//! # Deploy in memory and replay a call script
//! ta simulate scenario.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::{json, Map, Value};
use tollgate_common::{
    config::{SlotScheme, STORAGE_LAYOUT, VERSION},
    get_cli_styles,
    storage::{slot_for, verify_location},
    token::Scenario,
};

/// Tollgate Admin - storage layout and scenario tool
#[derive(Parser)]
#[command(name = "ta")]
#[command(about = "Tollgate Admin - storage layout and scenario tool")]
#[command(version = VERSION)]
#[command(styles = get_cli_styles())]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the storage location of identifiers
    Locate {
        /// Namespace identifiers, e.g. "tollgate.storage.TransferControl"
        #[arg(required = true)]
        identifiers: Vec<String>,
        /// Use the single-hash EIP-1967 slot instead of the namespaced formula
        #[arg(long)]
        eip1967: bool,
    },
    /// Compare every slot family with its pinned location
    Verify,
    /// Deploy a token in memory and replay a scenario file
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Exit with failure if any step was rejected
        #[arg(long)]
        strict: bool,
    },
}

fn execute_locate(identifiers: &[String], eip1967: bool) -> Value {
    let scheme = if eip1967 {
        SlotScheme::Eip1967
    } else {
        SlotScheme::Erc7201
    };

    let mut locations = Map::new();
    for identifier in identifiers {
        let slot = slot_for(identifier, scheme);
        locations.insert(identifier.clone(), json!(format!("0x{}", slot)));
    }
    Value::Object(locations)
}

fn execute_verify() -> Result<Value> {
    let mut entries = Vec::with_capacity(STORAGE_LAYOUT.len());
    let mut drifted = 0;

    for entry in STORAGE_LAYOUT {
        match verify_location(entry.identifier, entry.scheme, entry.expected) {
            Ok(slot) => entries.push(json!({
                "identifier": entry.identifier,
                "location": format!("0x{}", slot),
                "ok": true,
            })),
            Err(e) => {
                error!("{}", e);
                drifted += 1;
                entries.push(json!({
                    "identifier": entry.identifier,
                    "expected": format!("0x{}", entry.expected),
                    "ok": false,
                }));
            }
        }
    }

    let result = json!({ "entries": entries, "drifted": drifted });
    if drifted > 0 {
        println!("{}", serde_json::to_string_pretty(&result)?);
        bail!("{} slot famil{} drifted from the pinned layout", drifted, if drifted == 1 { "y" } else { "ies" });
    }
    Ok(result)
}

fn execute_simulate(path: &Path, strict: bool) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scenario file {}", path.display()))?;

    info!(
        "Simulating {} ({}) with {} step(s)",
        scenario.token.name,
        scenario.token.symbol,
        scenario.steps.len()
    );
    let report = scenario.run().context("Scenario could not be deployed")?;
    let failures = report.failures();
    let result = serde_json::to_value(&report).context("Failed to format report")?;

    if strict && failures > 0 {
        println!("{}", serde_json::to_string_pretty(&result)?);
        bail!("{} step(s) were rejected", failures);
    }
    Ok(result)
}

/// Run the application
fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let result = match cli.command {
        Commands::Locate {
            identifiers,
            eip1967,
        } => execute_locate(&identifiers, eip1967),
        Commands::Verify => execute_verify()?,
        Commands::Simulate { scenario, strict } => execute_simulate(&scenario, strict)?,
    };

    let output = serde_json::to_string_pretty(&result).context("Failed to format output")?;
    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
