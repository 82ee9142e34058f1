// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point for the `warden` binary: parses CLI flags into a
//! [`warden_daemon::lifecycle::Config`], boots the Runtime Orchestrator
//! (C11, §4.11), and blocks on the host-protocol loop until the client
//! disconnects (§6.4).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use tokio_util::sync::CancellationToken;

use warden_daemon::lifecycle::{Config, Daemon, LifecycleError, ModuleSelection};

/// Exit codes as specified (§6.4).
const EXIT_OK: u8 = 0;
const EXIT_BAD_ARGS: u8 = 64;
const EXIT_INTERNAL_FATAL: u8 = 70;
const EXIT_STDIO_UNAVAILABLE: u8 = 77;

#[derive(Debug, Parser)]
#[command(
    name = "warden",
    version,
    about = "Agent-tooling runtime: tool registry, skill engine, and event bus over a stdio host protocol"
)]
#[command(group(ArgGroup::new("module_selection").args(["persona", "tools", "all"]).multiple(false)))]
struct Cli {
    /// Load a named persona's modules (mutually exclusive with --tools/--all).
    #[arg(long)]
    persona: Option<String>,

    /// Load a comma-separated list of modules directly (mutually exclusive with --persona/--all).
    #[arg(long, value_delimiter = ',')]
    tools: Vec<String>,

    /// Load every known module (mutually exclusive with --persona/--tools).
    #[arg(long)]
    all: bool,

    /// Custom server name shown in the host handshake.
    #[arg(long, default_value = "warden")]
    name: String,

    /// Disable the Event Bus WebSocket endpoint.
    #[arg(long)]
    no_bus: bool,

    /// Project directory holding `config.json`, `personas/`, and `skills/` (§6.3).
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Address the Event Bus binds to when enabled.
    #[arg(long, default_value = "127.0.0.1:8787")]
    bus_addr: SocketAddr,
}

fn module_selection(cli: &Cli) -> ModuleSelection {
    if let Some(persona) = &cli.persona {
        ModuleSelection::Persona(persona.clone())
    } else if cli.all {
        ModuleSelection::All
    } else {
        ModuleSelection::Tools(cli.tools.clone())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::from(EXIT_OK)
                }
                _ => ExitCode::from(EXIT_BAD_ARGS),
            };
        }
    };

    let project_dir = match cli.project_dir.canonicalize() {
        Ok(dir) => dir,
        Err(_) => cli.project_dir.clone(),
    };

    let config = match Config::load(
        project_dir,
        module_selection(&cli),
        cli.name.clone(),
        !cli.no_bus,
        cli.bus_addr,
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("warden: {err}");
            return ExitCode::from(EXIT_INTERNAL_FATAL);
        }
    };

    let _log_guard = warden_daemon::lifecycle::install_logging(&config.state_dir);
    tracing::info!(git_hash = env!("BUILD_GIT_HASH"), name = %config.server_name, "warden starting");

    let daemon = match Daemon::boot(config).await {
        Ok(daemon) => daemon,
        Err(err) => {
            eprintln!("warden: failed to boot: {err}");
            return ExitCode::from(boot_exit_code(&err));
        }
    };

    let cancel = CancellationToken::new();
    match daemon.run(cancel).await {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(err) => {
            eprintln!("warden: host-protocol loop ended with an error: {err}");
            ExitCode::from(EXIT_STDIO_UNAVAILABLE)
        }
    }
}

fn boot_exit_code(err: &LifecycleError) -> u8 {
    match err {
        LifecycleError::Io(_) => EXIT_STDIO_UNAVAILABLE,
        _ => EXIT_INTERNAL_FATAL,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
