// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Apply | Locate | Diff | Archs | Options | Version
//! ```

use std::process::ExitCode;

use vsenv_rs::cli::{self, Command};
use vsenv_rs::cmd::config::{
    ConfigOverrides, build_config_loader, run_archs_command, run_options_command,
};
use vsenv_rs::cmd::resolve::{run_apply_command, run_diff_command, run_locate_command};
use vsenv_rs::config::VsenvConfig;
use vsenv_rs::config::loader::ConfigLoader;
use vsenv_rs::core::process::SystemRunner;
use vsenv_rs::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let loader = build_config_loader(&cli.global);
    let config_files = loader.format_loaded_files();
    let config = match ConfigOverrides::from_command(cli.command.as_ref())
        .apply(loader)
        .and_then(ConfigLoader::build)
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = cli.global.log_config(&config.logging);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config, &config_files).await
}

async fn dispatch_command(cli: &cli::Cli, config: &VsenvConfig, config_files: &[String]) -> ExitCode {
    let runner = SystemRunner;

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(&config.format_options(), config_files);
            Ok(())
        }
        Some(Command::Archs) => {
            run_archs_command();
            Ok(())
        }
        Some(Command::Apply(args)) => run_apply_command(&runner, args, config).await,
        Some(Command::Locate(args)) => run_locate_command(&runner, args, config).await,
        Some(Command::Diff(args)) => run_diff_command(&runner, args, config).await,
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
