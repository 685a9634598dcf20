// gitgood: Git Good - contained git hosting over ssh
//
// SPDX-FileCopyrightText: 2026 Git Good Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Serve | Create | Options | Version
//! ```

use std::process::ExitCode;

use gitgood::cli::global::GlobalOptions;
use gitgood::cli::{self, Command};
use gitgood::cmd::config::run_options_command;
use gitgood::cmd::create::run_create_command;
use gitgood::cmd::serve::{console_log_level, run_serve_command};
use gitgood::config::Config;
use gitgood::config::loader::ConfigLoader;
use gitgood::logging::{LogConfig, LogGuard, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(dispatch_command(&cli));
    // A blocked stdin read must not keep a finished session alive
    runtime.shutdown_background();
    code
}

fn start_logging(config: &Config, console_level: LogLevel) -> Option<LogGuard> {
    let log_config = LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build();

    match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            None
        }
    }
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(0)
        }
        Some(command) => match load_config(&cli.global) {
            Ok(config) => {
                let console_level = match command {
                    Command::Serve(_) => console_log_level(&cli.global, &config),
                    _ => config.global.output_log_level,
                };
                let Some(_log_guard) = start_logging(&config, console_level) else {
                    return ExitCode::FAILURE;
                };
                run_with_config(command, &config).await
            }
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_with_config(command: &Command, config: &Config) -> gitgood::error::Result<i32> {
    match command {
        Command::Serve(args) => run_serve_command(args, config).await,
        Command::Create(args) => run_create_command(args, config).map(|()| 0),
        Command::Options(args) => run_options_command(args, config).map(|()| 0),
        Command::Version => Ok(0),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> gitgood::error::Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("gitgood.toml");
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix("GITGOOD");
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}

fn load_config(global: &GlobalOptions) -> gitgood::error::Result<Config> {
    build_config_loader(global)?.build().map_err(|e| {
        eprintln!("Failed to load config: {e:#}");
        e
    })
}
