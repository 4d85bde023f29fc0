// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hearth - culinary-career assessment service.
//!
//! This is the binary entry point: the HTTP gateway plus the operator
//! commands that cron jobs and humans run against the same database.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod render;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_config::HearthConfig;

/// Hearth - culinary-career assessment service.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Send every due follow-up email once, then exit.
    ProcessQueue,
    /// Render a session's stored report as HTML.
    Render {
        /// Session whose plan to render.
        session_id: String,
        /// Print layout instead of the paginated interactive one.
        #[arg(long)]
        print: bool,
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Validate configuration and check the configured services.
    CheckConfig,
}

fn load_config(path: Option<&std::path::Path>) -> HearthConfig {
    let loaded = match path {
        Some(path) => hearth_config::load_and_validate_path(path),
        None => hearth_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            hearth_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `service.log_level` when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hearth={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::ProcessQueue) => serve::run_process_queue(config).await,
        Some(Commands::Render {
            session_id,
            print,
            out,
        }) => render::run_render(config, &session_id, print, out.as_deref()).await,
        Some(Commands::CheckConfig) => check::run_check_config(&config).await,
        None => {
            println!("hearth: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
