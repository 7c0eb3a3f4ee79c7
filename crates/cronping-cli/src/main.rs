mod cmd;
mod config;
mod error;

use std::fmt;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::time::FormatTime;

use crate::config::{PingOptions, Settings};

struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let d = self.0.elapsed();
        let total_secs = d.as_secs();
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        let millis = d.subsec_millis();
        write!(w, "[{mins:02}:{secs:02}:{millis:03}]")
    }
}

#[derive(Parser)]
#[command(name = "cronping", version, about = "Ping a cron monitor when a job succeeds")]
struct Cli {
    #[command(flatten)]
    options: PingOptions,

    /// Log every delivery attempt
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a command and ping only if it exits 0 (exits with the command's code)
    Run(cmd::RunArgs),
    /// Send a single ping now
    Ping,
}

/// Diagnostics go to stderr so the job keeps stdout to itself.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_timer(Elapsed(Instant::now()))
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Config errors surface before the job runs.
    let monitor = match Settings::load(&cli.options).and_then(|s| s.monitor()) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let result = match cli.command {
        Command::Run(args) => cmd::run_job(&monitor, &args.command).await,
        Command::Ping => Ok(cmd::run_ping(&monitor).await),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
