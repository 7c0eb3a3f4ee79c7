use std::process::ExitStatus;

use clap::Args;
use cronping::Monitor;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// Exit code reported when the job was interrupted with Ctrl-C.
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Program to run, followed by its arguments
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Map a child's exit status to our exit code: its own code, or
/// `128 + signal` when it was killed.
fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }
    1
}

/// Run the job and ping if, and only if, it exits 0.
///
/// Returns the job's exit code; the heartbeat outcome never changes it.
/// Child stdio is inherited. A Ctrl-C while the job runs is forwarded by
/// the terminal to the whole process group; we wait for the child and
/// treat the run as failed.
pub async fn run_job(monitor: &Monitor, command: &[String]) -> CliResult<u8> {
    let (program, args) = command.split_first().ok_or(CliError::MissingCommand)?;

    info!(program, "starting job");
    let mut child = Command::new(program)
        .args(args)
        .spawn()
        .map_err(|source| CliError::Spawn {
            program: program.clone(),
            source,
        })?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;
    let mut interrupted = false;

    let status = loop {
        tokio::select! {
            status = child.wait() => break status.map_err(CliError::Wait)?,
            result = &mut ctrl_c, if listening => {
                listening = false;
                match result {
                    Ok(()) => {
                        interrupted = true;
                        warn!("interrupted, waiting for job to exit");
                    }
                    Err(e) => debug!(error = %e, "ctrl-c handler unavailable"),
                }
            }
        }
    };

    let code = exit_code(status);
    if interrupted {
        warn!(code, "job interrupted, heartbeat not sent");
        return Ok(if code == 0 { INTERRUPTED_EXIT_CODE } else { code });
    }
    if code != 0 {
        warn!(code, "job failed, heartbeat not sent");
        return Ok(code);
    }

    info!("job succeeded");
    monitor.ping().await;
    Ok(0)
}
