mod ping;
mod run;

pub use ping::run_ping;
pub use run::{RunArgs, run_job};
