use cronping::Monitor;
use tracing::info;

/// Send one heartbeat by hand. Here the ping itself is the job, so an
/// undelivered heartbeat exits 1.
pub async fn run_ping(monitor: &Monitor) -> u8 {
    let outcome = monitor.ping().await;
    if outcome.is_delivered() {
        info!(attempts = outcome.attempts(), "ping delivered");
        0
    } else {
        1
    }
}
