//! Privilege-escalation commands
//!
//! `sudo start` grants a temporary auto-op and spectator gamemode, `sudo
//! stop` reverts both, `sudo spark` kicks off a profiler run. Every handler
//! checks the invoker against the external identity service; a failed lookup
//! is caught, logged and reported generically rather than escalated.

use tracing::error;

use crate::commands::CommandSource;
use crate::host::{ChatMessage, HostPort};

/// Default slow-tick threshold for `sudo spark` with no argument
pub const DEFAULT_SPARK_THRESHOLD_TICKS: i32 = 50;

const NOT_ADMIN: &str = "You shall not pass!";
const LOOKUP_FAILED: &str = "An error occurred while checking permissions.";

/// Admin gate shared by the sudo handlers; `Ok(true)` means proceed
fn gate(host: &mut dyn HostPort, source: &CommandSource) -> bool {
    match host.check_admin(source.id) {
        Ok(true) => true,
        Ok(false) => {
            host.send_message(source.id, ChatMessage::red(NOT_ADMIN));
            false
        }
        Err(err) => {
            error!(player = %source.name, %err, "admin lookup failed");
            host.send_message(source.id, ChatMessage::red(LOOKUP_FAILED));
            false
        }
    }
}

/// `sudo start`
pub fn start(host: &mut dyn HostPort, source: &CommandSource) -> i32 {
    if gate(host, source) {
        host.run_command(&format!(
            "lp user {} permission settemp luckperms.autoop true 1h replace",
            source.name
        ));
        host.run_command(&format!("gamemode spectator {}", source.name));
        host.send_message(
            source.id,
            ChatMessage::green("With great power comes great responsibility!"),
        );
    }
    1
}

/// `sudo stop`
pub fn stop(host: &mut dyn HostPort, source: &CommandSource) -> i32 {
    if gate(host, source) {
        host.run_command(&format!(
            "lp user {} permission unsettemp luckperms.autoop",
            source.name
        ));
        host.run_command(&format!("gamemode survival {}", source.name));
        host.send_message(
            source.id,
            ChatMessage::green("Welcome back to the normie world!"),
        );
    }
    1
}

/// `sudo spark [ticks]`: start a profiler run, restricted to ticks slower
/// than the threshold when one is given
pub fn spark(host: &mut dyn HostPort, source: &CommandSource, ticks: i32) -> i32 {
    if gate(host, source) {
        if ticks <= 0 {
            host.run_command("spark profiler start --threads * --timeout 30");
        } else {
            host.run_command(&format!(
                "spark profiler start --threads * --timeout 30 --only-ticks-over {}",
                ticks
            ));
        }
    }
    1
}
