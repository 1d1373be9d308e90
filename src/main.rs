//! fleetledger entrypoint.

use fleetledger::run;
use fleetledger::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(&e);
        std::process::exit(e.exit_code());
    }
}
