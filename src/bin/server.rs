//! Cura agent server binary.
//! Run with: cargo run --bin cura-server

use std::process::ExitCode;

use cura_agent::start_cura_agent;

fn main() -> ExitCode {
    start_cura_agent::run()
}
