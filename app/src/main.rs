//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point with unified logging.
// FORMAT: seq|level|category|message

use app_lib::Args;
use clap::Parser;

fn main() {
    let args = Args::parse();
    if let Err(e) = app_lib::run(args) {
        eprintln!("superstore-dashboard: {}", e);
        std::process::exit(1);
    }
}
