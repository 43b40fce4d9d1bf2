//! restgen CLI entry point
//!
//! Minimal entrypoint: dispatch to the CLI module, print errors to
//! stderr, exit non-zero on failure.

use restgen::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
