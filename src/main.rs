//! Vending Machine CLI
//!
//! Runs an interactive vending machine session on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [--stock stock.csv] [--payment cash]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to log sales and rejected purchases

use std::env;
use std::io;
use std::process;
use vending_machine::{Config, Result, Session};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_args(env::args().skip(1))?;
    let mut machine = config.build_machine()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(&mut machine, stdin.lock(), stdout.lock()).run()
}
