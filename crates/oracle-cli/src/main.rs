use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use oracle_cli::{run, Options};

fn main() -> ExitCode {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_max_level(options.log_level())
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    println!("*** Geometry comparison ***");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&options, Path::new("."), &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
