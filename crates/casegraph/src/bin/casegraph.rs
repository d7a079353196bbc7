use casegraph::native::{self, CliError};
use std::process::ExitCode;

fn main() -> ExitCode {
    native::init_tracing();
    match native::run(std::env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        // Help, version and usage errors print and exit the way clap does.
        Err(CliError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("casegraph: {e}");
            ExitCode::FAILURE
        }
    }
}
