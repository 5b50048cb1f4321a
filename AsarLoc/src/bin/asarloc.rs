use std::process::ExitCode;

fn main() -> ExitCode {
    asarloc::cli::run_cli()
}
