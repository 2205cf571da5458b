use clap::Parser;
use twquant::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
