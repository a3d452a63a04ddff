use clap::Parser;
use tradenotify::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
