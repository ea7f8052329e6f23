use std::process::ExitCode;

use clap::Parser;
use gcfg::{Cli, Gcfg};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = TermLogger::init(
        cli.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("gcfg: failed to set up logging: {e}");
    }

    let (files, action) = cli.into_action();
    let builder = files.into_iter().fold(Gcfg::builder(), |b, file| b.file(file));
    match builder.handle_and_print(&action) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gcfg: {e}");
            ExitCode::FAILURE
        }
    }
}
