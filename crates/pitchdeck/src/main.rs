mod app;
mod audio;
mod cli;
mod clock;
mod commands;
mod config;
mod content;
mod input;
mod logging;
mod modal;
mod navigator;
mod render;
mod selector;
mod shell;
mod theme;
mod watch;
mod widgets;

use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
