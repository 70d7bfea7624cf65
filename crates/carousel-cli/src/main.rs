//! Carousel CLI - Simulate and validate carousel engine configurations

mod cli;
mod colorizer;
mod script;
mod simulator;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized by the app once flags and environment are known
    let mut app = cli::CarouselApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
