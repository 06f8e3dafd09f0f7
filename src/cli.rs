//! Command line interface

use clap::Parser;

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FETCH_FAILED: i32 = 1;
    pub const MISSING_CREDENTIAL: i32 = 2;
    pub const UNEXPECTED_FAILURE: i32 = 3;
}

#[derive(Debug, Parser)]
#[command(
    name = "token-tongs",
    version,
    about = "Shows your remaining OpenRouter credit balance in the menu bar",
    after_help = "The API key is read from the OPENROUTER_API_KEY environment variable."
)]
pub struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_output: bool,

    /// Fetch once, print the menu to stdout and exit instead of starting the tray
    #[arg(long)]
    pub once: bool,
}
