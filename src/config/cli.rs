use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "chore-week")]
#[command(about = "Snap dates to the Monday of their week and build start_of_week queries")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the Monday that starts the week of each date (YYYY-MM-DD)
    Resolve {
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// Print the Monday..Sunday range containing a picker value
    Range { value: String },
    /// Print the start_of_week query a picker value submits
    Query { value: String },
    /// Print the current week according to the configured clock
    ThisWeek,
}
