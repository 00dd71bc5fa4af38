use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "jjdeck")]
#[command(bin_name = "jjdeck")]
#[command(version)]
#[command(about = "Terminal dashboard for jj change-sets, pull requests and tickets")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under the config directory"
    )]
    pub diagnostics: bool,

    #[arg(
        long,
        value_name = "DIR",
        help = "Repository to open instead of the current directory"
    )]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
}
