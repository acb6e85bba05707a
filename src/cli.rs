use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pkgstage")]
#[command(about = "Stage package changes for the next system root", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the sandboxed state directory
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stage packages for installation
    Add {
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Stage packages for removal
    Remove {
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// List added and removed packages
    List,
    /// List changes not yet applied
    Unstaged,
    /// Print the package manager command for the next transaction
    Command {
        /// Replay every recorded change instead of only the unstaged ones
        #[arg(long)]
        upgrade: bool,
    },
    /// Forget unstaged changes
    Clear,
    /// Accept the package manager user agreement
    Agree,
    /// Show package manager status
    Status,
    /// Print or write the change summary
    Summary {
        /// Write the summary to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show catalog information for a package
    Info { package: String },
}
