//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Hierarchical multi-select over labeled trees: checkbox propagation, expansion and selection snapshots
#[derive(Parser, Debug)]
#[command(name = "treeselect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .treeselect.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Record field holding the label
    #[arg(long, global = true)]
    pub title_key: Option<String>,

    /// Record field holding the children
    #[arg(long, global = true)]
    pub child_key: Option<String>,

    /// Do not re-derive parents from their children
    #[arg(long, global = true)]
    pub no_auto_parents: bool,

    /// Do not cascade selection to descendants
    #[arg(long, global = true)]
    pub no_auto_children: bool,

    /// Expand nodes when their checkbox selects them
    #[arg(long, global = true)]
    pub auto_expand: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tree with its flags and the current selection
    Show {
        /// Tree document (.json or .toml); default: data_file from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Apply press events in order and show the result
    Run {
        /// Tree document (.json or .toml); default: data_file from config
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Print the resulting records as JSON instead of the tree
        #[arg(long)]
        json: bool,
        /// Events: check:<path>, expand:<path>, press:<path> (path like A/A1)
        #[arg(required = true)]
        events: Vec<String>,
    },

    /// Toggle checkboxes and expanders interactively (fzf)
    Pick {
        /// Tree document (.json or .toml); default: data_file from config
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
