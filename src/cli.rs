//! CLI argument parsing for tasklist

use crate::config::Backend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(about = "Local task list with ordered, write-through persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the stored list (overrides config)
    #[arg(short, long)]
    pub store_path: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short, long, value_enum)]
    pub backend: Option<Backend>,

    /// Filter used when printing the refreshed list: all, active, completed
    #[arg(short, long)]
    pub filter: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Replace a task's text; blank text removes the task
    Edit {
        /// Task id, id prefix, or 1-based position
        #[arg(required = true)]
        id: String,

        /// New text
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },

    /// Flip a task between active and completed
    Toggle {
        /// Task id, id prefix, or 1-based position
        #[arg(required = true)]
        id: String,
    },

    /// Remove a task
    #[command(alias = "remove")]
    Rm {
        /// Task id, id prefix, or 1-based position
        #[arg(required = true)]
        id: String,
    },

    /// Remove all completed tasks
    Clear,

    /// List tasks
    #[command(alias = "list")]
    Ls {
        /// all, active or completed (default from config)
        mode: Option<String>,
    },

    /// Move a task so it sits just before another
    #[command(alias = "move")]
    Mv {
        /// Task to move
        #[arg(required = true)]
        dragged: String,

        /// Task it should end up in front of
        #[arg(required = true)]
        target: String,
    },

    /// Show totals
    Stats,
}
