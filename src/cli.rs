//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Pick, buy and apply color palettes for the shell.
#[derive(Debug, Parser)]
#[command(name = "hueshell", version)]
pub struct Args {
    /// Path to config file (default: ./hueshell.toml or ~/.config/hueshell/hueshell.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available palettes in display order.
    List {
        /// Print `{name, colors}` entries as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the active palette and its style variables.
    Current,
    /// Select a palette by name or 1-based index, purchasing it if needed.
    Select {
        /// Palette name (case-insensitive) or index from `list`.
        selector: String,
    },
    /// Print the active palette as a CSS `:root` block.
    Css,
    /// Show the background frame for a location.
    Background {
        /// Navigation location, e.g. `/` or `/404`.
        #[arg(short = 'l', long = "location", default_value = "/")]
        location: String,
    },
    /// Write the default config to ~/.config/hueshell/hueshell.toml.
    Init {
        /// Back up and replace an existing config.
        #[arg(long)]
        force: bool,
    },
}
