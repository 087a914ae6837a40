//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::{LinkTarget, KNOWN_ICONS};

/// Navigation menu builder: edit, reorder and export nested menus
#[derive(Parser, Debug)]
#[command(name = "navtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d, -dd, -ddd)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Menu document (default: menu_file from config)
    #[arg(short, long, global = true, env = "NAVTREE_FILE", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty menu document
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Show the menu as a tree
    Show,

    /// List items flat with parent, depth and index
    List {
        /// Print rows as JSON (accepted by `import --flat`)
        #[arg(long)]
        json: bool,
    },

    /// Replace the menu document with a menu read from a file
    Import {
        /// Nested export JSON, or flat rows with --flat
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Input holds flat rows (id, parentId, depth, index)
        #[arg(long)]
        flat: bool,
    },

    /// Print the menu in export format (JSON)
    Export {
        /// Write to file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Compact single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show where an item sits in the tree
    Locate {
        /// Item id
        id: String,
    },

    /// Add an item from the library (link, dropdown, mega-menu, button, divider, page:<id>)
    Add {
        /// Template key
        template: String,
        #[command(flatten)]
        target: TargetArgs,
        /// Position among the destination's items (default: end)
        #[arg(long, conflicts_with = "over")]
        index: Option<usize>,
        /// Override the template label
        #[arg(long)]
        label: Option<String>,
        /// Override the template url
        #[arg(long)]
        url: Option<String>,
    },

    /// Move an item
    Move {
        /// Item id
        id: String,
        #[command(flatten)]
        target: TargetArgs,
        /// Position among the destination's items, counted after the item is taken out
        #[arg(long, conflicts_with = "over")]
        index: Option<usize>,
    },

    /// Delete an item and everything below it
    Remove {
        /// Item id
        id: String,
    },

    /// Edit item properties
    Set(SetArgs),

    /// Toggle the hidden flag of an item
    Toggle {
        /// Item id
        id: String,
    },

    /// Copy an item (and its children) right after it
    Duplicate {
        /// Item id
        id: String,
    },

    /// Browse the item library
    Library {
        /// Filter catalog pages by title or path
        #[arg(short, long)]
        search: Option<String>,
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

/// Drop position shared by `add` and `move`.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct TargetArgs {
    /// Nest under this container
    #[arg(long, value_name = "ID")]
    pub into: Option<String>,
    /// Place next to this item, at its level
    #[arg(long, value_name = "ID")]
    pub over: Option<String>,
    /// Place at root level (default)
    #[arg(long)]
    pub root: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Item id
    pub id: String,
    /// Display text
    #[arg(long)]
    pub label: Option<String>,
    /// Link url (empty string clears)
    #[arg(long)]
    pub url: Option<String>,
    /// Icon name (empty string clears)
    #[arg(long, value_parser = parse_icon)]
    pub icon: Option<String>,
    /// Link target: _self or _blank
    #[arg(long)]
    pub target: Option<LinkTarget>,
    /// Hide or show the item
    #[arg(long)]
    pub hidden: Option<bool>,
    /// Description (empty string clears)
    #[arg(long)]
    pub description: Option<String>,
    /// CSS classes (empty string clears)
    #[arg(long)]
    pub classes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}

fn parse_icon(s: &str) -> Result<String, String> {
    if s.is_empty() || KNOWN_ICONS.contains(&s) {
        Ok(s.to_string())
    } else {
        Err(format!("unknown icon (expected one of {})", KNOWN_ICONS.join(", ")))
    }
}
