//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::{NodePath, XmlWriter};

/// Build, inspect and serialize XML element trees
#[derive(Parser, Debug)]
#[command(name = "xmlnode")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the bookstore sample tree
    Sample {
        /// Write XML here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Also save the tree as a snapshot
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        snapshot: Option<PathBuf>,
        #[command(flatten)]
        format: FormatArgs,
    },

    /// Serialize a snapshot to XML
    Render {
        /// Snapshot file
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Write XML here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        #[command(flatten)]
        format: FormatArgs,
    },

    /// Show a snapshot's element hierarchy
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Show size and shape of a snapshot
    Info {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
    },

    /// Print the subtree at a path, e.g. `0,2`
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Comma separated child indices; omit for the root
        path: Option<NodePath>,
        /// Write XML here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        #[command(flatten)]
        format: FormatArgs,
    },

    /// Remove the subtree at a path and save the snapshot
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        snapshot: PathBuf,
        /// Comma separated child indices
        path: NodePath,
        /// Save to this file instead of overwriting the input
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Formatting flags; each one overrides the loaded settings when given.
/// Of a flag and its `--no-` form, the last one on the command line wins.
#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    /// Prepend an XML declaration
    #[arg(long, overrides_with = "no_declaration")]
    pub declaration: bool,
    /// Omit the XML declaration
    #[arg(long, overrides_with = "declaration")]
    pub no_declaration: bool,
    /// Escape markup characters in values
    #[arg(long, overrides_with = "no_escape")]
    pub escape: bool,
    /// Write values verbatim
    #[arg(long, overrides_with = "escape")]
    pub no_escape: bool,
    /// Spaces per nesting level
    #[arg(long)]
    pub indent: Option<usize>,
}

/// `Some` when either form of a switch was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl FormatArgs {
    pub fn apply(&self, mut writer: XmlWriter) -> XmlWriter {
        if let Some(on) = switch(self.declaration, self.no_declaration) {
            writer.declaration = on;
        }
        if let Some(on) = switch(self.escape, self.no_escape) {
            writer.escape = on;
        }
        if let Some(width) = self.indent {
            writer.indent_width = width;
        }
        writer
    }
}
