// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Save-file inspection utility
#[derive(Parser, Debug)]
#[command(name = "edictscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect edict save files: check, summarize, build edict trees", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE", global = true)]
    pub init_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check save files: parse, report warnings and reference problems
    Check(CheckArgs),

    /// Inspect a single save file's structure
    Inspect(InspectArgs),

    /// Build and print the edict tree of a save file
    Tree(TreeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Skip reference validation, report parse warnings only
    #[arg(long, default_value_t = false)]
    pub no_validate: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// File to inspect
    #[arg(required = true)]
    pub file: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// File to build the tree from
    #[arg(required = true)]
    pub file: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

fn is_json_format(value: &str) -> bool {
    value.eq_ignore_ascii_case("json")
}

impl CheckArgs {
    pub fn is_json(&self) -> bool {
        is_json_format(&self.format)
    }
}

impl InspectArgs {
    pub fn is_json(&self) -> bool {
        is_json_format(&self.format)
    }
}

impl TreeArgs {
    pub fn is_json(&self) -> bool {
        is_json_format(&self.format)
    }
}
