use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Demo Assembler - combines built frontend demos into one static site
#[derive(Parser, Debug)]
#[command(name = "demo-assembler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble all built projects into the output directory
    Build(BuildArgs),

    /// List discovered projects and their build output sizes
    Scan(ScanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory containing the sub-projects
    #[arg(short, long, value_name = "PATH", env = "DEMO_ASSEMBLER_PROJECTS_DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Output directory (emptied before writing)
    #[arg(short, long, value_name = "PATH", env = "DEMO_ASSEMBLER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Parallel project jobs (0 = one per CPU)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory containing the sub-projects
    #[arg(short, long, value_name = "PATH", env = "DEMO_ASSEMBLER_PROJECTS_DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
