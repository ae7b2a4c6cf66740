use clap::{Parser, Subcommand};
use std::path::PathBuf;

use funcmap::handler::ErrorStrategy;

#[derive(Parser, Debug)]
#[command(name = "funcmap")]
#[command(about = "Render templates with the funcmap helper catalog", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $FUNCMAP_CONFIG or config/funcmap.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a template file to stdout
    Render(RenderArgs),
    /// List the available helpers
    List,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    /// JSON file providing the template data
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Error strategy, overriding the configured one
    #[arg(long)]
    pub strategy: Option<ErrorStrategy>,
}
