//! Command-line arguments (clap derive).
//!
//! Argument names, help text and value parsing live here; the handlers in
//! [`crate::commands`] do the work.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// Building envelope layer configuration
#[derive(Debug, Parser)]
#[command(
    name = "envelope",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Configure building elements and their layer build-ups",
    after_help = "EXAMPLES:\n\
        \x20 envelope init house.evp --engineer Jane --job 25-042 --client ACME\n\
        \x20 envelope element add house.evp --building-type Residential --space Living --name North --type wall\n\
        \x20 envelope catalog --substance \"expanded polystyrene\"\n\
        \x20 envelope check house.evp",
    arg_required_else_help = true,
    subcommand_required = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags available on every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (defaults to ./envelope.toml when present)
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an empty project file
    Init(InitArgs),

    /// Browse the layer catalog one cascade step at a time
    Catalog(CatalogArgs),

    /// Manage elements
    #[command(subcommand)]
    Element(ElementCommand),

    /// Manage the layers of an element
    #[command(subcommand)]
    Layer(LayerCommand),

    /// Check every element against the project's U-value limits
    Check(FileArg),

    /// Run the outside-insulated concrete wall walkthrough in memory
    Demo,
}

#[derive(Debug, Args)]
pub struct FileArg {
    /// Project file (.evp)
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project file to create (.evp)
    pub file: PathBuf,

    #[arg(long)]
    pub engineer: String,

    #[arg(long = "job")]
    pub job_id: String,

    #[arg(long, default_value = "")]
    pub client: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[arg(long)]
    pub substance: Option<String>,

    #[arg(long, requires = "substance")]
    pub maker: Option<String>,

    /// Build method of the element, narrows the offer
    #[arg(long)]
    pub build_method: Option<String>,

    /// Isolation method of the element, narrows the offer
    #[arg(long)]
    pub isolation: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ElementCommand {
    /// Add an element, creating its building type and space if needed
    Add(ElementAddArgs),
}

#[derive(Debug, Args)]
pub struct ElementAddArgs {
    pub file: PathBuf,

    #[arg(long)]
    pub building_type: String,

    #[arg(long)]
    pub space: String,

    #[arg(long)]
    pub name: String,

    /// wall, ceiling, floor, thermal-bridge
    #[arg(long = "type")]
    pub element_type: String,

    #[arg(long)]
    pub sub_type: Option<String>,

    #[arg(long)]
    pub outside_cover: Option<String>,

    #[arg(long)]
    pub build_method: Option<String>,

    #[arg(long)]
    pub isolation: Option<String>,

    /// dark-color or bright-color
    #[arg(long)]
    pub coverage: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum LayerCommand {
    /// Append a layer
    Add(LayerAddArgs),
    /// Change an existing layer
    Edit(LayerEditArgs),
    /// Move a layer within the current page view
    Move(LayerMoveArgs),
    /// Delete a layer
    Delete(LayerDeleteArgs),
    /// Print one page of layers
    List(LayerListArgs),
}

#[derive(Debug, Args)]
pub struct ElementRef {
    pub file: PathBuf,

    /// Element id
    #[arg(long)]
    pub element: Uuid,
}

#[derive(Debug, Args)]
pub struct LayerFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub substance: Option<String>,

    #[arg(long)]
    pub maker: Option<String>,

    #[arg(long)]
    pub product: Option<String>,

    /// Thickness in cm (defaults to the product's minimum)
    #[arg(long)]
    pub thickness: Option<String>,
}

#[derive(Debug, Args)]
pub struct LayerAddArgs {
    #[command(flatten)]
    pub target: ElementRef,

    #[command(flatten)]
    pub fields: LayerFields,
}

#[derive(Debug, Args)]
pub struct LayerEditArgs {
    #[command(flatten)]
    pub target: ElementRef,

    /// 0-based layer index
    #[arg(long)]
    pub index: usize,

    #[command(flatten)]
    pub fields: LayerFields,
}

#[derive(Debug, Args)]
pub struct LayerMoveArgs {
    #[command(flatten)]
    pub target: ElementRef,

    /// 1-based page the indices refer to
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// In-page index of the layer to move
    #[arg(long)]
    pub from: usize,

    /// In-page index to move it to
    #[arg(long)]
    pub to: usize,
}

#[derive(Debug, Args)]
pub struct LayerDeleteArgs {
    #[command(flatten)]
    pub target: ElementRef,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// In-page index of the layer to delete
    #[arg(long)]
    pub index: usize,
}

#[derive(Debug, Args)]
pub struct LayerListArgs {
    #[command(flatten)]
    pub target: ElementRef,

    #[arg(long, default_value_t = 1)]
    pub page: usize,
}
