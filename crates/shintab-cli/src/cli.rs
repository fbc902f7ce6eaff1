use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "shintab",
    about = "shintab — image store for the new-tab dashboard",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store directory holding the blob store and configuration file.
    #[arg(long, global = true, default_value = ".shintab")]
    pub store_dir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store layout
    Init,
    /// Upload image files
    Add(AddArgs),
    /// List uploaded images
    List(ListArgs),
    /// Remove one uploaded image
    Remove(RemoveArgs),
    /// Remove every uploaded image
    Clear,
    /// Repair drift between the index and the blob store
    Reconcile(ReconcileArgs),
    /// Show or change dashboard settings
    Settings(SettingsArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Image files to upload.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Emit the index as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Identifier of the image to remove.
    pub id: String,
}

#[derive(Args)]
pub struct ReconcileArgs {
    /// Also delete blobs no index entry references.
    #[arg(long)]
    pub sweep_orphans: bool,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Change settings, given as key=value pairs (e.g. blur=8,
    /// time_format=12h, randomize=false).
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}
