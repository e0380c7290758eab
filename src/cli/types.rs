use clap::{Parser, Subcommand};
use outbox::validation::clap_destination_validator;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "
  ┌─┐┬ ┬┌┬┐┌┐ ┌─┐─┐ ┬
  │ ││ │ │ ├┴┐│ │┌┴┬┘
  └─┘└─┘ ┴ └─┘└─┘┴ └─

{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

#[derive(Parser)]
#[command(name = "outbox")]
#[command(about = "Scheduled, retrying post publisher", long_about = None)]
#[command(version)]
#[command(help_template = HELP_TEMPLATE)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Path to the config file (default: ./outbox.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish (or draft) a single post file
    Publish {
        /// Post file (.yaml, .yml or .json)
        path: PathBuf,

        /// Publish even if the file is marked as a draft
        #[arg(long)]
        publish: bool,

        /// Directory for draft renders (default: the outbox directory)
        #[arg(long)]
        render_dir: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate post files and report lint warnings
    Check {
        /// Post files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Report whether a post file is due now
    Due {
        /// Post file to inspect
        path: PathBuf,
    },

    /// Poll a directory and publish post files as they come due
    Watch {
        /// Directory containing post files
        dir: PathBuf,

        /// Publish files even if they are marked as drafts
        #[arg(long)]
        publish: bool,
    },

    /// Show recent audit records
    Log {
        /// Number of records to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Show the error log instead of the results log
        #[arg(long)]
        errors: bool,
    },

    /// List the labels a destination offers
    Labels {
        /// Destination name
        #[arg(value_parser = clap_destination_validator)]
        destination: String,
    },
}
