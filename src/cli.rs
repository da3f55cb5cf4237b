use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_FILENAME, DEFAULT_SHARE_TITLE};
use crate::lookup::DEFAULT_API_BASE;

#[derive(Parser)]
#[command(
    name = "knowfetch",
    about = "Resolve KnowUnity share links into direct content URLs"
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Base URL of the metadata service
    #[arg(long, global = true, env = "KNOWFETCH_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Directory downloads are saved to
    #[arg(long, global = true, env = "KNOWFETCH_DOWNLOAD_DIR", default_value = ".")]
    pub download_dir: PathBuf,

    /// Filename used when the content URL has no path segment
    #[arg(
        long,
        global = true,
        env = "KNOWFETCH_DEFAULT_FILENAME",
        default_value = DEFAULT_FILENAME
    )]
    pub default_filename: String,

    /// Title passed to the share command
    #[arg(long, global = true, env = "KNOWFETCH_SHARE_TITLE", default_value = DEFAULT_SHARE_TITLE)]
    pub share_title: String,

    /// Program used to share URLs (URL appended as last argument)
    #[arg(long, global = true, env = "KNOWFETCH_SHARE_COMMAND")]
    pub share_command: Option<String>,

    /// Program that reads clipboard content from stdin
    #[arg(long, global = true, env = "KNOWFETCH_CLIPBOARD_COMMAND")]
    pub clipboard_command: Option<String>,

    /// Program used to open URLs
    #[arg(long, global = true, env = "KNOWFETCH_OPENER")]
    pub opener: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the document identifier found in the input
    Extract {
        /// Share link or bare identifier
        input: String,
    },

    /// Resolve a link once and optionally act on the result
    Resolve {
        /// Share link or bare identifier
        input: String,

        /// Copy the content URL to the clipboard
        #[arg(long)]
        copy: bool,

        /// Open the content URL in the browser
        #[arg(long)]
        open: bool,

        /// Save the content to the download directory
        #[arg(long)]
        download: bool,

        /// Hand the content URL to the share command
        #[arg(long)]
        share: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Shell,
}
