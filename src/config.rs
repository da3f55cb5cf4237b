//! Runtime settings: validated form of the global CLI options.
//!
//! Every option can also come from a `KNOWFETCH_*` environment
//! variable (see `cli.rs`). Validation happens once, before any
//! session starts.

use std::path::PathBuf;

use crate::cli::SettingsArgs;
use crate::session::ActionSettings;

/// Filename suggested for downloads whose URL has no usable path segment.
pub const DEFAULT_FILENAME: &str = "knowunity.pdf";

/// Title handed to the share target.
pub const DEFAULT_SHARE_TITLE: &str = "KnowUnity URL";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base {value:?}: {reason}")]
    InvalidApiBase { value: String, reason: String },
    #[error("invalid default filename {0:?}: must be non-empty and contain no path separator")]
    InvalidFilename(String),
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the metadata service, without trailing slash.
    pub api_base: String,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
    /// Fallback download filename.
    pub default_filename: String,
    /// Title passed to the share target.
    pub share_title: String,
    /// Program and arguments used as share target; sharing is
    /// unavailable when unset.
    pub share_command: Option<Vec<String>>,
    /// Clipboard writer override; detected from the session type when unset.
    pub clipboard_command: Option<Vec<String>>,
    /// URL opener override.
    pub opener: Option<String>,
}

impl Settings {
    /// Validate parsed CLI options.
    pub fn from_args(args: &SettingsArgs) -> Result<Self, ConfigError> {
        let api_base = validate_api_base(&args.api_base)?;

        let default_filename = args.default_filename.trim().to_string();
        if default_filename.is_empty() || default_filename.contains(['/', '\\']) {
            return Err(ConfigError::InvalidFilename(args.default_filename.clone()));
        }

        Ok(Self {
            api_base,
            download_dir: args.download_dir.clone(),
            default_filename,
            share_title: args.share_title.clone(),
            share_command: args.share_command.as_deref().and_then(split_command),
            clipboard_command: args.clipboard_command.as_deref().and_then(split_command),
            opener: args
                .opener
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// The subset of settings the session controller needs.
    pub fn action_settings(&self) -> ActionSettings {
        ActionSettings {
            share_title: self.share_title.clone(),
            default_filename: self.default_filename.clone(),
        }
    }
}

/// Require an absolute http(s) URL without query or fragment; strip
/// any trailing slash.
fn validate_api_base(value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidApiBase {
        value: value.to_string(),
        reason,
    };
    let parsed = url::Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other}"))),
    }
    if parsed.query().is_some() {
        return Err(invalid("query strings are not allowed".into()));
    }
    if parsed.fragment().is_some() {
        return Err(invalid("fragments are not allowed".into()));
    }
    Ok(value.trim_end_matches('/').to_string())
}

/// Split a command line on whitespace. Blank input means "unset".
fn split_command(line: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() { None } else { Some(parts) }
}
