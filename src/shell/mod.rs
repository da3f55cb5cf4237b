//! Terminal front ends: one-shot commands and the interactive shell.
//!
//! Both build the same stack: HTTP metadata service, desktop
//! capabilities, a session controller, and a renderer task printing
//! notifications to stderr.

mod format;

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::extract::extract;
use crate::lookup::HttpMetadataService;
use crate::notify::Notifier;
use crate::resolver::desktop;
use crate::session::{Controller, SessionClosed, SessionHandle};

/// Front-end error type.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Closed(#[from] SessionClosed),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no identifier found in input")]
    NoIdentifier,
    #[error("link could not be resolved")]
    Unresolved,
    #[error("{0}")]
    Usage(String),
}

/// Actions requested on the `resolve` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    pub copy: bool,
    pub share: bool,
    pub open: bool,
    pub download: bool,
    pub json: bool,
}

/// Print the identifier found in `input`.
pub fn run_extract(input: &str) -> Result<(), ShellError> {
    let identifier = extract(input).ok_or(ShellError::NoIdentifier)?;
    println!("{identifier}");
    Ok(())
}

/// Resolve `input` once, run the requested actions, print the result.
pub async fn run_resolve(
    settings: &Settings,
    input: String,
    options: ResolveOptions,
) -> Result<(), ShellError> {
    let running = Running::start(settings)?;
    let session = running.handle.clone();

    session.set_input(input)?;
    session.resolve()?;
    let view = session.settled().await?;
    if view.resolved.is_none() {
        drop(session);
        running.shutdown().await;
        return Err(ShellError::Unresolved);
    }

    if options.copy {
        session.copy()?;
    }
    if options.share {
        session.share()?;
    }
    if options.open {
        session.open()?;
    }
    if options.download {
        session.download()?;
    }
    let view = session.settled().await?;

    drop(session);
    running.shutdown().await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        format::print_resolved(&view);
    }
    Ok(())
}

/// Interactive session over stdin lines. Returns on EOF or `quit`.
pub async fn run_shell(settings: &Settings) -> Result<(), ShellError> {
    let running = Running::start(settings)?;
    let session = running.handle.clone();

    format::print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => dispatch(&session, command).await?,
            Err(e) => eprintln!("{e}"),
        }
    }

    drop(session);
    running.shutdown().await;
    Ok(())
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    /// Replace the input without resolving.
    Set(String),
    /// A pasted link: set it and resolve right away.
    Paste(String),
    Resolve,
    Clear,
    Copy,
    Share,
    Open,
    Download,
    Show,
    Help,
    Quit,
}

/// Parse a shell line. Blank lines yield `None`. A line whose first
/// word is not a command is a pasted link.
fn parse_line(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let bare = |command: ShellCommand| {
        if rest.is_empty() {
            Ok(Some(command))
        } else {
            Err(ShellError::Usage(format!("{verb} takes no arguments")))
        }
    };

    match verb.to_ascii_lowercase().as_str() {
        "set" => {
            if rest.is_empty() {
                Err(ShellError::Usage("usage: set <link or id>".into()))
            } else {
                Ok(Some(ShellCommand::Set(rest.to_string())))
            }
        }
        "resolve" => bare(ShellCommand::Resolve),
        "clear" => bare(ShellCommand::Clear),
        "copy" => bare(ShellCommand::Copy),
        "share" => bare(ShellCommand::Share),
        "open" => bare(ShellCommand::Open),
        "download" => bare(ShellCommand::Download),
        "show" => bare(ShellCommand::Show),
        "help" | "?" => bare(ShellCommand::Help),
        "quit" | "exit" => bare(ShellCommand::Quit),
        _ => Ok(Some(ShellCommand::Paste(line.to_string()))),
    }
}

async fn dispatch(session: &SessionHandle, command: ShellCommand) -> Result<(), ShellError> {
    match command {
        ShellCommand::Set(text) => session.set_input(text)?,
        ShellCommand::Paste(text) => {
            session.set_input(text)?;
            session.resolve()?;
        }
        ShellCommand::Resolve => session.resolve()?,
        ShellCommand::Clear => session.clear()?,
        ShellCommand::Copy => session.copy()?,
        ShellCommand::Share => session.share()?,
        ShellCommand::Open => session.open()?,
        ShellCommand::Download => session.download()?,
        ShellCommand::Show => format::print_view(&session.snapshot().await?),
        ShellCommand::Help => format::print_help(),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// A running controller plus its notification renderer.
struct Running {
    handle: SessionHandle,
    controller: JoinHandle<()>,
    renderer: JoinHandle<()>,
}

impl Running {
    fn start(settings: &Settings) -> Result<Self, ShellError> {
        let service = HttpMetadataService::new(&settings.api_base)?;
        let capabilities = desktop::capabilities(settings)?;
        let (notifier, notifications) = Notifier::channel();

        let controller = Controller::new(
            Arc::new(service),
            capabilities,
            notifier,
            settings.action_settings(),
        );
        let (handle, controller) = controller.spawn();
        let renderer = tokio::spawn(format::render_notifications(notifications));

        tracing::debug!(api_base = %settings.api_base, "session started");
        Ok(Self {
            handle,
            controller,
            renderer,
        })
    }

    /// Drop the last handle, wait for in-flight work, flush output.
    async fn shutdown(self) {
        drop(self.handle);
        if let Err(e) = self.controller.await {
            tracing::error!(error = %e, "session controller panicked");
        }
        let _ = self.renderer.await;
    }
}
