//! Resolution session: input, lookup, and post-resolution actions.
//!
//! Architecture: channel-based actor. A single controller loop owns
//! the [`state::Session`] and all mutable state. Front ends hold a
//! cloneable [`SessionHandle`] and send [`SessionCommand`]s over an
//! mpsc channel. Lookups, clipboard writes and background actions
//! (share, download) run as tasks in `JoinSet`s owned by the
//! controller; their outcomes
//! re-enter the loop through `select!`, so the session is never
//! mutated from anywhere but the loop.
//!
//! Status is reported through [`Notifier`]; nothing here renders.

mod actions;
pub mod state;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};

use crate::lookup::{LookupError, MetadataService, ResolvedContent};
use crate::notify::{NotificationId, Notifier};
use crate::resolver::{CapabilityError, CapabilitySet};
use state::{Completion, RequestToken, ResolveStart, Session, SessionView};

const FETCHING: &str = "Fetching URL";
const FETCHED: &str = "URL fetched";
const CLEARED: &str = "URL cleared";

/// Errors surfaced to the user through notifications.
///
/// None of these is fatal; the session stays usable after each.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The input contains no document identifier.
    #[error("Invalid KnowUnity link. Make sure that a correct URL or ID is entered.")]
    InvalidInput,

    /// The metadata lookup failed; resolving again may succeed.
    #[error("Failed to fetch URL. Please try again later.")]
    LookupFailed(#[source] LookupError),

    #[error("Failed to copy URL to clipboard")]
    ClipboardFailed(#[source] CapabilityError),

    /// The environment offers no implementation of the capability.
    #[error("{0} not supported")]
    CapabilityUnsupported(&'static str),
}

/// The controller loop has stopped; the handle is useless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("session controller stopped")]
pub struct SessionClosed;

/// Settings the post-resolution actions need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSettings {
    /// Title handed to the share target.
    pub share_title: String,
    /// Download filename when the content URL has no usable segment.
    pub default_filename: String,
}

/// Commands accepted by the controller loop.
#[derive(Debug)]
pub enum SessionCommand {
    SetInput(String),
    Resolve,
    Clear,
    Copy,
    Share,
    Open,
    Download,
    /// Reply with the current view.
    Snapshot(oneshot::Sender<SessionView>),
    /// Reply once no lookup or background action is in flight.
    Settled(oneshot::Sender<SessionView>),
}

/// Outcome of one lookup task, routed back into the loop.
struct LookupDone {
    token: RequestToken,
    notice: NotificationId,
    /// `None` if the service panicked.
    outcome: Option<Result<ResolvedContent, LookupError>>,
}

/// Owns the session and everything that may touch it.
pub struct Controller {
    session: Session,
    service: Arc<dyn MetadataService>,
    capabilities: CapabilitySet,
    notifier: Notifier,
    settings: ActionSettings,
    lookups: JoinSet<LookupDone>,
    copies: JoinSet<Result<(), CapabilityError>>,
    background: JoinSet<()>,
    idle_waiters: Vec<oneshot::Sender<SessionView>>,
}

impl Controller {
    pub fn new(
        service: Arc<dyn MetadataService>,
        capabilities: CapabilitySet,
        notifier: Notifier,
        settings: ActionSettings,
    ) -> Self {
        Self {
            session: Session::new(),
            service,
            capabilities,
            notifier,
            settings,
            lookups: JoinSet::new(),
            copies: JoinSet::new(),
            background: JoinSet::new(),
            idle_waiters: Vec::new(),
        }
    }

    /// Spawn the controller loop and return a handle to it.
    ///
    /// The loop exits once every handle is dropped and all in-flight
    /// work has finished.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(rx));
        (SessionHandle { tx }, task)
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },

                Some(joined) = self.lookups.join_next() => match joined {
                    Ok(done) => self.finish_lookup(done),
                    Err(e) => tracing::error!(error = %e, "lookup task failed"),
                },

                Some(joined) = self.copies.join_next() => match joined {
                    Ok(outcome) => self.finish_copy(outcome),
                    Err(e) => tracing::error!(error = %e, "clipboard task failed"),
                },

                Some(joined) = self.background.join_next() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "background action failed");
                    }
                }
            }
            self.wake_idle_waiters();
        }

        // Handles are gone; let in-flight work finish so downloads are
        // not cut off on exit.
        while let Some(joined) = self.lookups.join_next().await {
            if let Ok(done) = joined {
                self.finish_lookup(done);
            }
        }
        while let Some(joined) = self.copies.join_next().await {
            if let Ok(outcome) = joined {
                self.finish_copy(outcome);
            }
        }
        while self.background.join_next().await.is_some() {}
        tracing::debug!("session controller stopped");
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetInput(text) => self.session.set_input(text),
            SessionCommand::Resolve => self.resolve(),
            SessionCommand::Clear => self.clear(),
            SessionCommand::Copy => self.copy(),
            SessionCommand::Share => self.share(),
            SessionCommand::Open => self.open(),
            SessionCommand::Download => self.download(),
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(self.session.view());
            }
            SessionCommand::Settled(reply) => self.idle_waiters.push(reply),
        }
    }

    fn resolve(&mut self) {
        let ticket = match self.session.begin_resolve() {
            ResolveStart::EmptyInput => {
                tracing::debug!("resolve ignored: input is empty");
                return;
            }
            ResolveStart::Rejected => {
                tracing::debug!("resolve rejected: no identifier in input");
                self.notifier.error(SessionError::InvalidInput);
                return;
            }
            ResolveStart::Issued(ticket) => ticket,
        };

        let notice = self.notifier.loading(FETCHING);
        tracing::info!(identifier = %ticket.identifier, "resolving");

        let service = Arc::clone(&self.service);
        let token = ticket.token;
        let identifier = ticket.identifier;
        self.lookups.spawn(async move {
            let outcome = AssertUnwindSafe(service.lookup(&identifier))
                .catch_unwind()
                .await
                .ok();
            LookupDone {
                token,
                notice,
                outcome,
            }
        });
    }

    fn finish_lookup(&mut self, done: LookupDone) {
        let Some(outcome) = done.outcome else {
            tracing::error!("metadata service panicked");
            self.session.abandon(done.token);
            self.notifier.dismiss(done.notice);
            return;
        };

        match self.session.complete_resolve(done.token, outcome) {
            Completion::Applied => {
                if let Some(content) = self.session.resolved() {
                    tracing::info!(content_url = %content.content_url, "resolved");
                }
                self.notifier.update_success(done.notice, FETCHED);
            }
            Completion::Failed(e) => {
                tracing::warn!(error = %e, "lookup failed");
                self.notifier.update_error(done.notice, SessionError::LookupFailed(e));
            }
            Completion::Stale => {
                tracing::debug!("discarding lookup result for superseded input");
                self.notifier.dismiss(done.notice);
            }
        }
    }

    fn clear(&mut self) {
        if self.session.clear() {
            self.notifier.success(CLEARED);
        }
    }

    fn is_idle(&self) -> bool {
        self.lookups.is_empty() && self.copies.is_empty() && self.background.is_empty()
    }

    fn wake_idle_waiters(&mut self) {
        if self.idle_waiters.is_empty() || !self.is_idle() {
            return;
        }
        let view = self.session.view();
        for waiter in self.idle_waiters.drain(..) {
            let _ = waiter.send(view.clone());
        }
    }
}

/// Cloneable front-end handle to a running controller.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionCommand>,
}

impl SessionHandle {
    pub fn set_input(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(SessionCommand::SetInput(text.into()))
    }

    pub fn resolve(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Resolve)
    }

    pub fn clear(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Clear)
    }

    pub fn copy(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Copy)
    }

    pub fn share(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Share)
    }

    pub fn open(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Open)
    }

    pub fn download(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Download)
    }

    /// Current state, after every previously sent command was handled.
    pub async fn snapshot(&self) -> Result<SessionView, SessionClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx))?;
        rx.await.map_err(|_| SessionClosed)
    }

    /// State once all lookups and background actions have finished.
    pub async fn settled(&self) -> Result<SessionView, SessionClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Settled(tx))?;
        rx.await.map_err(|_| SessionClosed)
    }

    fn send(&self, command: SessionCommand) -> Result<(), SessionClosed> {
        self.tx.send(command).map_err(|_| SessionClosed)
    }
}
