//! Session state: current input, latest resolution, request tokens.
//!
//! All methods are pure state transitions with no I/O. The controller
//! turns their return values into lookups and notifications.
//!
//! Every change to the input bumps a generation counter. A lookup
//! carries the generation it was issued under and its result is
//! applied only if the generation is unchanged when it completes, so
//! a slow response for old input can never overwrite newer state.

use serde::Serialize;

use crate::extract::{Identifier, extract};
use crate::lookup::{LookupError, ResolvedContent};

/// Generation a lookup was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// What the controller needs to run one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub token: RequestToken,
    pub identifier: Identifier,
}

/// Result of [`Session::begin_resolve`].
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveStart {
    /// Input is empty; resolving is not possible.
    EmptyInput,
    /// No identifier in the input. The input has been cleared.
    Rejected,
    /// Run this lookup.
    Issued(LookupTicket),
}

/// Result of [`Session::complete_resolve`].
#[derive(Debug, PartialEq, Eq)]
pub enum Completion {
    /// The content is now the session's resolved content.
    Applied,
    /// The lookup failed; the session has no resolved content.
    Failed(LookupError),
    /// The input changed since the lookup was issued; nothing applied.
    Stale,
}

/// Derived lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Editing,
    Resolving,
    Resolved,
}

/// Read-only snapshot for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub raw_input: String,
    pub phase: Phase,
    pub resolved: Option<ResolvedContent>,
    /// Copy/share/open/download do something only when this is set.
    pub actions_enabled: bool,
}

/// Input and resolution state of one session.
///
/// Owned exclusively by the controller loop. No concurrent access.
#[derive(Debug, Default)]
pub struct Session {
    raw_input: String,
    resolved: Option<ResolvedContent>,
    /// Bumped on every input change and every issued lookup.
    generation: u64,
    /// Token of the lookup issued under the current generation, if it
    /// has not completed yet.
    pending: Option<RequestToken>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolved(&self) -> Option<&ResolvedContent> {
        self.resolved.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Resolving
        } else if self.resolved.is_some() {
            Phase::Resolved
        } else if self.raw_input.is_empty() {
            Phase::Empty
        } else {
            Phase::Editing
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            raw_input: self.raw_input.clone(),
            phase: self.phase(),
            resolved: self.resolved.clone(),
            actions_enabled: self.resolved.is_some(),
        }
    }

    /// Replace the input. Any resolved content is discarded and any
    /// in-flight lookup becomes stale.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.raw_input = text.into();
        self.reset_resolution();
    }

    /// Start resolving the current input.
    pub fn begin_resolve(&mut self) -> ResolveStart {
        if self.raw_input.is_empty() {
            return ResolveStart::EmptyInput;
        }

        let Some(identifier) = extract(&self.raw_input) else {
            self.raw_input.clear();
            self.reset_resolution();
            return ResolveStart::Rejected;
        };

        let token = self.bump();
        self.pending = Some(token);
        ResolveStart::Issued(LookupTicket { token, identifier })
    }

    /// Apply the outcome of a lookup issued under `token`.
    pub fn complete_resolve(
        &mut self,
        token: RequestToken,
        outcome: Result<ResolvedContent, LookupError>,
    ) -> Completion {
        if token != self.current_token() {
            return Completion::Stale;
        }
        self.pending = None;
        match outcome {
            Ok(content) => {
                self.resolved = Some(content);
                Completion::Applied
            }
            Err(e) => {
                self.resolved = None;
                Completion::Failed(e)
            }
        }
    }

    /// Forget a lookup that ended without an outcome. Resolved content
    /// is left as it was.
    pub fn abandon(&mut self, token: RequestToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }

    /// Reset to empty. Returns `false` (and changes nothing) if the
    /// input was already empty.
    pub fn clear(&mut self) -> bool {
        if self.raw_input.is_empty() {
            return false;
        }
        self.raw_input.clear();
        self.reset_resolution();
        true
    }

    fn reset_resolution(&mut self) {
        self.resolved = None;
        self.pending = None;
        self.bump();
    }

    fn bump(&mut self) -> RequestToken {
        self.generation += 1;
        self.current_token()
    }

    fn current_token(&self) -> RequestToken {
        RequestToken(self.generation)
    }
}
