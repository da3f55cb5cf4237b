//! Command share provider: hand the URL to a user-configured program.
//!
//! Desktops have no universal share sheet. Sharing is available only
//! when the user configured a command (for example
//! `kdeconnect-cli --share`); the URL is appended as the last argument.

use std::process::Stdio;

use futures::future::BoxFuture;
use tokio::process::Command;

use crate::resolver::{Availability, CapabilityError, ShareProvider, ShareRequest};

pub struct CommandShare {
    argv: Option<Vec<String>>,
}

impl CommandShare {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv: argv.filter(|a| !a.is_empty()),
        }
    }
}

impl ShareProvider for CommandShare {
    fn availability(&self) -> Availability {
        if self.argv.is_some() {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    fn share<'a>(
        &'a self,
        request: &'a ShareRequest,
    ) -> BoxFuture<'a, Result<(), CapabilityError>> {
        Box::pin(async move {
            let Some((program, args)) = self.argv.as_deref().and_then(<[String]>::split_first)
            else {
                return Err(CapabilityError::Share("no share command configured".into()));
            };

            let status = Command::new(program)
                .args(args)
                .arg(&request.url)
                .env("KNOWFETCH_SHARE_TITLE", &request.title)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await
                .map_err(|e| CapabilityError::Share(format!("failed to run {program}: {e}")))?;

            if status.success() {
                Ok(())
            } else {
                Err(CapabilityError::Share(format!(
                    "{program} exited with status {status}"
                )))
            }
        })
    }
}
