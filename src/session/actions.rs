//! Post-resolution actions: copy, share, open, download.
//!
//! Each action is a no-op (no capability call, no notification) until
//! the session holds resolved content. Failures are local to the
//! action and never change session state.

use std::sync::Arc;

use crate::resolver::{Availability, CapabilityError, ShareRequest};

use super::{Controller, SessionError};

const COPIED: &str = "URL copied to clipboard";

impl Controller {
    fn content_url(&self) -> Option<String> {
        self.session.resolved().map(|c| c.content_url.clone())
    }

    /// Copy the content URL. The write runs as a task; its outcome is
    /// reported to the user by [`Controller::finish_copy`].
    pub(super) fn copy(&mut self) {
        let Some(url) = self.content_url() else {
            return;
        };
        let clipboard = Arc::clone(&self.capabilities.clipboard);
        self.copies.spawn(async move {
            let outcome = clipboard.write(&url).await;
            if outcome.is_ok() {
                tracing::info!(%url, "copied to clipboard");
            }
            outcome
        });
    }

    pub(super) fn finish_copy(&mut self, outcome: Result<(), CapabilityError>) {
        match outcome {
            Ok(()) => {
                self.notifier.success(COPIED);
            }
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.notifier.error(SessionError::ClipboardFailed(e));
            }
        }
    }

    /// Hand the content URL to the share target.
    ///
    /// Only a missing share capability is reported to the user; the
    /// share outcome itself is logged.
    pub(super) fn share(&mut self) {
        let Some(url) = self.content_url() else {
            return;
        };
        if self.capabilities.share.availability() == Availability::Unavailable {
            self.notifier.error(SessionError::CapabilityUnsupported("Native share"));
            return;
        }

        let share = Arc::clone(&self.capabilities.share);
        let request = ShareRequest {
            title: self.settings.share_title.clone(),
            url,
        };
        self.background.spawn(async move {
            match share.share(&request).await {
                Ok(()) => tracing::info!(url = %request.url, "shared"),
                Err(e) => tracing::warn!(error = %e, "share failed"),
            }
        });
    }

    /// Open the content URL in a new browsing context.
    pub(super) fn open(&mut self) {
        let Some(url) = self.content_url() else {
            return;
        };
        if let Err(e) = self.capabilities.navigator.open(&url) {
            tracing::warn!(error = %e, %url, "open failed");
        }
    }

    /// Save the content locally under a filename derived from its URL.
    pub(super) fn download(&mut self) {
        let Some(url) = self.content_url() else {
            return;
        };
        let filename = suggested_filename(&url, &self.settings.default_filename);
        let saver = Arc::clone(&self.capabilities.saver);
        self.background.spawn(async move {
            match saver.save(&url, &filename).await {
                Ok(path) => tracing::info!(path = %path.display(), "downloaded"),
                Err(e) => tracing::warn!(error = %e, %url, "download failed"),
            }
        });
    }
}

/// Filename for saving `url`: its final path segment, or `default`
/// when that segment is empty or the URL has no path.
///
/// Query and fragment never leak into the name.
pub fn suggested_filename(url: &str, default: &str) -> String {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().map(str::to_string)
        }
    };
    segment
        .filter(|s| !s.is_empty() && s != "." && s != "..")
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::ResolvedContent;
    use crate::notify::{NotificationEvent, NotificationKind};
    use crate::session::SessionHandle;
    use crate::test_support::Fakes;
    use std::time::Duration;
    use tokio::sync::mpsc;

    const ID: &str = "1234ABCD-12ab-34cd-56ef-1234567890ab";
    const DEFAULT: &str = "knowunity.pdf";

    // -- Filename --

    #[test]
    fn filename_from_final_segment() {
        assert_eq!(
            suggested_filename("https://cdn/folder/report.pdf", DEFAULT),
            "report.pdf"
        );
    }

    #[test]
    fn filename_falls_back_without_segment() {
        assert_eq!(suggested_filename("https://cdn/", DEFAULT), DEFAULT);
        assert_eq!(suggested_filename("https://cdn", DEFAULT), DEFAULT);
        assert_eq!(suggested_filename("https://cdn/folder/", DEFAULT), DEFAULT);
    }

    #[test]
    fn filename_ignores_query() {
        assert_eq!(
            suggested_filename("https://cdn/a/b.pdf?X-Amz-Signature=abc#page=2", DEFAULT),
            "b.pdf"
        );
    }

    #[test]
    fn filename_from_unparsable_url() {
        assert_eq!(suggested_filename("cdn/files/x.pdf?t=1", DEFAULT), "x.pdf");
        assert_eq!(suggested_filename("", DEFAULT), DEFAULT);
    }

    // -- Actions on resolved content --

    async fn resolved(
        fakes: &Fakes,
        content_url: &str,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<NotificationEvent>) {
        fakes.service.respond(
            ID,
            Ok(ResolvedContent {
                content_url: content_url.into(),
                preview_url: "https://cdn/thumb.jpg".into(),
            }),
        );
        let (session, mut rx) = fakes.spawn();
        session.set_input(ID).unwrap();
        session.resolve().unwrap();
        session.settled().await.unwrap();
        while rx.try_recv().is_ok() {}
        (session, rx)
    }

    fn only_posted(
        rx: &mut mpsc::UnboundedReceiver<NotificationEvent>,
    ) -> crate::notify::Notification {
        let NotificationEvent::Posted(n) = rx.try_recv().unwrap() else {
            panic!("expected Posted");
        };
        assert!(rx.try_recv().is_err());
        n
    }

    #[tokio::test]
    async fn copy_success() {
        let fakes = Fakes::new();
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.copy().unwrap();
        session.settled().await.unwrap();

        assert_eq!(fakes.clipboard.writes(), vec!["https://cdn/a.pdf".to_string()]);
        let n = only_posted(&mut rx);
        assert_eq!(n.kind, NotificationKind::Success);
        assert_eq!(n.message, COPIED);
    }

    #[tokio::test]
    async fn copy_failure() {
        let fakes = Fakes::new();
        fakes.clipboard.fail_with("xclip missing");
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.copy().unwrap();
        let view = session.settled().await.unwrap();

        let n = only_posted(&mut rx);
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(
            n.error,
            Some(SessionError::ClipboardFailed(CapabilityError::Clipboard(
                "xclip missing".into()
            )))
        );
        // Action-local: the session keeps its content.
        assert!(view.resolved.is_some());
    }

    #[tokio::test]
    async fn pending_copy_does_not_block_session() {
        let fakes = Fakes::new();
        let gate = fakes.clipboard.gate();
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.copy().unwrap();
        session.set_input("edited").unwrap();
        let view = tokio::time::timeout(Duration::from_secs(2), session.snapshot())
            .await
            .expect("session answers while the clipboard write is pending")
            .unwrap();
        assert_eq!(view.raw_input, "edited");
        assert!(rx.try_recv().is_err());

        gate.notify_one();
        session.settled().await.unwrap();

        assert_eq!(fakes.clipboard.writes(), vec!["https://cdn/a.pdf".to_string()]);
        assert_eq!(only_posted(&mut rx).message, COPIED);
    }

    #[tokio::test]
    async fn share_unavailable_is_reported() {
        let fakes = Fakes::new();
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.share().unwrap();
        session.settled().await.unwrap();

        assert!(fakes.share.requests().is_empty());
        let n = only_posted(&mut rx);
        assert_eq!(
            n.error,
            Some(SessionError::CapabilityUnsupported("Native share"))
        );
        assert_eq!(n.message, "Native share not supported");
    }

    #[tokio::test]
    async fn share_available_is_silent() {
        let fakes = Fakes::new();
        fakes.share.set_availability(Availability::Available);
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.share().unwrap();
        session.settled().await.unwrap();

        assert_eq!(
            fakes.share.requests(),
            vec![ShareRequest {
                title: "KnowUnity URL".into(),
                url: "https://cdn/a.pdf".into(),
            }]
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn share_failure_is_only_logged() {
        let fakes = Fakes::new();
        fakes.share.set_availability(Availability::Available);
        fakes.share.fail_with("target closed");
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.share().unwrap();
        session.settled().await.unwrap();

        assert_eq!(fakes.share.requests().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn open_delegates_to_navigator() {
        let fakes = Fakes::new();
        let (session, mut rx) = resolved(&fakes, "https://cdn/a.pdf").await;

        session.open().unwrap();
        session.settled().await.unwrap();

        assert_eq!(fakes.navigator.opened(), vec!["https://cdn/a.pdf".to_string()]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn download_suggests_final_segment() {
        let fakes = Fakes::new();
        let (session, _rx) = resolved(&fakes, "https://cdn/folder/report.pdf").await;

        session.download().unwrap();
        session.settled().await.unwrap();

        assert_eq!(
            fakes.saver.saves(),
            vec![(
                "https://cdn/folder/report.pdf".to_string(),
                "report.pdf".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn download_falls_back_to_default_filename() {
        let fakes = Fakes::new();
        let (session, _rx) = resolved(&fakes, "https://cdn/").await;

        session.download().unwrap();
        session.settled().await.unwrap();

        assert_eq!(
            fakes.saver.saves(),
            vec![("https://cdn/".to_string(), DEFAULT.to_string())]
        );
    }
}
