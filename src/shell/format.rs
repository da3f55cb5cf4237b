//! Terminal output for the front ends.
//!
//! Notifications go to stderr, results to stdout, so that
//! `knowfetch resolve <link> | xargs curl -O` works naturally.

use std::error::Error as _;

use tokio::sync::mpsc;

use crate::notify::{Notification, NotificationEvent, NotificationKind};
use crate::session::state::{Phase, SessionView};

/// Render one notification event as a status line. Dismissals render
/// as nothing.
pub fn render(event: &NotificationEvent) -> Option<String> {
    match event {
        NotificationEvent::Posted(n) | NotificationEvent::Updated(n) => {
            Some(render_notification(n))
        }
        NotificationEvent::Dismissed(_) => None,
    }
}

fn render_notification(n: &Notification) -> String {
    let tag = match n.kind {
        NotificationKind::Loading => "[..]",
        NotificationKind::Success => "[ok]",
        NotificationKind::Error => "[error]",
    };
    match n.error.as_ref().and_then(|e| e.source()) {
        Some(cause) => format!("{tag} {} ({cause})", n.message),
        None => format!("{tag} {}", n.message),
    }
}

/// Print notifications to stderr until the publisher goes away.
pub async fn render_notifications(mut rx: mpsc::UnboundedReceiver<NotificationEvent>) {
    while let Some(event) = rx.recv().await {
        if let Some(line) = render(&event) {
            eprintln!("{line}");
        }
    }
}

/// Print the resolved URLs, one per line.
pub fn print_resolved(view: &SessionView) {
    if let Some(resolved) = &view.resolved {
        println!("content: {}", resolved.content_url);
        println!("preview: {}", resolved.preview_url);
    }
}

/// Print the full session state for `show`.
pub fn print_view(view: &SessionView) {
    let input = if view.raw_input.is_empty() {
        "-"
    } else {
        view.raw_input.as_str()
    };
    println!("Input:   {input}");
    println!("Phase:   {}", phase_name(view.phase));
    match &view.resolved {
        Some(resolved) => {
            println!("Content: {}", resolved.content_url);
            println!("Preview: {}", resolved.preview_url);
        }
        None => println!("Content: -"),
    }
}

pub fn print_help() {
    println!("Paste a KnowUnity link or id to resolve it, or use a command:");
    println!("  set <text>   replace the input without resolving");
    println!("  resolve      resolve the current input");
    println!("  clear        clear input and result");
    println!("  copy         copy the content URL to the clipboard");
    println!("  share        share the content URL");
    println!("  open         open the content URL in the browser");
    println!("  download     save the content to the download directory");
    println!("  show         print the current state");
    println!("  help         print this help");
    println!("  quit         exit");
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Empty => "empty",
        Phase::Editing => "editing",
        Phase::Resolving => "resolving",
        Phase::Resolved => "resolved",
    }
}
