use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: None,
            message: message.into(),
            duration: DEFAULT_DURATION,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Sink for transient user-facing messages
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Uuid;

    /// Drop every active notification
    fn clear(&self);

    fn success(&self, message: &str) -> Uuid {
        self.notify(Notification::new(NotificationKind::Success, message))
    }

    fn error(&self, message: &str) -> Uuid {
        self.notify(Notification::new(NotificationKind::Error, message))
    }

    fn warning(&self, message: &str) -> Uuid {
        self.notify(Notification::new(NotificationKind::Warning, message))
    }

    fn info(&self, message: &str) -> Uuid {
        self.notify(Notification::new(NotificationKind::Info, message))
    }
}

/// Keeps notifications in memory until dismissed
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Vec<Notification> {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Returns false when `id` was not active
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) -> Uuid {
        let id = notification.id;
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
        id
    }

    fn clear(&self) {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Writes notifications to stderr as they arrive
#[derive(Debug)]
pub struct TerminalNotifier {
    errors: bool,
    messages: bool,
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self {
            errors: true,
            messages: true,
        }
    }
}

impl TerminalNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave errors to the caller's own reporting
    pub fn skip_errors(mut self) -> Self {
        self.errors = false;
        self
    }

    /// Drop everything except errors, used with `--json`
    pub fn quiet(mut self) -> Self {
        self.messages = false;
        self
    }

    fn render(notification: &Notification) -> String {
        let symbol = match notification.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
            NotificationKind::Warning => "!",
            NotificationKind::Info => "i",
        };
        match &notification.title {
            Some(title) => format!("{} {}: {}", symbol, title, notification.message),
            None => format!("{} {}", symbol, notification.message),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) -> Uuid {
        let show = match notification.kind {
            NotificationKind::Error => self.errors,
            _ => self.messages,
        };
        if show {
            let _ = writeln!(std::io::stderr(), "{}", Self::render(&notification));
        }
        notification.id
    }

    fn clear(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_tracks_and_dismisses() {
        let center = NotificationCenter::new();
        let saved = center.success("Record created");
        let failed = center.error("Could not save record");

        let active = center.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].kind, NotificationKind::Success);
        assert_eq!(active[0].duration, DEFAULT_DURATION);
        assert_ne!(saved, failed);

        assert!(center.dismiss(saved));
        assert!(!center.dismiss(saved));
        assert_eq!(center.active().len(), 1);

        center.clear();
        assert!(center.active().is_empty());
    }

    #[test]
    fn terminal_rendering_includes_title() {
        let n = Notification::new(NotificationKind::Warning, "Disk almost full")
            .with_title("Storage")
            .with_duration(Duration::from_secs(1));
        assert_eq!(TerminalNotifier::render(&n), "! Storage: Disk almost full");
        assert_eq!(n.duration, Duration::from_secs(1));
    }
}
