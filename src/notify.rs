//! Transient toast notifications with timed auto-dismiss.

use crate::render::RenderPort;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl AlertKind {
    /// Unknown kinds fall back to `Info`
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "success" => Self::Success,
            "error" | "danger" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    pub fn css_class(&self) -> String {
        format!("alert alert-{}", self.as_str())
    }
}

/// Handle the port assigns to a displayed toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(pub u64);

/// A toast as handed to the port. `message` is plain text, never markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: AlertKind,
}

/// When a toast starts fading and how long the fade lasts before removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimings {
    pub dismiss_after: Duration,
    pub fade: Duration,
}

impl ToastTimings {
    /// General alerts: 5 s on screen, 300 ms slide-out
    pub const ALERT: ToastTimings = ToastTimings {
        dismiss_after: Duration::from_millis(5_000),
        fade: Duration::from_millis(300),
    };

    /// Success confirmations: 3 s, removed without a fade
    pub const SUCCESS: ToastTimings = ToastTimings {
        dismiss_after: Duration::from_millis(3_000),
        fade: Duration::ZERO,
    };
}

/// Show a toast and schedule its dismissal.
///
/// Dismissal runs on a detached thread; there is no handle to cancel it.
pub fn show_safe_alert<P>(port: &Arc<P>, message: &str, kind: AlertKind, timings: ToastTimings)
where
    P: RenderPort + ?Sized + 'static,
{
    let toast = Toast {
        message: message.to_string(),
        kind,
    };
    let id = port.show_toast(&toast);
    tracing::debug!(?id, kind = kind.as_str(), "toast shown");
    schedule_dismiss(Arc::clone(port), id, timings);
}

/// Success toast with the success timings
pub fn show_success<P>(port: &Arc<P>, message: &str, timings: ToastTimings)
where
    P: RenderPort + ?Sized + 'static,
{
    show_safe_alert(port, message, AlertKind::Success, timings);
}

fn schedule_dismiss<P>(port: Arc<P>, id: ToastId, timings: ToastTimings)
where
    P: RenderPort + ?Sized + 'static,
{
    thread::spawn(move || {
        thread::sleep(timings.dismiss_after);
        if !timings.fade.is_zero() {
            port.fade_toast(id);
            thread::sleep(timings.fade);
        }
        port.remove_toast(id);
        tracing::trace!(?id, "toast removed");
    });
}
