use tracing::{info, warn};

pub const UNKNOWN_ERROR: &str = "Some unknown error occurred";
pub const VIEW_TYPE_UNSUPPORTED: &str = "Toggle not implemented/supported yet.";

/// How long a toast stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastDuration {
    Short,
    Long,
    /// Until dismissed or its action is taken
    Indefinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Info,
    Error,
    Warning,
    Play,
    Queue,
    Playlist,
    Delete,
    Favorite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Default,
    Warning,
    Error,
}

/// What the user did with a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Dismissed,
    Performed,
}

/// A user facing message, optionally carrying an action button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub title: Option<String>,
    pub icon: Option<Icon>,
    pub accent: Accent,
    pub duration: ToastDuration,
    pub action: Option<String>,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Toast {
            message: message.into(),
            title: None,
            icon: None,
            accent: Accent::Default,
            duration: ToastDuration::Short,
            action: None,
        }
    }

    /// The generic failure toast shown when a list cannot be loaded
    pub fn unknown_error() -> Self {
        Toast::new(UNKNOWN_ERROR)
            .icon(Icon::Error)
            .accent(Accent::Error)
            .duration(ToastDuration::Indefinite)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast::new(message).icon(Icon::Error).accent(Accent::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Toast::new(message).icon(Icon::Warning).accent(Accent::Warning)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn accent(mut self, accent: Accent) -> Self {
        self.accent = accent;
        self
    }

    pub fn duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Offer an action button labelled `label`
    pub fn action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }
}

/// The toast / snackbar channel of the host application
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Show a toast, resolving once the user acted on it or it went away
    async fn notify(&self, toast: Toast) -> UserAction;
}

/// Notifier that only logs; every toast counts as dismissed
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, toast: Toast) -> UserAction {
        match toast.accent {
            Accent::Error | Accent::Warning => warn!("{}", toast.message),
            Accent::Default => info!("{}", toast.message),
        }
        UserAction::Dismissed
    }
}
