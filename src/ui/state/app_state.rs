use tracing::error;

use crate::usecase::ports::source::FetchError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed { message: String },
}

impl ViewStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewStatus::Failed { message } => Some(message),
            _ => None,
        }
    }
}

pub fn failure_status(view: &str, err: &FetchError) -> ViewStatus {
    error!(view, error = %err, status = ?err.status_code(), "load failed");
    ViewStatus::Failed {
        message: format!("Failed to load {view}. Please try again."),
    }
}
