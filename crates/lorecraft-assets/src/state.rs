//! Per-asset load bookkeeping.

use std::sync::Arc;

/// Where one lazily loaded asset stands.
///
/// Failures are not terminal: the next request for a failed asset loads it
/// again, and `attempts` counts how often that has gone wrong in a row.
#[derive(Debug, Clone, Default)]
pub enum AssetState<T> {
    #[default]
    Unloaded,
    Loading,
    Ready(Arc<T>),
    Failed { message: Arc<str>, attempts: u32 },
}

impl<T> AssetState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready(_))
    }

    /// True when a request should start a load.
    pub fn needs_load(&self) -> bool {
        matches!(self, AssetState::Unloaded | AssetState::Failed { .. })
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        match self {
            AssetState::Ready(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AssetState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Consecutive failed loads, 0 unless the state is `Failed`.
    pub fn failed_attempts(&self) -> u32 {
        match self {
            AssetState::Failed { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    /// The state after a failed load that started from `self`.
    pub fn fail(&self, message: impl Into<Arc<str>>) -> Self {
        AssetState::Failed {
            message: message.into(),
            attempts: self.failed_attempts() + 1,
        }
    }
}

/// Payload-free view of an [`AssetState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

impl<T> From<&AssetState<T>> for LoadState {
    fn from(state: &AssetState<T>) -> Self {
        match state {
            AssetState::Unloaded => LoadState::NotLoaded,
            AssetState::Loading => LoadState::Loading,
            AssetState::Ready(_) => LoadState::Loaded,
            AssetState::Failed { .. } => LoadState::Failed,
        }
    }
}
