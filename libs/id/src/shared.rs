//! Atomically swappable settings handle.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::settings::Settings;

/// Settings shared between concurrent resolvers and a reloader.
///
/// Uses ArcSwap for lock-free replacement. Readers take a snapshot and keep
/// using it for the whole request, so they never observe a mix of old
/// defaults and new project sections.
pub struct SharedSettings {
    current: ArcSwap<Settings>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// Returns the settings in effect right now.
    pub fn snapshot(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Replaces the settings in a single pointer swap.
    ///
    /// Snapshots already handed out keep the old value until dropped.
    /// Returns the replaced settings.
    pub fn replace(&self, settings: Settings) -> Arc<Settings> {
        self.current.swap(Arc::new(settings))
    }
}

impl From<Settings> for SharedSettings {
    fn from(settings: Settings) -> Self {
        Self::new(settings)
    }
}

impl std::fmt::Debug for SharedSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSettings")
            .field("current", &*self.current.load())
            .finish()
    }
}
