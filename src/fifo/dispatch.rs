use std::sync::{Arc, RwLock};

use crate::config::{Config, TargetSelectionMode};
use crate::error::ChannelError;

/// Opaque identity of the window a command executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Lookup of candidate execution targets, provided by the window layer.
pub trait WindowRegistry: Send + Sync {
    fn last_focused(&self) -> Option<WindowId>;
    fn last_opened(&self) -> Option<WindowId>;
    fn last_visible(&self) -> Option<WindowId>;
}

/// Runs a command line in a window's context. Failures inside the command
/// itself are this capability's concern, not the channel's.
pub trait CommandExecutor: Send + Sync {
    fn run(&self, window: WindowId, command: &str);
}

/// Routes each received command line to the right window.
pub struct CommandDispatcher {
    config: Arc<RwLock<Config>>,
    windows: Arc<dyn WindowRegistry>,
    executor: Arc<dyn CommandExecutor>,
}

impl CommandDispatcher {
    pub fn new(
        config: Arc<RwLock<Config>>,
        windows: Arc<dyn WindowRegistry>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            config,
            windows,
            executor,
        }
    }

    /// Resolve the current target and run `line` there. The selection mode is
    /// read from config on every call, so a mode change applies to the next
    /// command. A failed lookup drops this one command; nothing is queued or
    /// retried, and the command text itself is never inspected.
    pub fn dispatch(&self, line: &str) -> Result<(), ChannelError> {
        let mode = self
            .config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .open_target;

        let window = match mode {
            TargetSelectionMode::LastFocused => self.windows.last_focused(),
            TargetSelectionMode::LastOpened => self.windows.last_opened(),
            TargetSelectionMode::LastVisible => self.windows.last_visible(),
        }
        .ok_or(ChannelError::NoTarget { mode })?;

        self.executor.run(window, line);
        Ok(())
    }
}
