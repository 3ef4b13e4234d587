//! Tracked refresh timer handles.

use std::sync::{Mutex, PoisonError};

use tokio::task::JoinHandle;

/// Owner of a set of background task handles.
///
/// Arming a new set aborts the previous one first, so re-initialising never
/// stacks timers.
#[derive(Debug, Default)]
pub struct RefreshTimers {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RefreshTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the armed set, aborting whatever was armed before.
    pub fn replace(&self, handles: Vec<JoinHandle<()>>) {
        let previous = {
            let mut guard = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, handles)
        };
        for handle in previous {
            handle.abort();
        }
    }

    /// Abort every armed task.
    pub fn cancel(&self) {
        self.replace(Vec::new());
    }

    /// Number of armed tasks still running.
    pub fn active(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }
}

impl Drop for RefreshTimers {
    fn drop(&mut self) {
        let handles = self.handles.get_mut().unwrap_or_else(PoisonError::into_inner);
        for handle in handles.drain(..) {
            handle.abort();
        }
    }
}
