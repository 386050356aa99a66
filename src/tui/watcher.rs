//! Live reload of the open document.

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use crate::search::Debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Quiet period after the last relevant event before reloading.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

pub struct FileWatcher {
    watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    path: PathBuf,
    reload: Debouncer,
}

impl FileWatcher {
    /// Watch `path` for writes.
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching for changes");

        Ok(Self {
            watcher,
            receiver: rx,
            path: path.to_path_buf(),
            reload: Debouncer::new(RELOAD_DEBOUNCE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events. True once the file has been quiet for
    /// [`RELOAD_DEBOUNCE`] after a change.
    pub fn check_for_changes(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => changed |= is_relevant(&event, &self.path),
                Ok(Err(e)) => tracing::debug!("watch error: {}", e),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        settle(&mut self.reload, changed, Instant::now())
    }

    /// Some editors replace the file instead of writing it; the old inode is
    /// gone, so watch the path again.
    pub fn rewatch(&mut self) {
        let _ = self.watcher.unwatch(&self.path);
        if let Err(e) = self.watcher.watch(&self.path, RecursiveMode::NonRecursive) {
            tracing::warn!(path = %self.path.display(), "could not re-watch file: {}", e);
        }
    }
}

/// Every change re-arms the deadline, so a burst of saves ends in exactly
/// one reload after the last of them.
fn settle(reload: &mut Debouncer, changed: bool, now: Instant) -> bool {
    if changed {
        reload.arm(now);
    }
    reload.fire_if_due(now)
}

fn is_relevant(event: &Event, path: &Path) -> bool {
    event.paths.iter().any(|p| p == path)
        && matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Data(_))
                | EventKind::Modify(ModifyKind::Any)
                | EventKind::Modify(ModifyKind::Name(_))
                | EventKind::Access(AccessKind::Close(AccessMode::Write))
                | EventKind::Create(_)
        )
}
