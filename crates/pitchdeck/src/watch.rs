use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::Context;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches a deck file for changes. The debouncer runs on its own thread and
/// hands events over a channel that the UI loop drains once per frame.
pub struct DeckWatcher {
    path: PathBuf,
    rx: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl DeckWatcher {
    /// Editors often save by replacing the file, so the parent directory is
    /// watched and events are filtered down to the deck itself.
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx).context("Failed to start file watcher")?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        log::info!("watching {} for changes", path.display());

        Ok(Self {
            path,
            rx,
            _debouncer: debouncer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the deck changed since the last call. Never blocks.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(Ok(events)) => {
                    changed |= events.iter().any(|e| e.path == self.path);
                }
                Ok(Err(e)) => log::warn!("file watcher error: {e}"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("file watcher stopped");
                    break;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("pitchdeck-watch-test-missing.yaml");
        assert!(DeckWatcher::new(&path).is_err());
    }

    #[test]
    fn test_nothing_changed_initially() {
        let dir = std::env::temp_dir().join(format!("pitchdeck-watch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("deck.yaml");
        std::fs::write(&path, "slides: []\n").unwrap();

        let watcher = DeckWatcher::new(&path).unwrap();
        assert_eq!(watcher.path(), path.canonicalize().unwrap());
        assert!(!watcher.changed());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
