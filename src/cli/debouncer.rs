use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub(super) const DEBOUNCE_MS: u64 = 300;
pub(super) const REBUILD_COOLDOWN_MS: u64 = 800;

/// Pure debouncer: collapses bursts of events on one watched file.
pub(super) struct Debouncer {
    target: PathBuf,
    pub(super) pending: bool,
    pub(super) last_event: Option<Instant>,
    pub(super) last_build: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(target: PathBuf) -> Self {
        Self {
            target,
            pending: false,
            last_event: None,
            last_build: None,
        }
    }

    /// Record a notify event if it touches the watched file.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => {}
            _ => return,
        }
        // mtime/chmod noise
        if matches!(
            event.kind,
            EventKind::Modify(notify::event::ModifyKind::Metadata(_))
        ) {
            return;
        }

        if event.paths.iter().any(|path| self.is_target(path)) {
            crate::debug!("watch"; "event {:?}: {}", event.kind, self.target.display());
            self.pending = true;
            self.last_event = Some(Instant::now());
        }
    }

    /// Only the stats file's directory is watched (non-recursive), so the
    /// file name identifies it.
    fn is_target(&self, path: &Path) -> bool {
        path.file_name() == self.target.file_name()
    }

    /// Consume the pending change if debounce and cooldown have elapsed.
    pub(super) fn take_if_ready(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.pending = false;
        self.last_event = None;
        self.last_build = Some(Instant::now());
        true
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
            return false;
        }

        if let Some(last_build) = self.last_build
            && last_build.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS)
        {
            return false;
        }

        self.pending
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining =
            Duration::from_millis(DEBOUNCE_MS).saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_build
            .map(|t| Duration::from_millis(REBUILD_COOLDOWN_MS).saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}
