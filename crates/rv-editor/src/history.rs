//! Undo/redo history of whole-document snapshots.
//!
//! Every discrete gesture or action records one snapshot at its end, so
//! undo restores exactly the state before the last gesture. The list is
//! a linear timeline with a cursor; recording after an undo drops the
//! redo tail.

use rv_core::Snapshot;

pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the entry matching the live document.
    index: usize,
    /// Maximum number of entries kept.
    capacity: usize,
}

impl History {
    /// History seeded with the initial document.
    pub fn new(initial: Snapshot, capacity: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record the current document. Returns `false` when it equals the
    /// current entry and nothing was stored.
    pub fn record(&mut self, snapshot: Snapshot) -> bool {
        if self.entries.get(self.index) == Some(&snapshot) {
            return false;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.index = self.entries.len() - 1;
        log::debug!("history: recorded #{} of {}", self.index, self.entries.len());
        true
    }

    /// Step back and return the snapshot to restore.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        log::debug!("history: undo → #{}", self.index);
        self.entries.get(self.index)
    }

    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        log::debug!("history: redo → #{}", self.index);
        self.entries.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rv_core::model::AppSettings;

    fn snap(bg: &str) -> Snapshot {
        Snapshot {
            app_settings: AppSettings {
                background_color: bg.into(),
            },
            ..Snapshot::default()
        }
    }

    #[test]
    fn duplicate_record_is_ignored() {
        let mut h = History::new(snap("#000000"), 50);
        assert!(!h.record(snap("#000000")));
        assert!(h.record(snap("#111111")));
        assert!(!h.record(snap("#111111")));
        assert_eq!(h.depth(), 2);
    }

    #[test]
    fn undo_redo_walk_the_timeline() {
        let mut h = History::new(snap("#000000"), 50);
        h.record(snap("#111111"));
        h.record(snap("#222222"));

        assert_eq!(h.undo().map(|s| s.app_settings.background_color.clone()), Some("#111111".into()));
        assert_eq!(h.undo().map(|s| s.app_settings.background_color.clone()), Some("#000000".into()));
        assert!(h.undo().is_none());
        assert_eq!(h.redo().map(|s| s.app_settings.background_color.clone()), Some("#111111".into()));

        // Recording after undo drops the redo tail.
        h.record(snap("#333333"));
        assert!(!h.can_redo());
        assert_eq!(h.depth(), 3);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::new(snap("#000000"), 3);
        for bg in ["#000001", "#000002", "#000003", "#000004"] {
            h.record(snap(bg));
        }
        assert_eq!(h.depth(), 3);
        assert_eq!(h.index(), 2);
        h.undo();
        assert_eq!(h.undo().map(|s| s.app_settings.background_color.clone()), Some("#000002".into()));
        assert!(!h.can_undo());
    }
}
