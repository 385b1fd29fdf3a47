//! Timer entry structure and state machine

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single timer entry.
///
/// Transitions: `Running -> {Paused, Completed}`, `Paused -> Running`,
/// `Reset -> Running`, `Completed -> Reset`. The only way out of
/// `Completed` is an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryState {
    Running,
    Paused,
    Completed,
    Reset,
}

impl EntryState {
    /// True for every state except `Running`.
    pub fn is_paused(self) -> bool {
        self != EntryState::Running
    }
}

/// One trackable activity: a named countdown grouped under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEntry {
    /// Free-form grouping key, non-empty.
    pub category: String,
    /// Display name, non-empty. Duplicates are allowed.
    pub name: String,
    /// Original duration in seconds, immutable after creation.
    pub duration_secs: u64,
    /// Remaining seconds; never exceeds `duration_secs`, never negative.
    pub remaining_secs: u64,
    pub state: EntryState,
}

impl TimerEntry {
    /// Create a fresh entry. New entries start counting down immediately.
    pub fn new(category: impl Into<String>, name: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            duration_secs,
            remaining_secs: duration_secs,
            state: EntryState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == EntryState::Running
    }

    /// Resume counting down. No-op for entries that are already Running or
    /// Completed; progress is preserved (`remaining_secs` is untouched).
    /// Returns whether the entry changed.
    pub fn start(&mut self) -> bool {
        match self.state {
            EntryState::Paused | EntryState::Reset => {
                self.state = EntryState::Running;
                true
            }
            EntryState::Running | EntryState::Completed => false,
        }
    }

    /// Suspend counting down. Only a Running entry can be paused.
    /// Returns whether the entry changed.
    pub fn pause(&mut self) -> bool {
        if self.state == EntryState::Running {
            self.state = EntryState::Paused;
            true
        } else {
            false
        }
    }

    /// Restore the original duration and move to the Reset resting state.
    /// Valid from any state; this is the only transition out of Completed.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.state = EntryState::Reset;
    }

    /// Advance this entry by one second. Only Running entries with time
    /// left are decremented; hitting zero flips the entry to Completed.
    /// Returns true exactly on the tick where the entry completes.
    pub fn tick(&mut self) -> bool {
        if self.state != EntryState::Running || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.state = EntryState::Completed;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_starts_running_at_full_duration() {
        let entry = TimerEntry::new("Study", "Read", 5);
        assert_eq!(entry.state, EntryState::Running);
        assert_eq!(entry.remaining_secs, 5);
        assert_eq!(entry.duration_secs, 5);
    }

    #[test]
    fn ticking_to_zero_completes_exactly_once() {
        let mut entry = TimerEntry::new("Study", "Read", 3);
        assert!(!entry.tick());
        assert!(!entry.tick());
        assert!(entry.tick());
        assert_eq!(entry.state, EntryState::Completed);
        assert_eq!(entry.remaining_secs, 0);

        // Further ticks are no-ops; remaining never goes negative.
        assert!(!entry.tick());
        assert_eq!(entry.remaining_secs, 0);
        assert_eq!(entry.state, EntryState::Completed);
    }

    #[test]
    fn paused_entry_does_not_decrement() {
        let mut entry = TimerEntry::new("Study", "Read", 10);
        assert!(entry.pause());
        for _ in 0..3 {
            assert!(!entry.tick());
        }
        assert_eq!(entry.remaining_secs, 10);
        assert_eq!(entry.state, EntryState::Paused);
    }

    #[test]
    fn start_resumes_without_resetting_progress() {
        let mut entry = TimerEntry::new("Study", "Read", 10);
        entry.tick();
        entry.tick();
        entry.pause();
        assert!(entry.start());
        assert_eq!(entry.state, EntryState::Running);
        assert_eq!(entry.remaining_secs, 8);
    }

    #[test]
    fn start_is_noop_for_running_and_completed() {
        let mut running = TimerEntry::new("Study", "Read", 10);
        assert!(!running.start());
        assert_eq!(running.state, EntryState::Running);

        let mut completed = TimerEntry::new("Study", "Read", 1);
        completed.tick();
        assert!(!completed.start());
        assert_eq!(completed.state, EntryState::Completed);
        assert_eq!(completed.remaining_secs, 0);
    }

    #[test]
    fn pause_is_noop_unless_running() {
        let mut entry = TimerEntry::new("Study", "Read", 1);
        entry.tick();
        assert!(!entry.pause());
        assert_eq!(entry.state, EntryState::Completed);
    }

    #[test]
    fn reset_restores_duration_from_any_state_and_is_idempotent() {
        let mut entry = TimerEntry::new("Study", "Read", 4);
        entry.tick();
        entry.tick();
        entry.tick();
        entry.tick();
        assert_eq!(entry.state, EntryState::Completed);

        entry.reset();
        assert_eq!(entry.state, EntryState::Reset);
        assert_eq!(entry.remaining_secs, 4);

        entry.reset();
        assert_eq!(entry.state, EntryState::Reset);
        assert_eq!(entry.remaining_secs, 4);
    }

    #[test]
    fn reset_entry_can_be_started() {
        let mut entry = TimerEntry::new("Study", "Read", 4);
        entry.reset();
        assert!(entry.start());
        assert_eq!(entry.state, EntryState::Running);
        assert_eq!(entry.remaining_secs, 4);
    }
}
