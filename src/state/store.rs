//! Entry store: the canonical in-memory collection of timer entries

use tracing::debug;

use crate::error::TimerError;

use super::entry::TimerEntry;

/// Ordered collection of timer entries with all mutation operations.
///
/// Insertion order is preserved and is the addressing scheme: single-entry
/// operations target entries by index. Entries are never removed, so an
/// index stays valid for the lifetime of the process.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: Vec<TimerEntry>,
}

impl EntryStore {
    pub fn new(entries: Vec<TimerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries currently counting down.
    pub fn running_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_running()).count()
    }

    /// Defensive copy of the full collection. Callers never get aliased
    /// access to live entries.
    pub fn snapshot(&self) -> Vec<TimerEntry> {
        self.entries.clone()
    }

    /// Append one Running entry per name, all sharing the category and
    /// duration. Validates that the category and every name are non-empty
    /// and that the duration is positive. Nothing is committed on failure.
    pub fn add_entries(
        &mut self,
        category: &str,
        duration_secs: u64,
        names: &[String],
    ) -> Result<Vec<TimerEntry>, TimerError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TimerError::validation("category must not be empty"));
        }
        if duration_secs == 0 {
            return Err(TimerError::validation(
                "duration must be a positive number of seconds",
            ));
        }
        if names.is_empty() {
            return Err(TimerError::validation("at least one name is required"));
        }
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(TimerError::validation("timer names must not be empty"));
        }

        let added: Vec<TimerEntry> = names
            .iter()
            .map(|name| TimerEntry::new(category, name.trim(), duration_secs))
            .collect();
        self.entries.extend(added.iter().cloned());
        debug!(
            "Added {} entries to category '{}' with duration {}s",
            added.len(),
            category,
            duration_secs
        );
        Ok(added)
    }

    /// Resume the entry at `index`. Returns whether it changed.
    pub fn start_entry(&mut self, index: usize) -> Result<bool, TimerError> {
        Ok(self.entry_mut(index)?.start())
    }

    /// Pause the entry at `index`. Returns whether it changed.
    pub fn pause_entry(&mut self, index: usize) -> Result<bool, TimerError> {
        Ok(self.entry_mut(index)?.pause())
    }

    /// Reset the entry at `index` back to its full duration.
    pub fn reset_entry(&mut self, index: usize) -> Result<(), TimerError> {
        self.entry_mut(index)?.reset();
        Ok(())
    }

    /// Resume every non-Running, non-Completed entry in the category,
    /// preserving each entry's progress. Returns the number of entries
    /// that changed.
    pub fn bulk_start(&mut self, category: &str) -> usize {
        self.in_category(category)
            .map(|e| e.start())
            .filter(|&changed| changed)
            .count()
    }

    /// Pause every Running entry in the category. Returns the number of
    /// entries that changed.
    pub fn bulk_pause(&mut self, category: &str) -> usize {
        self.in_category(category)
            .map(|e| e.pause())
            .filter(|&changed| changed)
            .count()
    }

    /// Reset every entry in the category regardless of state. Returns the
    /// number of entries touched.
    pub fn bulk_reset(&mut self, category: &str) -> usize {
        self.in_category(category).map(|e| e.reset()).count()
    }

    /// Advance every Running entry by one second. Returns the names of the
    /// entries that completed on this tick, in entry order.
    pub fn apply_tick(&mut self) -> Vec<String> {
        self.entries
            .iter_mut()
            .filter_map(|e| e.tick().then(|| e.name.clone()))
            .collect()
    }

    /// Grouping of entry indices by category, in first-appearance order.
    /// Recomputed from scratch on every call so it always reflects the
    /// latest mutation.
    pub fn categories(&self) -> Vec<(String, Vec<usize>)> {
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            match groups.iter_mut().find(|(name, _)| *name == entry.category) {
                Some((_, indices)) => indices.push(index),
                None => groups.push((entry.category.clone(), vec![index])),
            }
        }
        groups
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut TimerEntry, TimerError> {
        self.entries
            .get_mut(index)
            .ok_or(TimerError::IndexOutOfRange(index))
    }

    fn in_category<'a>(&'a mut self, category: &'a str) -> impl Iterator<Item = &'a mut TimerEntry> {
        self.entries
            .iter_mut()
            .filter(move |e| e.category == category)
    }
}

/// Parse a duration from user input. Accepts decimal digits only: no sign,
/// no fractional part, no surrounding garbage. Must be positive.
pub fn parse_duration_secs(input: &str) -> Result<u64, TimerError> {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(TimerError::validation(
            "duration must be a whole number of seconds",
        ));
    }
    match input.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(TimerError::validation(
            "duration must be a positive number of seconds",
        )),
    }
}

/// Split a comma-separated name list into trimmed names. Empty segments are
/// kept so validation can reject them with a clear message.
pub fn split_names(input: &str) -> Vec<String> {
    input.split(',').map(|name| name.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::entry::EntryState;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn add_entries_creates_one_running_entry_per_name() {
        let mut store = EntryStore::default();
        let added = store
            .add_entries("Study", 5, &names(&["Read", "Write"]))
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(store.len(), 2);
        for entry in store.snapshot() {
            assert_eq!(entry.category, "Study");
            assert_eq!(entry.duration_secs, 5);
            assert_eq!(entry.remaining_secs, 5);
            assert_eq!(entry.state, EntryState::Running);
        }
    }

    #[test]
    fn add_entries_rejects_bad_input_without_committing() {
        let mut store = EntryStore::default();
        assert!(matches!(
            store.add_entries("", 5, &names(&["Read"])),
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            store.add_entries("Study", 0, &names(&["Read"])),
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            store.add_entries("Study", 5, &[]),
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            store.add_entries("Study", 5, &names(&["Read", " "])),
            Err(TimerError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn study_scenario_completes_both_entries_in_order() {
        let mut store = EntryStore::default();
        store
            .add_entries("Study", 5, &names(&["Read", "Write"]))
            .unwrap();

        for _ in 0..4 {
            assert!(store.apply_tick().is_empty());
        }
        let completed = store.apply_tick();
        assert_eq!(completed, vec!["Read".to_string(), "Write".to_string()]);

        for entry in store.snapshot() {
            assert_eq!(entry.state, EntryState::Completed);
            assert_eq!(entry.remaining_secs, 0);
        }
        assert_eq!(store.running_count(), 0);

        // Idempotent at zero.
        assert!(store.apply_tick().is_empty());
        assert!(store.snapshot().iter().all(|e| e.remaining_secs == 0));
    }

    #[test]
    fn paused_entry_keeps_its_remaining_time_across_ticks() {
        let mut store = EntryStore::default();
        store.add_entries("Work", 10, &names(&["Report"])).unwrap();
        assert!(store.pause_entry(0).unwrap());
        for _ in 0..3 {
            assert!(store.apply_tick().is_empty());
        }
        let entry = &store.snapshot()[0];
        assert_eq!(entry.remaining_secs, 10);
        assert_eq!(entry.state, EntryState::Paused);
    }

    #[test]
    fn single_ops_reject_out_of_range_index() {
        let mut store = EntryStore::default();
        assert_eq!(store.start_entry(0), Err(TimerError::IndexOutOfRange(0)));
        assert_eq!(store.pause_entry(3), Err(TimerError::IndexOutOfRange(3)));
        assert_eq!(store.reset_entry(7), Err(TimerError::IndexOutOfRange(7)));
    }

    #[test]
    fn reset_entry_is_idempotent() {
        let mut store = EntryStore::default();
        store.add_entries("Work", 6, &names(&["Report"])).unwrap();
        store.apply_tick();
        store.reset_entry(0).unwrap();
        let first = store.snapshot();
        store.reset_entry(0).unwrap();
        assert_eq!(store.snapshot(), first);
        assert_eq!(first[0].state, EntryState::Reset);
        assert_eq!(first[0].remaining_secs, 6);
    }

    #[test]
    fn bulk_start_resumes_only_paused_entries_in_category() {
        let mut store = EntryStore::default();
        store
            .add_entries("Study", 8, &names(&["Read", "Write"]))
            .unwrap();
        store.pause_entry(1).unwrap();
        store.apply_tick(); // Read: 7, Write stays 8.

        assert_eq!(store.bulk_start("Study"), 1);
        let entries = store.snapshot();
        assert_eq!(entries[0].state, EntryState::Running);
        assert_eq!(entries[0].remaining_secs, 7);
        assert_eq!(entries[1].state, EntryState::Running);
        assert_eq!(entries[1].remaining_secs, 8);
    }

    #[test]
    fn bulk_ops_leave_other_categories_untouched() {
        let mut store = EntryStore::default();
        store
            .add_entries("Study", 8, &names(&["Read", "Write"]))
            .unwrap();
        store.add_entries("Chores", 20, &names(&["Dishes"])).unwrap();
        let chores_before = store.snapshot()[2].clone();

        assert_eq!(store.bulk_pause("Study"), 2);
        assert_eq!(store.snapshot()[2], chores_before);

        assert_eq!(store.bulk_reset("Study"), 2);
        assert_eq!(store.snapshot()[2], chores_before);

        // Pausing an already-paused category changes nothing.
        assert_eq!(store.bulk_pause("Study"), 0);
    }

    #[test]
    fn bulk_reset_restores_every_entry_regardless_of_state() {
        let mut store = EntryStore::default();
        store
            .add_entries("Study", 2, &names(&["Read", "Write", "Review"]))
            .unwrap();
        store.pause_entry(1).unwrap();
        store.apply_tick();
        store.apply_tick(); // Read and Review complete.

        assert_eq!(store.bulk_reset("Study"), 3);
        for entry in store.snapshot() {
            assert_eq!(entry.state, EntryState::Reset);
            assert_eq!(entry.remaining_secs, 2);
        }
    }

    #[test]
    fn categories_groups_indices_in_first_appearance_order() {
        let mut store = EntryStore::default();
        store.add_entries("Study", 5, &names(&["Read"])).unwrap();
        store.add_entries("Chores", 5, &names(&["Dishes"])).unwrap();
        store.add_entries("Study", 5, &names(&["Write"])).unwrap();

        let groups = store.categories();
        assert_eq!(
            groups,
            vec![
                ("Study".to_string(), vec![0, 2]),
                ("Chores".to_string(), vec![1]),
            ]
        );
    }

    #[test]
    fn parse_duration_accepts_digits_only() {
        assert_eq!(parse_duration_secs("300").unwrap(), 300);
        assert_eq!(parse_duration_secs(" 42 ").unwrap(), 42);
        for bad in ["", "0", "-5", "3.5", "10a", "1e3", "+7", "ten"] {
            assert!(parse_duration_secs(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn split_names_trims_and_keeps_empty_segments() {
        assert_eq!(split_names("Read, Write"), vec!["Read", "Write"]);
        assert_eq!(split_names("Read,,Write"), vec!["Read", "", "Write"]);
    }
}
