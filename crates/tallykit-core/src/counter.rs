//! Counter model, tap policy, and repository.
//!
//! Counters persist as one JSON array under `savedCounters`. Field names
//! are part of the wire contract with previously released versions, so
//! the model serializes in camelCase and decodes `interval` as 1 when an
//! older blob omits it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{keys, KeyValueStore};

/// Free-tier cap on saved counters.
pub const FREE_COUNTER_LIMIT: usize = 2;

/// A named tap counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub id: Uuid,
    pub title: String,
    /// Current value. Decrement has no floor; negative is valid.
    pub count: i64,
    /// Lifetime tap count. Never decreases, not even on reset.
    pub total_taps: u64,
    pub created_date: DateTime<Utc>,
    pub religious: bool,
    /// Step applied per tap. Older saved data predates this field;
    /// missing decodes as 1.
    #[serde(default = "default_interval")]
    pub interval: i64,
}

fn default_interval() -> i64 {
    1
}

impl Counter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            count: 0,
            total_taps: 0,
            created_date: Utc::now(),
            religious: false,
            interval: 1,
        }
    }

    pub fn increment(&mut self) {
        self.tap(1);
    }

    pub fn decrement(&mut self) {
        self.tap(-1);
    }

    /// Zero the count. Deliberately leaves `total_taps` alone: a reset
    /// is not a tap.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Change the per-tap step. Values below 1 clamp to 1.
    pub fn set_interval(&mut self, interval: i64) {
        self.interval = interval.max(1);
    }

    fn tap(&mut self, direction: i64) {
        self.count += direction * self.interval;
        self.total_taps += 1;
    }
}

/// The built-in presets offered by the "Load Preset" action. Each use
/// instantiates a fresh copy with its own id and creation date.
pub fn preset_counters() -> Vec<Counter> {
    let mut presets: Vec<Counter> = [
        "Water Intake 💧",
        "Pushups 💪",
        "Steps 👣",
        "Meetings 📅",
        "Prayers 🙏",
        "Sutras 🕉️",
    ]
    .into_iter()
    .map(Counter::new)
    .collect();
    presets[4].religious = true;
    presets[5].religious = true;
    presets
}

/// Gate for creating a counter beyond the free tier.
///
/// Pure policy; enforcement lives at the call site so the repository
/// stays plain CRUD. A `false` answer is the upgrade-prompt branch,
/// not an error.
pub fn can_create_new(is_premium: bool, current_count: usize) -> bool {
    is_premium || current_count < FREE_COUNTER_LIMIT
}

/// CRUD over the counter collection plus the selected-counter scalar.
///
/// Every mutation re-serializes and writes the whole collection
/// synchronously before returning.
#[derive(Debug, Clone)]
pub struct CounterRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CounterRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All saved counters in stored (insertion) order.
    pub fn list(&self) -> Vec<Counter> {
        self.store.get_json(keys::SAVED_COUNTERS)
    }

    pub fn find(&self, id: Uuid) -> Option<Counter> {
        self.list().into_iter().find(|c| c.id == id)
    }

    /// Replace the entry with a matching id in place, or append.
    pub fn upsert(&self, counter: &Counter) -> Result<(), StoreError> {
        let mut all = self.list();
        match all.iter_mut().find(|c| c.id == counter.id) {
            Some(slot) => *slot = counter.clone(),
            None => all.push(counter.clone()),
        }
        self.store.set_json(keys::SAVED_COUNTERS, &all)
    }

    /// Remove the entry with the given id. The caller owns the
    /// cross-cutting current selection and must clear it if it pointed
    /// at the removed counter.
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut all = self.list();
        all.retain(|c| c.id != id);
        self.store.set_json(keys::SAVED_COUNTERS, &all)
    }

    // ── Selected-counter scalar ──────────────────────────────────────

    /// Id of the currently open counter, if one is selected. A dangling
    /// id simply resolves to no counter on `selected()`.
    pub fn selected_id(&self) -> Option<Uuid> {
        self.store
            .get_string(keys::SELECTED_COUNTER_ID)
            .filter(|s| !s.is_empty())
            .and_then(|s| Uuid::parse_str(&s).ok())
    }

    pub fn select(&self, id: Uuid) -> Result<(), StoreError> {
        self.store
            .set_string(keys::SELECTED_COUNTER_ID, &id.to_string())
    }

    pub fn clear_selection(&self) -> Result<(), StoreError> {
        self.store.set_string(keys::SELECTED_COUNTER_ID, "")
    }

    pub fn selected(&self) -> Option<Counter> {
        self.selected_id().and_then(|id| self.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> CounterRepository<MemoryStore> {
        CounterRepository::new(MemoryStore::new())
    }

    #[test]
    fn upsert_appends_new_and_replaces_existing() {
        let repo = repo();
        let a = Counter::new("A");
        let b = Counter::new("B");
        repo.upsert(&a).unwrap();
        repo.upsert(&b).unwrap();

        let mut a2 = a.clone();
        a2.title = "A renamed".into();
        repo.upsert(&a2).unwrap();

        let all = repo.list();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "A renamed");
        assert_eq!(all[1], b);
    }

    #[test]
    fn reupsert_of_identical_value_changes_nothing() {
        let repo = repo();
        let a = Counter::new("A");
        repo.upsert(&a).unwrap();
        let before = repo.list();
        repo.upsert(&a).unwrap();
        assert_eq!(repo.list(), before);
    }

    #[test]
    fn delete_removes_only_matching_entry() {
        let repo = repo();
        let a = Counter::new("A");
        let b = Counter::new("B");
        repo.upsert(&a).unwrap();
        repo.upsert(&b).unwrap();
        repo.delete(a.id).unwrap();
        assert_eq!(repo.list(), vec![b]);
    }

    #[test]
    fn decode_without_interval_defaults_to_one() {
        let json = format!(
            r#"[{{"id":"{}","title":"Old","count":3,"totalTaps":5,
                "createdDate":"2024-01-01T00:00:00Z","religious":false}}]"#,
            Uuid::new_v4()
        );
        let store = MemoryStore::new();
        store.set(keys::SAVED_COUNTERS, json.as_bytes()).unwrap();
        let all = CounterRepository::new(store).list();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].interval, 1);
        assert_eq!(all[0].count, 3);
    }

    #[test]
    fn tap_semantics_follow_interval() {
        let mut c = Counter::new("Taps");
        c.count = 5;
        c.total_taps = 3;
        c.interval = 2;

        c.increment();
        assert_eq!((c.count, c.total_taps), (7, 4));

        c.decrement();
        assert_eq!((c.count, c.total_taps), (5, 5));

        c.reset();
        assert_eq!((c.count, c.total_taps), (0, 5));
    }

    #[test]
    fn decrement_can_go_negative() {
        let mut c = Counter::new("Down");
        c.decrement();
        c.decrement();
        assert_eq!(c.count, -2);
        assert_eq!(c.total_taps, 2);
    }

    #[test]
    fn free_tier_gate() {
        assert!(can_create_new(false, 0));
        assert!(can_create_new(false, 1));
        assert!(!can_create_new(false, 2));
        assert!(can_create_new(true, 2));
        assert!(can_create_new(true, 100));
    }

    #[test]
    fn selection_roundtrip_and_dangling_id() {
        let repo = repo();
        let a = Counter::new("A");
        repo.upsert(&a).unwrap();
        repo.select(a.id).unwrap();
        assert_eq!(repo.selected().unwrap().id, a.id);

        // Deleting the selected counter: caller clears the selection.
        repo.delete(a.id).unwrap();
        assert_eq!(repo.selected(), None);
        repo.clear_selection().unwrap();
        assert_eq!(repo.selected_id(), None);
    }

    #[test]
    fn presets_mark_religious_entries() {
        let presets = preset_counters();
        assert_eq!(presets.len(), 6);
        assert_eq!(presets.iter().filter(|p| p.religious).count(), 2);
        assert!(presets.iter().all(|p| p.count == 0 && p.interval == 1));
    }

    #[test]
    fn wire_format_uses_camel_case() {
        let c = Counter::new("Wire");
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("totalTaps").is_some());
        assert!(json.get("createdDate").is_some());
        assert!(json.get("total_taps").is_none());
    }
}
