//! Widget read path.
//!
//! The widget process is a read-only consumer: on every refresh tick it
//! re-reads the countdown collection fresh from the shared store (no
//! caching across ticks; staleness is bounded only by refresh cadence),
//! resolves the externally configured countdown id, and computes the
//! remaining-time fields. An id that no longer resolves renders the
//! placeholder, never an error.

use chrono::{DateTime, Duration, DurationRound, Utc};
use uuid::Uuid;

use crate::countdown::CountdownItem;
use crate::store::{keys, KeyValueStore};

/// Placeholder title when no countdown resolves.
pub const PLACEHOLDER: &str = "No Countdown Selected";

/// One timeline entry: the snapshot a single tick renders.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownEntry {
    pub date: DateTime<Utc>,
    pub countdown: Option<CountdownItem>,
}

/// Time left until a target, floored at zero per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl RemainingTime {
    /// A past target yields all zeros, never negative fields.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (target - now).num_seconds().max(0);
        Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Compact rendering for the small widget family: `3d 04h`.
    pub fn short(&self) -> String {
        format!("{}d {:02}h", self.days, self.hours)
    }

    /// Full rendering: `03d 04h 05m 06s`.
    pub fn full(&self) -> String {
        format!(
            "{:02}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Build the entry for one tick: fresh read, then resolve `configured`.
pub fn load_entry<S: KeyValueStore>(
    store: &S,
    configured: Option<Uuid>,
    now: DateTime<Utc>,
) -> CountdownEntry {
    let all: Vec<CountdownItem> = store.get_json(keys::SAVED_COUNTDOWNS);
    let countdown = configured.and_then(|id| all.into_iter().find(|c| c.id == id));
    CountdownEntry {
        date: now,
        countdown,
    }
}

/// Countdowns offered by the widget configuration picker.
pub fn available_countdowns<S: KeyValueStore>(store: &S) -> Vec<CountdownItem> {
    store.get_json(keys::SAVED_COUNTDOWNS)
}

/// The next whole minute: when the scheduler should tick again.
pub fn next_refresh(now: DateTime<Utc>) -> DateTime<Utc> {
    match now.duration_trunc(Duration::minutes(1)) {
        Ok(floor) => floor + Duration::minutes(1),
        Err(_) => now + Duration::minutes(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countdown::CountdownRepository;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn remaining_time_splits_fields() {
        let target = now() + Duration::days(3) + Duration::hours(4) + Duration::minutes(5)
            + Duration::seconds(6);
        let left = RemainingTime::until(target, now());
        assert_eq!(left.days, 3);
        assert_eq!(left.hours, 4);
        assert_eq!(left.minutes, 5);
        assert_eq!(left.seconds, 6);
        assert_eq!(left.short(), "3d 04h");
        assert_eq!(left.full(), "03d 04h 05m 06s");
    }

    #[test]
    fn past_target_renders_all_zero() {
        let left = RemainingTime::until(now() - Duration::days(2), now());
        assert!(left.is_zero());
        assert_eq!(left.full(), "00d 00h 00m 00s");
    }

    #[test]
    fn configured_id_resolves_to_its_countdown() {
        let store = MemoryStore::new();
        let repo = CountdownRepository::new(store.clone());
        let item = CountdownItem::new("Launch", now() + Duration::days(1));
        repo.upsert(&item).unwrap();

        let entry = load_entry(&store, Some(item.id), now());
        assert_eq!(entry.countdown.unwrap().title, "Launch");
    }

    #[test]
    fn dangling_id_renders_placeholder_not_error() {
        let store = MemoryStore::new();
        let entry = load_entry(&store, Some(Uuid::new_v4()), now());
        assert_eq!(entry.countdown, None);
    }

    #[test]
    fn unconfigured_widget_renders_placeholder() {
        let store = MemoryStore::new();
        let repo = CountdownRepository::new(store.clone());
        repo.upsert(&CountdownItem::new("X", now())).unwrap();
        let entry = load_entry(&store, None, now());
        assert_eq!(entry.countdown, None);
    }

    #[test]
    fn each_tick_reads_fresh_data() {
        let store = MemoryStore::new();
        let repo = CountdownRepository::new(store.clone());
        let mut item = CountdownItem::new("Event", now() + Duration::days(1));
        repo.upsert(&item).unwrap();
        assert!(load_entry(&store, Some(item.id), now()).countdown.is_some());

        // Main app renames between ticks; the next tick must see it.
        item.title = "Renamed".into();
        repo.upsert(&item).unwrap();
        let entry = load_entry(&store, Some(item.id), now());
        assert_eq!(entry.countdown.unwrap().title, "Renamed");

        // Main app deletes between ticks; the next tick degrades to the
        // placeholder.
        repo.delete(item.id).unwrap();
        assert_eq!(load_entry(&store, Some(item.id), now()).countdown, None);
    }

    #[test]
    fn next_refresh_is_the_next_whole_minute() {
        let at = next_refresh(now());
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 3, 1, 12, 31, 0).unwrap());
        // Exactly on a minute boundary still advances.
        assert_eq!(
            next_refresh(at),
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 32, 0).unwrap()
        );
    }
}
