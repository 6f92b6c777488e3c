//! Countdown model and repository.
//!
//! The collection under `savedCountdowns` is kept sorted by ascending
//! target date. That ordering is a standing invariant re-established on
//! every save: the widget read path and the "earliest countdown" default
//! both rely on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{keys, KeyValueStore};

/// Free-tier cap on saved countdowns.
pub const FREE_COUNTDOWN_LIMIT: usize = 1;

/// A countdown to a target date, optionally with a background image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownItem {
    pub id: Uuid,
    pub title: String,
    pub target_date: DateTime<Utc>,
    /// Raw image bytes, base64 text on the wire.
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
}

impl CountdownItem {
    pub fn new(title: impl Into<String>, target_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            target_date,
            image_data: None,
        }
    }
}

/// Gate for creating a countdown beyond the free tier. Same contract as
/// [`crate::counter::can_create_new`] with a cap of 1.
pub fn can_create_new(is_premium: bool, current_count: usize) -> bool {
    is_premium || current_count < FREE_COUNTDOWN_LIMIT
}

/// CRUD over the countdown collection.
#[derive(Debug, Clone)]
pub struct CountdownRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CountdownRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All saved countdowns, ascending by target date.
    pub fn list(&self) -> Vec<CountdownItem> {
        self.store.get_json(keys::SAVED_COUNTDOWNS)
    }

    pub fn find(&self, id: Uuid) -> Option<CountdownItem> {
        self.list().into_iter().find(|c| c.id == id)
    }

    /// The default display choice when nothing is selected.
    pub fn earliest(&self) -> Option<CountdownItem> {
        self.list().into_iter().next()
    }

    /// Replace in place by id or append, then re-sort before writing.
    pub fn upsert(&self, countdown: &CountdownItem) -> Result<(), StoreError> {
        let mut all = self.list();
        match all.iter_mut().find(|c| c.id == countdown.id) {
            Some(slot) => *slot = countdown.clone(),
            None => all.push(countdown.clone()),
        }
        self.save(all)
    }

    /// Remove the entry with the given id. The currently displayed
    /// countdown is the caller's transient selection; clearing it is
    /// the caller's job.
    pub fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut all = self.list();
        all.retain(|c| c.id != id);
        self.save(all)
    }

    fn save(&self, mut all: Vec<CountdownItem>) -> Result<(), StoreError> {
        all.sort_by_key(|c| c.target_date);
        self.store.set_json(keys::SAVED_COUNTDOWNS, &all)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, ser: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => STANDARD.encode(bytes).serialize(ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(de)? {
            Some(text) => STANDARD
                .decode(text)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn repo() -> CountdownRepository<MemoryStore> {
        CountdownRepository::new(MemoryStore::new())
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn upsert_keeps_ascending_target_date_order() {
        let repo = repo();
        let late = CountdownItem::new("Late", base() + Duration::days(30));
        let early = CountdownItem::new("Early", base() + Duration::days(1));
        let mid = CountdownItem::new("Mid", base() + Duration::days(10));
        repo.upsert(&late).unwrap();
        repo.upsert(&early).unwrap();
        repo.upsert(&mid).unwrap();

        let titles: Vec<_> = repo.list().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, ["Early", "Mid", "Late"]);
    }

    #[test]
    fn editing_target_date_resorts() {
        let repo = repo();
        let a = CountdownItem::new("A", base() + Duration::days(1));
        let b = CountdownItem::new("B", base() + Duration::days(2));
        repo.upsert(&a).unwrap();
        repo.upsert(&b).unwrap();

        let mut a2 = a.clone();
        a2.target_date = base() + Duration::days(3);
        repo.upsert(&a2).unwrap();

        let titles: Vec<_> = repo.list().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, ["B", "A"]);
    }

    #[test]
    fn earliest_is_the_default_display_choice() {
        let repo = repo();
        assert_eq!(repo.earliest(), None);
        let b = CountdownItem::new("B", base() + Duration::days(2));
        let a = CountdownItem::new("A", base() + Duration::days(1));
        repo.upsert(&b).unwrap();
        repo.upsert(&a).unwrap();
        assert_eq!(repo.earliest().unwrap().title, "A");
    }

    #[test]
    fn delete_then_list() {
        let repo = repo();
        let a = CountdownItem::new("A", base());
        repo.upsert(&a).unwrap();
        repo.delete(a.id).unwrap();
        assert!(repo.list().is_empty());
    }

    #[test]
    fn free_tier_gate_caps_at_one() {
        assert!(can_create_new(false, 0));
        assert!(!can_create_new(false, 1));
        assert!(can_create_new(true, 1));
    }

    #[test]
    fn image_data_roundtrips_as_base64_text() {
        let mut c = CountdownItem::new("Pic", base());
        c.image_data = Some(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json["imageData"].is_string());
        let back: CountdownItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_image_data_decodes_as_none() {
        let json = format!(
            r#"[{{"id":"{}","title":"Plain","targetDate":"2026-06-01T00:00:00Z"}}]"#,
            Uuid::new_v4()
        );
        let store = MemoryStore::new();
        store.set(keys::SAVED_COUNTDOWNS, json.as_bytes()).unwrap();
        let all = CountdownRepository::new(store).list();
        assert_eq!(all[0].image_data, None);
    }

    proptest! {
        #[test]
        fn list_is_sorted_after_any_upsert_sequence(
            offsets in proptest::collection::vec(-1_000_000i64..1_000_000, 1..16)
        ) {
            let repo = repo();
            for off in offsets {
                let item = CountdownItem::new("x", base() + Duration::seconds(off));
                repo.upsert(&item).unwrap();
            }
            let list = repo.list();
            prop_assert!(list.windows(2).all(|w| w[0].target_date <= w[1].target_date));
        }
    }
}
