//! # TallyKit Core Library
//!
//! Core logic for TallyKit, a personal counting and countdown app. The
//! main app binary and the widget binary are thin layers over this
//! crate; the two processes share state exclusively through the
//! [`store`] module's key/value namespace.
//!
//! ## Architecture
//!
//! - **Shared Store**: whole-blob key/value persistence with per-key
//!   atomicity, visible to both processes
//! - **Repositories**: synchronous CRUD over the counter and countdown
//!   collections, with free-tier gates as call-site policy
//! - **Entitlement Controller**: one-way `Free -> Premium` state machine
//!   reconciled against the commerce capability
//! - **Theme Registry**: fixed built-in catalog merged with persisted
//!   custom themes
//! - **Widget Read Path**: read-only timeline entries recomputed from a
//!   fresh store read on every tick
//!
//! ## Key Components
//!
//! - [`CounterRepository`] / [`CountdownRepository`]: collection CRUD
//! - [`EntitlementController`]: premium unlock state machine
//! - [`ThemeRegistry`]: theme catalog and selection
//! - [`FileStore`]: the cross-process store implementation

pub mod commerce;
pub mod counter;
pub mod countdown;
pub mod entitlement;
pub mod error;
pub mod events;
pub mod store;
pub mod theme;
pub mod widget;

pub use commerce::{
    LocalStorefront, Product, PurchaseOutcome, Storefront, Transaction, VerificationResult,
    PRODUCT_IDS,
};
pub use counter::{preset_counters, Counter, CounterRepository, FREE_COUNTER_LIMIT};
pub use countdown::{CountdownItem, CountdownRepository, FREE_COUNTDOWN_LIMIT};
pub use entitlement::{EntitlementController, EntitlementState, UnlockSource};
pub use error::{CommerceError, CoreError, StoreError};
pub use events::{Event, GateReason};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{builtin_themes, Rgb, Theme, ThemeRegistry};
pub use widget::{available_countdowns, load_entry, next_refresh, CountdownEntry, RemainingTime};
