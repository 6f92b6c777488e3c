use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entitlement::UnlockSource;

/// Typed cross-component signals.
///
/// Producers return events from the operations that used to broadcast
/// them ambiently; consumers (the UI layer) decide presentation. There
/// is no global channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Entitlement moved from free to premium.
    PremiumUnlocked {
        product_id: String,
        source: UnlockSource,
        at: DateTime<Utc>,
    },
    /// A gated action was refused; route to the upgrade flow.
    UpgradeRequired { reason: GateReason, at: DateTime<Utc> },
    /// The current counter was persisted.
    CounterSaved { id: Uuid, at: DateTime<Utc> },
    /// Transient user-facing notice.
    Toast { message: String, at: DateTime<Utc> },
}

impl Event {
    pub fn upgrade_required(reason: GateReason) -> Self {
        Event::UpgradeRequired {
            reason,
            at: Utc::now(),
        }
    }

    pub fn counter_saved(id: Uuid) -> Self {
        Event::CounterSaved { id, at: Utc::now() }
    }

    pub fn toast(message: impl Into<String>) -> Self {
        Event::Toast {
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Which free-tier or premium gate refused the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateReason {
    CounterLimit,
    CountdownLimit,
    PremiumTheme,
    CustomTheme,
    AdvancedConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_by_type_on_the_wire() {
        let event = Event::upgrade_required(GateReason::CounterLimit);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "UpgradeRequired");
        assert_eq!(json["reason"], "counter_limit");
    }
}
