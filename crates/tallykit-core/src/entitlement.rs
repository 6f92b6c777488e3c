//! Premium entitlement state machine.
//!
//! Two states, one edge:
//!
//! ```text
//! Free -> Premium   (verified purchase, restore, or startup reconcile)
//! ```
//!
//! There is no transition back. A lapsed entitlement stops re-confirming
//! premium but the persisted flag is not cleared; absence of a
//! restorable transaction is not treated as revocation. The persisted
//! `isPremium` flag is the sole source of truth for gating, and this
//! controller is its only writer.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::commerce::{
    is_known_product, Product, PurchaseOutcome, Storefront, VerificationResult, PRODUCT_IDS,
};
use crate::error::CommerceError;
use crate::events::Event;
use crate::store::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementState {
    Free,
    Premium,
}

/// Which path confirmed the entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockSource {
    Purchase,
    Restore,
    Reconcile,
}

/// Read the gating flag without constructing a controller. Gating call
/// sites consume this; only the controller writes it.
pub fn is_premium<S: KeyValueStore>(store: &S) -> bool {
    store.get_bool(keys::IS_PREMIUM)
}

/// Reconciles storefront entitlement data into the shared store's
/// premium flag and exposes the current state.
#[derive(Debug)]
pub struct EntitlementController<S: KeyValueStore, F: Storefront> {
    store: S,
    storefront: F,
    state: EntitlementState,
    products: Vec<Product>,
}

impl<S: KeyValueStore, F: Storefront> EntitlementController<S, F> {
    /// Initialize from the persisted flag; reconciliation against the
    /// storefront happens separately via [`reconcile`](Self::reconcile).
    pub fn new(store: S, storefront: F) -> Self {
        let state = if is_premium(&store) {
            EntitlementState::Premium
        } else {
            EntitlementState::Free
        };
        Self {
            store,
            storefront,
            state,
            products: Vec::new(),
        }
    }

    pub fn state(&self) -> EntitlementState {
        self.state
    }

    pub fn is_premium(&self) -> bool {
        self.state == EntitlementState::Premium
    }

    /// Catalog from the last successful fetch; empty until one succeeds.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Fetch the product catalog. Failure is non-fatal and keeps the
    /// current list; callers may re-invoke on the next appearance.
    pub async fn refresh_products(&mut self) -> Result<(), CommerceError> {
        self.products = self.storefront.fetch_products(&PRODUCT_IDS).await?;
        Ok(())
    }

    /// Run the purchase flow for `product`.
    ///
    /// Returns the unlock event on the `Free -> Premium` edge. Unverified
    /// results and user cancellation are terminal no-ops: state unchanged,
    /// nothing retried.
    pub async fn purchase(&mut self, product: &Product) -> Result<Option<Event>, CommerceError> {
        match self.storefront.purchase(product).await? {
            PurchaseOutcome::Verified(txn) if is_known_product(&txn.product_id) => {
                Ok(self.unlock(txn.product_id, UnlockSource::Purchase))
            }
            PurchaseOutcome::Verified(_)
            | PurchaseOutcome::Unverified
            | PurchaseOutcome::Cancelled => Ok(None),
        }
    }

    /// Re-scan current entitlements on user request.
    pub async fn restore(&mut self) -> Result<Option<Event>, CommerceError> {
        self.scan_entitlements(UnlockSource::Restore).await
    }

    /// Startup reconciliation of the persisted flag against the
    /// entitlement stream. Only ever promotes; a scan that finds nothing
    /// leaves a persisted premium flag untouched.
    pub async fn reconcile(&mut self) -> Result<Option<Event>, CommerceError> {
        self.scan_entitlements(UnlockSource::Reconcile).await
    }

    async fn scan_entitlements(
        &mut self,
        source: UnlockSource,
    ) -> Result<Option<Event>, CommerceError> {
        let mut event = None;
        for result in self.storefront.current_entitlements().await? {
            if let VerificationResult::Verified(txn) = result {
                if is_known_product(&txn.product_id) {
                    event = event.or(self.unlock(txn.product_id, source));
                }
            }
        }
        Ok(event)
    }

    fn unlock(&mut self, product_id: String, source: UnlockSource) -> Option<Event> {
        let was = self.state;
        self.state = EntitlementState::Premium;
        // Persist on every confirmation; a failed write leaves the
        // in-memory state ahead of disk until the next one.
        if let Err(e) = self.store.set_bool(keys::IS_PREMIUM, true) {
            eprintln!("failed to persist premium flag: {e}");
        }
        if was == EntitlementState::Free {
            Some(Event::PremiumUnlocked {
                product_id,
                source,
                at: Utc::now(),
            })
        } else {
            None
        }
    }
}
