//! Commerce capability boundary.
//!
//! The entitlement controller only ever consumes verified transactions
//! whose product id is in [`PRODUCT_IDS`]; everything else about the
//! storefront is opaque. [`LocalStorefront`] is the desktop stand-in: a
//! receipts journal on disk instead of a platform purchase API.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommerceError, StoreError};
use crate::store::data_dir;

/// Product identifiers that unlock premium.
pub const PRODUCT_IDS: [&str; 4] = [
    "tallykit.lifetime",
    "tallykit.weekly",
    "tallykit.monthly",
    "tallykit.annual",
];

pub fn is_known_product(id: &str) -> bool {
    PRODUCT_IDS.contains(&id)
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub display_name: String,
    pub price: String,
}

/// A completed storefront transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub product_id: String,
    pub purchased_at: DateTime<Utc>,
}

/// Outcome of a purchase call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Cryptographically verified by the storefront.
    Verified(Transaction),
    /// Completed but failed verification; treated as a failed purchase.
    Unverified,
    /// The user backed out; a no-op, not an error.
    Cancelled,
}

/// One element of the entitlement enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Verified(Transaction),
    Unverified,
}

/// The platform commerce capability.
#[allow(async_fn_in_trait)]
pub trait Storefront {
    /// Fetch the products matching `ids`. May return fewer than asked.
    async fn fetch_products(&self, ids: &[&str]) -> Result<Vec<Product>, CommerceError>;

    /// Run the purchase flow for one product to completion.
    async fn purchase(&self, product: &Product) -> Result<PurchaseOutcome, CommerceError>;

    /// Enumerate the entitlements currently held by this user.
    async fn current_entitlements(&self) -> Result<Vec<VerificationResult>, CommerceError>;
}

/// File-backed sandbox storefront for desktop processes.
///
/// Purchases append to a receipts journal; entitlement enumeration
/// replays it. `TALLYKIT_STOREFRONT=cancel|unverified` forces those
/// purchase outcomes for manual testing of the no-op branches.
#[derive(Debug, Clone)]
pub struct LocalStorefront {
    path: PathBuf,
}

impl LocalStorefront {
    /// Open the journal at its default location in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::open_at(data_dir()?.join("receipts.json")))
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn receipts(&self) -> Vec<Transaction> {
        std::fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    fn record(&self, txn: &Transaction) -> Result<(), CommerceError> {
        let mut receipts = self.receipts();
        receipts.push(txn.clone());
        let bytes = serde_json::to_vec_pretty(&receipts)
            .map_err(|e| CommerceError::PurchaseFailed(e.to_string()))?;
        std::fs::write(&self.path, bytes)
            .map_err(|e| CommerceError::PurchaseFailed(e.to_string()))
    }

    fn catalog() -> Vec<Product> {
        let entry = |id: &str, display_name: &str, price: &str| Product {
            id: id.to_string(),
            display_name: display_name.to_string(),
            price: price.to_string(),
        };
        vec![
            entry("tallykit.lifetime", "TallyKit Premium (Lifetime)", "$19.99"),
            entry("tallykit.weekly", "TallyKit Premium (Weekly)", "$0.99"),
            entry("tallykit.monthly", "TallyKit Premium (Monthly)", "$2.99"),
            entry("tallykit.annual", "TallyKit Premium (Annual)", "$14.99"),
        ]
    }
}

impl Storefront for LocalStorefront {
    async fn fetch_products(&self, ids: &[&str]) -> Result<Vec<Product>, CommerceError> {
        Ok(Self::catalog()
            .into_iter()
            .filter(|p| ids.contains(&p.id.as_str()))
            .collect())
    }

    async fn purchase(&self, product: &Product) -> Result<PurchaseOutcome, CommerceError> {
        match std::env::var("TALLYKIT_STOREFRONT").as_deref() {
            Ok("cancel") => return Ok(PurchaseOutcome::Cancelled),
            Ok("unverified") => return Ok(PurchaseOutcome::Unverified),
            _ => {}
        }
        let txn = Transaction {
            product_id: product.id.clone(),
            purchased_at: Utc::now(),
        };
        self.record(&txn)?;
        Ok(PurchaseOutcome::Verified(txn))
    }

    async fn current_entitlements(&self) -> Result<Vec<VerificationResult>, CommerceError> {
        Ok(self
            .receipts()
            .into_iter()
            .map(VerificationResult::Verified)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_products_filters_by_requested_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let storefront = LocalStorefront::open_at(tmp.path().join("receipts.json"));
        let products = storefront
            .fetch_products(&["tallykit.lifetime", "not.a.product"])
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "tallykit.lifetime");
    }

    #[tokio::test]
    async fn purchase_appends_a_replayable_receipt() {
        let tmp = tempfile::tempdir().unwrap();
        let storefront = LocalStorefront::open_at(tmp.path().join("receipts.json"));
        assert!(storefront.current_entitlements().await.unwrap().is_empty());

        let product = LocalStorefront::catalog().remove(0);
        let outcome = storefront.purchase(&product).await.unwrap();
        assert!(matches!(outcome, PurchaseOutcome::Verified(_)));

        let entitlements = storefront.current_entitlements().await.unwrap();
        assert_eq!(entitlements.len(), 1);
        match &entitlements[0] {
            VerificationResult::Verified(txn) => assert_eq!(txn.product_id, product.id),
            VerificationResult::Unverified => panic!("expected verified receipt"),
        }
    }

    #[test]
    fn known_product_ids() {
        assert!(is_known_product("tallykit.annual"));
        assert!(!is_known_product("othershop.annual"));
    }
}
