use clap::Subcommand;

use tallykit_core::{EntitlementController, FileStore, LocalStorefront};

use super::emit;

#[derive(Subcommand)]
pub enum PremiumAction {
    /// Show the current entitlement state
    Status,
    /// List available products
    Products,
    /// Purchase a product
    Buy {
        /// Product id (see 'premium products')
        product_id: String,
    },
    /// Restore previous purchases
    Restore,
}

pub fn run(action: PremiumAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(action))
}

async fn run_async(action: PremiumAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open()?;
    let storefront = LocalStorefront::open()?;
    let mut controller = EntitlementController::new(store, storefront);

    match action {
        PremiumAction::Status => {
            // Startup-style reconciliation; a commerce failure is
            // non-fatal and leaves the persisted state authoritative.
            if let Err(e) = controller.reconcile().await {
                eprintln!("entitlement check failed: {e}");
            }
            println!("{}", if controller.is_premium() { "premium" } else { "free" });
        }
        PremiumAction::Products => {
            if let Err(e) = controller.refresh_products().await {
                eprintln!("failed to fetch products: {e}");
            }
            if controller.products().is_empty() {
                eprintln!("no products available");
            }
            for p in controller.products() {
                println!("{}  {}  {}", p.id, p.price, p.display_name);
            }
        }
        PremiumAction::Buy { product_id } => {
            if controller.is_premium() {
                eprintln!("already premium");
                return Ok(());
            }
            if let Err(e) = controller.refresh_products().await {
                eprintln!("failed to fetch products: {e}");
            }
            let Some(product) = controller.product(&product_id).cloned() else {
                eprintln!("unknown product: {product_id}");
                std::process::exit(1);
            };
            match controller.purchase(&product).await? {
                Some(event) => {
                    emit(&event);
                    eprintln!("premium unlocked");
                }
                None => eprintln!("purchase did not complete; nothing changed"),
            }
        }
        PremiumAction::Restore => match controller.restore().await? {
            Some(event) => {
                emit(&event);
                eprintln!("premium restored");
            }
            None => {
                if controller.is_premium() {
                    eprintln!("already premium");
                } else {
                    eprintln!("no restorable purchases found");
                }
            }
        },
    }
    Ok(())
}
