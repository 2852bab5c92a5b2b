use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::application::checkout::{CheckoutEngine, SharedCart};
use storefront::application::store::CartStore;
use storefront::domain::order::{BillingInfo, PaymentMode};
use storefront::domain::ports::{CartStorageBox, OrderHandoffBox};
use storefront::domain::pricing::PricingConfig;
use storefront::error::StorefrontError;
use storefront::infrastructure::in_memory::{InMemoryCartStorage, InMemoryHandoff};
#[cfg(feature = "storage-rocksdb")]
use storefront::infrastructure::rocksdb::RocksDbStore;
use storefront::interfaces::csv::event_reader::{CartEvent, EventKind, EventReader};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input cart events CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Consume and print the pending order record before processing events,
    /// as the confirmation view would after a navigation.
    #[arg(long)]
    show_pending: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let (storage, handoff): (CartStorageBox, OrderHandoffBox) = match cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            // Use persistent storage (RocksDB) for cart and handoff.
            let store = RocksDbStore::open(db_path).into_diagnostic()?;
            (Box::new(store.clone()), Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            return Err(miette::miette!(
                "this build has no persistent storage; enable the `storage-rocksdb` feature"
            ));
        }
        None => (
            Box::new(InMemoryCartStorage::new()),
            Box::new(InMemoryHandoff::new()),
        ),
    };

    if cli.show_pending {
        match handoff.take().await.into_diagnostic()? {
            Some(record) => {
                println!("pending: {}", serde_json::to_string(&record).into_diagnostic()?)
            }
            None => println!("pending: none"),
        }
    }

    let pricing = PricingConfig::default();
    let cart: SharedCart = Arc::new(Mutex::new(CartStore::load(storage).await));
    let engine = CheckoutEngine::new(pricing.clone(), handoff);

    // Process cart events
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = apply_event(&engine, &cart, event).await {
                    eprintln!("Error applying event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading event: {}", e);
            }
        }
    }

    // Output final cart totals
    let totals = cart.lock().await.totals(&pricing);
    println!(
        "totals: subtotal={} shipping={} tax={} discount={} total={}",
        totals.subtotal, totals.shipping, totals.tax, totals.discount, totals.total
    );

    Ok(())
}

async fn apply_event(
    engine: &CheckoutEngine,
    cart: &SharedCart,
    event: CartEvent,
) -> storefront::error::Result<()> {
    match event.op {
        EventKind::Add => {
            let details = event.item_details()?;
            let quantity = event.qty.unwrap_or(1);
            cart.lock().await.add_item(details, quantity).await;
        }
        EventKind::Remove => {
            let id = event.item_id()?;
            cart.lock().await.remove_item(&id).await;
        }
        EventKind::Qty => {
            let id = event.item_id()?;
            let quantity = event
                .qty
                .ok_or_else(|| StorefrontError::Validation("`qty` is required".to_string()))?;
            cart.lock().await.update_quantity(&id, quantity).await;
        }
        EventKind::Delivery => {
            let method = event
                .method
                .ok_or_else(|| StorefrontError::Validation("`method` is required".to_string()))?;
            cart.lock().await.set_delivery_method(method).await;
        }
        EventKind::ItemDelivery => {
            let id = event.item_id()?;
            let method = event
                .method
                .ok_or_else(|| StorefrontError::Validation("`method` is required".to_string()))?;
            cart.lock().await.update_item_delivery_method(&id, method).await;
        }
        EventKind::Promo => {
            let code = event.code.clone().unwrap_or_default();
            cart.lock().await.set_promo_code(code).await;
        }
        EventKind::Clear => {
            cart.lock().await.clear().await;
        }
        EventKind::Checkout => {
            let record = engine
                .submit(cart, &demo_billing(), PaymentMode::Simulated)
                .await?;
            println!("order: {}", serde_json::to_string(&record)?);
        }
    }
    Ok(())
}

/// The CLI runs simulated checkouts with a fixed demo shopper.
fn demo_billing() -> BillingInfo {
    BillingInfo {
        name: "Demo Shopper".to_string(),
        email: "demo@example.com".to_string(),
        phone: None,
        address: "1 Demo Way".to_string(),
        city: "Springfield".to_string(),
        region: "OR".to_string(),
        postal_code: "97477".to_string(),
    }
}
