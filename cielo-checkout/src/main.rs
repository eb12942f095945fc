//! Cielo Checkout command line
//!
//! Creates a single-item checkout session and prints the redirect URL.
//!
//! # Usage
//!
//! ```bash
//! CIELO_MERCHANT_ID=... cargo run -p cielo-checkout -- invoice 42 "Annual plan" 199.90
//!
//! # Keep the order record in PostgreSQL
//! DATABASE_URL=postgres://... cargo run -p cielo-checkout --features postgres -- invoice 42 "Annual plan" 199.90
//! ```
//!
//! # Environment Variables
//!
//! - `CIELO_MERCHANT_ID`: Merchant identifier (required)
//! - `CIELO_API_URL`: API base URL (default: production)
//! - `CIELO_TIMEOUT_SECS`: Request timeout (default: 10)
//! - `DATABASE_URL`: PostgreSQL connection string (`postgres` feature only)

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use cielo_checkout::{CheckoutConfig, CheckoutService};
use cielo_domain::{Amount, CartItem, CartOrder, PayableRef};
use cielo_store::CheckoutOrderStore;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct Args {
    payable: PayableRef,
    item_name: String,
    unit_price: Amount,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    if args.len() != 5 {
        return Err(anyhow!("Usage: cielo-checkout <payable-type> <payable-id> <item-name> <unit-price>"));
    }

    let payable = PayableRef::new(args[1].as_str(), args[2].as_str())?;
    let price = Decimal::from_str(&args[4]).with_context(|| format!("Invalid unit price: {}", args[4]))?;

    Ok(Args {
        payable,
        item_name: args[3].clone(),
        unit_price: Amount::new(price)?,
    })
}

async fn run<S: CheckoutOrderStore>(config: &CheckoutConfig, store: Arc<S>, args: Args) -> anyhow::Result<()> {
    let service = CheckoutService::from_config(config, store);

    let item = CartItem::new(args.item_name, args.unit_price, 1)?;
    let mut order = CartOrder::new();
    order.configure_cart(|cart| {
        cart.add_item(item);
    });

    let url = service.request(&mut order, &args.payable).await?;
    println!("{}", url);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("cielo_checkout=info".parse()?))
        .init();

    let args = parse_args(&std::env::args().collect::<Vec<_>>())?;
    let config = CheckoutConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = %config.api_url,
        payable = %args.payable,
        "Cielo Checkout"
    );

    #[cfg(feature = "postgres")]
    if let Ok(database_url) = std::env::var("DATABASE_URL") {
        let pool = sqlx::PgPool::connect(&database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        let store = Arc::new(cielo_store::PgCheckoutStore::new(Arc::new(pool)));
        return run(&config, store, args).await;
    }

    run(&config, Arc::new(cielo_store::MemoryStore::new()), args).await
}
