//! Simple example: authenticate and print merchant events
//!
//! Run with: cargo run --example subscribe_events
//!
//! Requires SKINSDRIP_MERCHANT_ID and SKINSDRIP_MERCHANT_SECRET.

use skinsdrip_sdk::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let creds = MerchantCredentials::from_env()?;
    let client = SkinsdripClient::builder(creds.merchant_id(), creds.secret())
        .with_testmode(true)
        .build()?;

    println!("Authenticating...");
    client.authenticate().await?;

    let balance = client.get_balance().await?;
    println!("Balance: {}", balance.balance);

    // Print every trade lifecycle notification as it arrives
    client.subscribe("trade:update", |event| {
        if let MerchantEvent::TradeUpdate(update) = event {
            println!("order {} is now {}", update.order_id, update.status);
        }
    })?;

    println!("Listening for trade updates for 60 seconds...");
    tokio::time::sleep(Duration::from_secs(60)).await;

    println!("Shutting down...");
    client.shutdown();
    Ok(())
}
