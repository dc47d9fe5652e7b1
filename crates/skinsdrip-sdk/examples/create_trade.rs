//! Create a trade and wait for its completion callback
//!
//! Run with: cargo run --example create_trade
//!
//! Requires SKINSDRIP_MERCHANT_ID and SKINSDRIP_MERCHANT_SECRET, plus a
//! test-mode user with a tradable inventory.

use skinsdrip_sdk::prelude::*;
use std::time::Duration;
use tokio::sync::mpsc;

const STEAMID: &str = "76561198000000000";
const TRADEURL: &str = "https://steamcommunity.com/tradeoffer/new/?partner=1&token=xxxx";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let creds = MerchantCredentials::from_env()?;
    let client = SkinsdripClient::builder(creds.merchant_id(), creds.secret())
        .with_testmode(true)
        // Short fallback so the example finishes quickly even if the
        // stream misses the completion event
        .with_completion_timeout(Duration::from_secs(60))
        .build()?;

    client.authenticate().await?;

    // The channel must be up so completions can arrive over the stream
    client.subscribe("trade:update", |event| {
        println!("stream event: {:?}", event);
    })?;

    let inventory = client.get_inventory(STEAMID).await?;
    let offered: Vec<TradeItem> = inventory
        .iter()
        .filter(|item| item.tradable)
        .take(1)
        .map(|item| TradeItem {
            asset_id: item.asset_id.clone(),
            market_hash_name: item.market_hash_name.clone(),
            price: item.price,
        })
        .collect();

    let (done_tx, mut done_rx) = mpsc::channel(1);
    let receipt = client
        .create_trade(
            STEAMID,
            TRADEURL,
            offered,
            vec![],
            Some(Box::new(move |completion| {
                println!(
                    "order {} completed via {:?} with status {}",
                    completion.order_id, completion.source, completion.status
                );
                let _ = done_tx.try_send(());
            })),
        )
        .await?;

    println!("created order {}, waiting for completion...", receipt.order_id);
    done_rx.recv().await;

    client.shutdown();
    Ok(())
}
