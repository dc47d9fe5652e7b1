//! REST client for the Skinsdrip merchant API
//!
//! Every call is signed: the canonical signature over the body's scalar
//! fields is attached as a `signature` field, and authenticated calls
//! carry the session cookie issued by the authenticate endpoint.
//!
//! # Example
//!
//! ```no_run
//! use skinsdrip_auth::MerchantCredentials;
//! use skinsdrip_rest::{CreateTradeRequest, RestClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = MerchantCredentials::from_env()?;
//!     let client = RestClient::new(creds);
//!     client.authenticate().await?;
//!
//!     let inventory = client.get_inventory("76561198000000000").await?;
//!     println!("{} items", inventory.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod types;

// Re-export main types
pub use client::{RestClient, RestConfig};
pub use error::{RestError, RestResult};
pub use types::{ApiResponse, CreateTradeRequest, TradeParty};
