//! Shared types for the Skinsdrip merchant SDK
//!
//! This crate provides the core type definitions used across the SDK.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`SessionToken`] - Opaque credential issued by authentication
//! - [`MerchantEvent`], [`TradeUpdate`] - Parsed stream event payloads
//! - [`OrderStatus`] - Trade lifecycle states
//! - [`Order`], [`Balance`], [`InventoryItem`] - REST domain models
//! - [`SkinsdripError`] - Error taxonomy

pub mod error;
pub mod events;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use error::*;
pub use events::*;
pub use models::*;
pub use session::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
