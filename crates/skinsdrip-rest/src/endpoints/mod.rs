//! Merchant API endpoint groups

pub mod merchant;
pub mod trading;

pub use merchant::MerchantEndpoints;
pub use trading::TradingEndpoints;
