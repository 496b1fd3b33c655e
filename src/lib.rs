//! Pokemon Global Link GTS trade history client.
//!
//! Retrieves a player's Global Trade Station history from the portal in two
//! steps: the account and save-data ids are scraped from the public profile
//! page, then the trade-list endpoint is paged through.
//!
//! ```rust,ignore
//! use gts_history::{GtsClient, GtsConfig, Language};
//!
//! let mut client = GtsClient::with_config("ABCD-EFGH-IJKL-MNOP", GtsConfig::from_env()?)?;
//! client.set_language(Language::French);
//!
//! let latest = client.fetch_latest_trade().await?;
//! let history = client.fetch_all_trades().await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use api::{AccountDataExtractor, GtsClient, ScriptVarExtractor};
pub use config::{GtsConfig, Language};
pub use error::GtsError;
pub use models::{AccountData, Trade, TradePage};
