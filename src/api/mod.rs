//! Pokemon Global Link portal client: profile scraping and trade listing.

mod client;
mod scrape;
mod types;

pub use client::{GtsClient, TRADES_PER_PAGE};
pub use scrape::{script_var, AccountDataExtractor, ScriptVarExtractor, ACCOUNT_ID_VAR, SAVE_DATA_ID_VAR};
pub use types::*;
