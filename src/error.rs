//! Typed failures raised by the GTS client.
//!
//! Operations return `anyhow::Result`; these variants are wrapped inside so
//! callers can `downcast_ref::<GtsError>()` when they need to branch on them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GtsError {
    #[error(
        "User data cannot be loaded on {url} for user {profile_id}. \
         Please check that the profile is public on the Pokemon Global Link."
    )]
    AccountDataNotFound { url: String, profile_id: String },

    #[error("Trade list is empty")]
    EmptyTradeList,

    #[error("Invalid trade date: {value:?}")]
    InvalidTradeDate { value: String },

    #[error("Request failed: {status} - {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Unknown language id: {0}")]
    InvalidLanguage(u8),
}
