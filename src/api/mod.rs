//! Character API client and wire types.
//!
//! ERROR HANDLING
//! ==============
//! Every fetch returns `Result<_, ApiError>`. A non-success HTTP status is
//! surfaced as-is with no retry so the caller can decide how to present it.

mod client;
mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::CharacterService;
pub use types::{ApiError, Character, CharacterId, CharacterPage, CharacterStatus, LocationRef, PageInfo};
