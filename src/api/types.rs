//! Wire types for the Rick and Morty character API.

use serde::{Deserialize, Serialize};

/// Numeric character identifier.
pub type CharacterId = u32;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by character API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is not usable.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request failed before a response arrived.
    #[error("API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16 },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// The API answers 404 for unknown ids and for searches with no match.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}

// =============================================================================
// CHARACTER
// =============================================================================

/// Life status as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl CharacterStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
            Self::Unknown => "unknown",
        }
    }
}

/// Named link to an origin or location resource. Both fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

/// A character record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    /// Subspecies or variant; frequently empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

// =============================================================================
// PAGING
// =============================================================================

/// Pagination metadata returned with every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl CharacterPage {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.info.prev.is_some()
    }
}
