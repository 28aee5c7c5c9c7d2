//! HTTP client for the character API.
//!
//! Thin `reqwest` wrapper. URL building and body parsing are free functions so
//! they can be tested without a network.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::types::{ApiError, Character, CharacterId, CharacterPage};
use crate::config::RequestTimeouts;

// =============================================================================
// CLIENT
// =============================================================================

/// Stateless fetcher for character pages and records.
#[derive(Debug, Clone)]
pub struct CharacterService {
    http: reqwest::Client,
    base_url: String,
}

impl CharacterService {
    /// Build a client for `base_url` (for example `https://rickandmortyapi.com/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// http(s) URL, or [`ApiError::HttpClientBuild`] if the client fails to build.
    pub fn new(base_url: &str, timeouts: RequestTimeouts) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the full character listing.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn fetch_character_page(&self, page: u32) -> Result<CharacterPage, ApiError> {
        let url = character_page_url(&self.base_url, page)?;
        let body = self.get_text(url).await?;
        parse_page(&body)
    }

    /// Fetch one page of characters whose name contains `name`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; a search with no match is a 404 status.
    pub async fn fetch_characters_by_name(&self, name: &str, page: u32) -> Result<CharacterPage, ApiError> {
        let url = character_search_url(&self.base_url, name, page)?;
        let body = self.get_text(url).await?;
        parse_page(&body)
    }

    /// Fetch a single character.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; an unknown id is a 404 status.
    pub async fn fetch_character_by_id(&self, id: CharacterId) -> Result<Character, ApiError> {
        let url = character_url(&self.base_url, id)?;
        let body = self.get_text(url).await?;
        parse_character(&body)
    }

    /// Fetch several characters in one request. No request is made for an
    /// empty slice. Unknown ids are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-success status, or a
    /// malformed body.
    pub async fn fetch_characters_by_ids(&self, ids: &[CharacterId]) -> Result<Vec<Character>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = character_batch_url(&self.base_url, ids)?;
        let body = self.get_text(url).await?;
        parse_character_batch(&body)
    }

    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        debug!(%url, "api request");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "api request rejected");
            return Err(ApiError::Status { status: status.as_u16() });
        }

        response.text().await.map_err(|e| ApiError::Request(e.to_string()))
    }
}

// =============================================================================
// URLS
// =============================================================================

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl(format!("{raw}: unsupported scheme")));
    }
    Ok(trimmed.to_owned())
}

fn parse_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
}

fn character_page_url(base: &str, page: u32) -> Result<Url, ApiError> {
    let mut url = parse_url(&format!("{base}/character"))?;
    url.query_pairs_mut().append_pair("page", &page.to_string());
    Ok(url)
}

fn character_search_url(base: &str, name: &str, page: u32) -> Result<Url, ApiError> {
    let mut url = parse_url(&format!("{base}/character"))?;
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("page", &page.to_string());
    Ok(url)
}

fn character_url(base: &str, id: CharacterId) -> Result<Url, ApiError> {
    parse_url(&format!("{base}/character/{id}"))
}

fn character_batch_url(base: &str, ids: &[CharacterId]) -> Result<Url, ApiError> {
    let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
    parse_url(&format!("{base}/character/{joined}"))
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_page(json: &str) -> Result<CharacterPage, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

fn parse_character(json: &str) -> Result<Character, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))
}

/// The batch endpoint answers with a bare object when given a single id.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Character>),
    One(Box<Character>),
}

fn parse_character_batch(json: &str) -> Result<Vec<Character>, ApiError> {
    match serde_json::from_str(json).map_err(|e| ApiError::Parse(e.to_string()))? {
        OneOrMany::Many(characters) => Ok(characters),
        OneOrMany::One(character) => Ok(vec![*character]),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
