//! Fixtures shared by API, rendering and CLI tests.

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use super::{Character, CharacterId, CharacterPage, CharacterStatus, LocationRef, PageInfo};

pub fn character_json(id: CharacterId, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "type": "",
        "gender": "Male",
        "origin": { "name": "Earth (C-137)", "url": "https://rickandmortyapi.com/api/location/1" },
        "location": { "name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3" },
        "image": format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        "episode": [
            "https://rickandmortyapi.com/api/episode/1",
            "https://rickandmortyapi.com/api/episode/2"
        ],
        "url": format!("https://rickandmortyapi.com/api/character/{id}"),
        "created": "2017-11-04T18:48:46.250Z"
    })
}

pub fn page_json(results: &[serde_json::Value], pages: u32, next: Option<&str>, prev: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "info": { "count": results.len(), "pages": pages, "next": next, "prev": prev },
        "results": results
    })
}

pub fn character(id: CharacterId, name: &str) -> Character {
    Character {
        id,
        name: name.to_owned(),
        status: CharacterStatus::Alive,
        species: "Human".to_owned(),
        kind: String::new(),
        gender: "Male".to_owned(),
        origin: LocationRef {
            name: "Earth (C-137)".to_owned(),
            url: "https://rickandmortyapi.com/api/location/1".to_owned(),
        },
        location: LocationRef {
            name: "Citadel of Ricks".to_owned(),
            url: "https://rickandmortyapi.com/api/location/3".to_owned(),
        },
        image: format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        episode: vec![
            "https://rickandmortyapi.com/api/episode/1".to_owned(),
            "https://rickandmortyapi.com/api/episode/2".to_owned(),
        ],
        url: format!("https://rickandmortyapi.com/api/character/{id}"),
        created: "2017-11-04T18:48:46.250Z".to_owned(),
    }
}

pub fn page(results: Vec<Character>, count: u32, pages: u32) -> CharacterPage {
    CharacterPage {
        info: PageInfo { count, pages, next: None, prev: None },
        results,
    }
}

// =============================================================================
// FAKE API
// =============================================================================

pub const ROSTER: &[(CharacterId, &str)] = &[(1, "Rick Sanchez"), (2, "Morty Smith"), (8, "Adjudicator Rick")];

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "There is nothing here" }))).into_response()
}

async fn list(Query(params): Query<HashMap<String, String>>) -> Response {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    if page != 1 {
        return not_found();
    }
    let needle = params.get("name").map(|n| n.to_lowercase());
    let results: Vec<_> = ROSTER
        .iter()
        .filter(|(_, name)| needle.as_ref().is_none_or(|n| name.to_lowercase().contains(n.as_str())))
        .map(|(id, name)| character_json(*id, name))
        .collect();
    if results.is_empty() {
        return not_found();
    }
    Json(page_json(&results, 1, None, None)).into_response()
}

async fn by_ids(Path(ids): Path<String>) -> Response {
    let lookup = |raw: &str| {
        let id: CharacterId = raw.parse().ok()?;
        ROSTER.iter().find(|(rid, _)| *rid == id).map(|(id, name)| character_json(*id, name))
    };
    if ids.contains(',') {
        let found: Vec<_> = ids.split(',').filter_map(lookup).collect();
        return Json(serde_json::Value::Array(found)).into_response();
    }
    match lookup(&ids) {
        Some(character) => Json(character).into_response(),
        None => not_found(),
    }
}

/// Serve a tiny copy of the API on an ephemeral port and return its origin.
///
/// Routes: `/api/character`, `/api/character/{ids}`, `/broken/character`
/// (always 500) and `/garbled/character/{id}` (200 with a non-JSON body).
pub async fn spawn_fake_api() -> String {
    let app = Router::new()
        .route("/api/character", get(list))
        .route("/api/character/{ids}", get(by_ids))
        .route("/broken/character", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbled/character/{id}", get(|| async { "not json" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
