//! Rick and Morty character browser: API client, local favorites, and CLI.
//!
//! ARCHITECTURE
//! ============
//! `favorites` owns the favorite-id set and mirrors it into a `storage`
//! backend on every mutation. `api` fetches character data over HTTP. `cli`
//! wires both together behind `config` and prints through `render`.

pub mod api;
pub mod cli;
pub mod config;
pub mod favorites;
pub mod render;
pub mod storage;
