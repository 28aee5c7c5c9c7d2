//! Command-line front end: argument parsing and command execution.
//!
//! Commands return their rendered output as a `String` so the binary only has
//! to print it and tests can assert on it.

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::api::{ApiError, CharacterId, CharacterPage, CharacterService, PageInfo};
use crate::config::{AppConfig, ConfigError};
use crate::favorites::{FailureSink, FavoritesStore, TracingSink};
use crate::render;
use crate::storage::{FileStorage, KeyValueStore};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("character {0} not found")]
    NotFound(CharacterId),
    #[error("JSON encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "rickdex", about = "Browse Rick and Morty characters and keep favorites")]
pub struct Cli {
    /// API base URL; overrides RICKDEX_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the favorites file; overrides RICKDEX_DATA_DIR.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of characters.
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Search characters by name.
    Search {
        name: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show one character in detail.
    Show { id: CharacterId },
    /// Manage favorites.
    Fav(FavCommand),
}

#[derive(Args, Debug)]
struct FavCommand {
    #[command(subcommand)]
    command: FavSubcommand,
}

#[derive(Subcommand, Debug)]
enum FavSubcommand {
    Add { id: CharacterId },
    Remove { id: CharacterId },
    Toggle { id: CharacterId },
    Clear,
    Count,
    List {
        /// Print stored ids without contacting the API.
        #[arg(long, default_value_t = false)]
        ids_only: bool,
    },
}

/// Everything a command needs: the API client, the favorites store and the
/// output mode.
pub struct App<S, L = TracingSink> {
    api: CharacterService,
    favorites: FavoritesStore<S, L>,
    json: bool,
}

impl<S: KeyValueStore, L: FailureSink> App<S, L> {
    pub fn new(api: CharacterService, favorites: FavoritesStore<S, L>, json: bool) -> Self {
        Self { api, favorites, json }
    }
}

/// Build config, storage, store and client from the environment plus flags,
/// then run the parsed command.
///
/// # Errors
///
/// Returns a [`CliError`] on configuration or API failures.
pub async fn run(cli: Cli) -> Result<String, CliError> {
    let mut config = AppConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    debug!(base_url = %config.api_base_url, data_dir = %config.data_dir.display(), "config resolved");

    let storage = FileStorage::in_dir(&config.data_dir);
    let favorites = FavoritesStore::with_key(storage, TracingSink, config.favorites_key.clone());
    let api = CharacterService::new(&config.api_base_url, config.timeouts)?;

    let mut app = App::new(api, favorites, cli.json);
    execute(&mut app, cli.command).await
}

async fn execute<S: KeyValueStore, L: FailureSink>(app: &mut App<S, L>, command: Command) -> Result<String, CliError> {
    match command {
        Command::List { page } => list(app, page).await,
        Command::Search { name, page } => search(app, &name, page).await,
        Command::Show { id } => show(app, id).await,
        Command::Fav(fav) => run_fav(app, fav.command).await,
    }
}

async fn list<S: KeyValueStore, L: FailureSink>(app: &App<S, L>, page: u32) -> Result<String, CliError> {
    let result = app.api.fetch_character_page(page).await?;
    if app.json {
        return to_json(&result);
    }
    Ok(render::render_page(&result, page, |id| app.favorites.is_favorite(id)))
}

async fn search<S: KeyValueStore, L: FailureSink>(app: &App<S, L>, name: &str, page: u32) -> Result<String, CliError> {
    let result = match app.api.fetch_characters_by_name(name, page).await {
        Ok(result) => result,
        Err(e) if e.is_not_found() => {
            if app.json {
                let empty = CharacterPage {
                    info: PageInfo { count: 0, pages: 0, next: None, prev: None },
                    results: Vec::new(),
                };
                return to_json(&empty);
            }
            return Ok(render::no_match(name));
        }
        Err(e) => return Err(e.into()),
    };
    if app.json {
        return to_json(&result);
    }
    Ok(render::render_page(&result, page, |id| app.favorites.is_favorite(id)))
}

async fn show<S: KeyValueStore, L: FailureSink>(app: &App<S, L>, id: CharacterId) -> Result<String, CliError> {
    let character = match app.api.fetch_character_by_id(id).await {
        Ok(character) => character,
        Err(e) if e.is_not_found() => return Err(CliError::NotFound(id)),
        Err(e) => return Err(e.into()),
    };
    if app.json {
        return to_json(&character);
    }
    Ok(render::render_detail(&character, app.favorites.is_favorite(id)))
}

#[derive(Serialize)]
struct FavoriteState {
    id: CharacterId,
    favorite: bool,
    count: usize,
}

async fn run_fav<S: KeyValueStore, L: FailureSink>(
    app: &mut App<S, L>,
    command: FavSubcommand,
) -> Result<String, CliError> {
    let changed = match command {
        FavSubcommand::Add { id } => {
            app.favorites.add(id);
            id
        }
        FavSubcommand::Remove { id } => {
            app.favorites.remove(id);
            id
        }
        FavSubcommand::Toggle { id } => {
            app.favorites.toggle(id);
            id
        }
        FavSubcommand::Clear => {
            app.favorites.clear();
            return count_output(app);
        }
        FavSubcommand::Count => return count_output(app),
        FavSubcommand::List { ids_only } => return list_favorites(app, ids_only).await,
    };

    let state = FavoriteState {
        id: changed,
        favorite: app.favorites.is_favorite(changed),
        count: app.favorites.count(),
    };
    if app.json {
        return to_json(&state);
    }
    let verb = if state.favorite { "is" } else { "is not" };
    Ok(format!("character {} {verb} a favorite ({} total)", state.id, state.count))
}

fn count_output<S: KeyValueStore, L: FailureSink>(app: &App<S, L>) -> Result<String, CliError> {
    let count = app.favorites.count();
    if app.json {
        return to_json(&serde_json::json!({ "count": count }));
    }
    Ok(format!("{count} favorites"))
}

async fn list_favorites<S: KeyValueStore, L: FailureSink>(app: &App<S, L>, ids_only: bool) -> Result<String, CliError> {
    let ids = app.favorites.ids_array();
    if ids_only {
        if app.json {
            return to_json(&ids);
        }
        return Ok(ids.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"));
    }

    let mut characters = app.api.fetch_characters_by_ids(&ids).await?;
    characters.sort_by_key(|c| ids.iter().position(|&id| id == c.id).unwrap_or(usize::MAX));
    if app.json {
        return to_json(&characters);
    }
    if characters.is_empty() {
        return Ok("no favorites yet".to_owned());
    }
    Ok(render::render_list(&characters, |_| true))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
