use super::*;
use crate::api::test_helpers::spawn_fake_api;
use crate::config::RequestTimeouts;
use crate::favorites::FAVORITES_STORAGE_KEY;
use crate::storage::MemoryStorage;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("rickdex").chain(args.iter().copied())).unwrap()
}

fn app_at(base: &str, storage: &MemoryStorage, json: bool) -> App<MemoryStorage> {
    let api = CharacterService::new(base, RequestTimeouts { request_secs: 5, connect_secs: 5 }).unwrap();
    App::new(api, FavoritesStore::new(storage.clone()), json)
}

/// App whose API is unreachable; only favorites commands that stay local work.
fn offline_app(storage: &MemoryStorage, json: bool) -> App<MemoryStorage> {
    app_at("http://127.0.0.1:9/api", storage, json)
}

async fn run_args(app: &mut App<MemoryStorage>, args: &[&str]) -> Result<String, CliError> {
    execute(app, parse(args).command).await
}

// =============================================================================
// argument parsing
// =============================================================================

#[test]
fn page_defaults_to_one() {
    let cli = parse(&["list"]);
    assert!(matches!(cli.command, Command::List { page: 1 }));
    assert!(!cli.json);
}

#[test]
fn page_zero_rejected() {
    assert!(Cli::try_parse_from(["rickdex", "list", "--page", "0"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = parse(&["fav", "count", "--json", "--data-dir", "/tmp/x"]);
    assert!(cli.json);
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
}

#[test]
fn search_takes_name_and_page() {
    let cli = parse(&["search", "rick", "--page", "3"]);
    assert!(matches!(cli.command, Command::Search { ref name, page: 3 } if name == "rick"));
}

#[test]
fn non_numeric_id_rejected() {
    assert!(Cli::try_parse_from(["rickdex", "show", "rick"]).is_err());
}

// =============================================================================
// favorites commands
// =============================================================================

#[tokio::test]
async fn fav_add_remove_toggle_persist() {
    let storage = MemoryStorage::new();
    let mut app = offline_app(&storage, false);

    let out = run_args(&mut app, &["fav", "add", "1"]).await.unwrap();
    assert_eq!(out, "character 1 is a favorite (1 total)");
    run_args(&mut app, &["fav", "toggle", "2"]).await.unwrap();
    assert_eq!(storage.raw(FAVORITES_STORAGE_KEY).as_deref(), Some("[1,2]"));

    let out = run_args(&mut app, &["fav", "remove", "1"]).await.unwrap();
    assert_eq!(out, "character 1 is not a favorite (1 total)");
    assert_eq!(storage.raw(FAVORITES_STORAGE_KEY).as_deref(), Some("[2]"));
}

#[tokio::test]
async fn fav_state_survives_new_app() {
    let storage = MemoryStorage::new();
    let mut app = offline_app(&storage, false);
    run_args(&mut app, &["fav", "add", "5"]).await.unwrap();
    run_args(&mut app, &["fav", "add", "3"]).await.unwrap();

    let mut reopened = offline_app(&storage, false);
    let out = run_args(&mut reopened, &["fav", "list", "--ids-only"]).await.unwrap();
    assert_eq!(out, "5\n3");
}

#[tokio::test]
async fn fav_clear_and_count() {
    let storage = MemoryStorage::new();
    storage.insert_raw(FAVORITES_STORAGE_KEY, "[1,2,3]");
    let mut app = offline_app(&storage, false);
    assert_eq!(run_args(&mut app, &["fav", "count"]).await.unwrap(), "3 favorites");
    assert_eq!(run_args(&mut app, &["fav", "clear"]).await.unwrap(), "0 favorites");
    assert_eq!(storage.raw(FAVORITES_STORAGE_KEY).as_deref(), Some("[]"));
}

#[tokio::test]
async fn fav_json_output() {
    let storage = MemoryStorage::new();
    let mut app = offline_app(&storage, true);
    let out = run_args(&mut app, &["fav", "toggle", "7"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value, serde_json::json!({ "id": 7, "favorite": true, "count": 1 }));

    let out = run_args(&mut app, &["fav", "list", "--ids-only"]).await.unwrap();
    assert_eq!(serde_json::from_str::<Vec<u32>>(&out).unwrap(), vec![7]);
}

#[tokio::test]
async fn fav_list_empty_makes_no_request() {
    let storage = MemoryStorage::new();
    let mut app = offline_app(&storage, false);
    assert_eq!(run_args(&mut app, &["fav", "list"]).await.unwrap(), "no favorites yet");
}

#[tokio::test]
async fn fav_list_fetches_in_favorite_order() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    storage.insert_raw(FAVORITES_STORAGE_KEY, "[8,1]");
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let out = run_args(&mut app, &["fav", "list"]).await.unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Adjudicator Rick"));
    assert!(lines[1].contains("Rick Sanchez"));
    assert!(lines.iter().all(|l| l.starts_with('*')));
}

// =============================================================================
// API commands
// =============================================================================

#[tokio::test]
async fn list_marks_favorites() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    storage.insert_raw(FAVORITES_STORAGE_KEY, "[2]");
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let out = run_args(&mut app, &["list"]).await.unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert!(lines[1].starts_with('*') && lines[1].contains("Morty Smith"));
    assert!(!lines[0].starts_with('*'));
    assert_eq!(*lines.last().unwrap(), "page 1 of 1 (3 characters)");
}

#[tokio::test]
async fn list_past_last_page_is_error() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let err = run_args(&mut app, &["list", "--page", "2"]).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::Status { status: 404 })));
}

#[tokio::test]
async fn search_without_match_renders_message() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let out = run_args(&mut app, &["search", "zzz"]).await.unwrap();
    assert_eq!(out, "no characters match \"zzz\"");
}

#[tokio::test]
async fn search_json_returns_page() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    let mut app = app_at(&format!("{base}/api"), &storage, true);
    let out = run_args(&mut app, &["search", "morty"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["results"][0]["name"], "Morty Smith");
    assert_eq!(value["info"]["pages"], 1);
}

#[tokio::test]
async fn search_json_without_match_is_empty_page() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    let mut app = app_at(&format!("{base}/api"), &storage, true);
    let out = run_args(&mut app, &["search", "zzz"]).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["info"]["count"], 0);
    assert_eq!(value["info"]["pages"], 0);
    assert!(value["info"]["next"].is_null());
    assert_eq!(value["results"], serde_json::json!([]));
}

#[tokio::test]
async fn show_renders_detail_with_favorite_flag() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    storage.insert_raw(FAVORITES_STORAGE_KEY, "[1]");
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let out = run_args(&mut app, &["show", "1"]).await.unwrap();
    assert!(out.starts_with("#1 Rick Sanchez [favorite]"));
}

#[tokio::test]
async fn show_unknown_id_is_not_found() {
    let base = spawn_fake_api().await;
    let storage = MemoryStorage::new();
    let mut app = app_at(&format!("{base}/api"), &storage, false);
    let err = run_args(&mut app, &["show", "999"]).await.unwrap_err();
    assert!(matches!(err, CliError::NotFound(999)));
    assert_eq!(err.to_string(), "character 999 not found");
}

#[tokio::test]
async fn unreachable_api_is_request_error() {
    let storage = MemoryStorage::new();
    let mut app = offline_app(&storage, false);
    let err = run_args(&mut app, &["list"]).await.unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::Request(_))));
}
