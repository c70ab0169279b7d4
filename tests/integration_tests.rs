//! Integration tests for the chess scoreboard
//!
//! These tests drive the whole pipeline: fetch grids from a store, decode
//! them, replay the history, and write the re-encoded rows back.

// Modules for organizing tests
mod fixtures;

use chess_scoreboard::config::{AppConfig, StorageSettings};
use chess_scoreboard::marshal::{decode_all, Cell};
use chess_scoreboard::metrics::MetricsCollector;
use chess_scoreboard::storage::{GridStore, InMemoryGridStore, JsonFileGridStore};
use chess_scoreboard::{Game, Player, ReplayEngine, Scoreboard, ScoreboardError};
use tempfile::TempDir;

use fixtures::{club_store, text_grid, RecordingGridStore};

fn create_scoreboard() -> Scoreboard {
    Scoreboard::new(ReplayEngine::default(), StorageSettings::default())
}

fn standings(scoreboard: &Scoreboard) -> Vec<(u32, String, f64)> {
    scoreboard
        .standings()
        .into_iter()
        .map(|player| (player.rank, player.name.clone(), player.rating))
        .collect()
}

#[test]
fn test_load_replays_club_history() {
    let store = club_store();
    let mut scoreboard = create_scoreboard();

    let report = scoreboard.load(&store).unwrap();

    assert_eq!(report.games_replayed, 4);
    assert!(report.skipped.is_empty());
    assert_eq!(
        standings(&scoreboard),
        vec![
            (1, "Dade Cook".to_string(), 478.84),
            (2, "Carla Cook".to_string(), 407.15),
            (3, "Mary Ann Cook".to_string(), 407.15),
            (4, "Lane Cook".to_string(), 306.86),
        ]
    );

    let dade = scoreboard.player("dade cook").unwrap();
    assert_eq!((dade.wins, dade.losses, dade.stalemates), (2, 0, 1));
    let lane = scoreboard.player("Lane Cook").unwrap();
    assert_eq!((lane.wins, lane.losses, lane.stalemates), (0, 2, 0));
}

#[test]
fn test_complete_add_and_flush_workflow() {
    let store = club_store();
    let mut scoreboard = create_scoreboard();
    scoreboard.load(&store).unwrap();

    // Step 1: a new member joins and plays
    scoreboard.add_player("Nina Park").unwrap();
    let game_id = scoreboard.add_game("Nina Park", "dade cook", false).unwrap();
    assert_eq!(game_id, 5);

    // Step 2: write back
    scoreboard.flush(&store).unwrap();
    assert_eq!(store.written_ranges(), vec!["Players!1:7", "Games!1:7"]);

    // Step 3: the stored games sheet no longer carries the row-number column
    let writes = store.writes();
    let (_, game_rows) = &writes[1];
    assert_eq!(
        game_rows[0],
        vec![Cell::from("Winner"), Cell::from("Loser"), Cell::from("Stalemate?")]
    );
    assert_eq!(
        game_rows[5],
        vec![Cell::from("Nina Park"), Cell::from("Dade Cook"), Cell::Bool(false)]
    );
    assert!(game_rows[6].iter().all(Cell::is_blank));

    // Step 4: a fresh load reproduces the same leaderboard
    let mut reloaded = create_scoreboard();
    reloaded.load(&store).unwrap();
    assert_eq!(standings(&reloaded), standings(&scoreboard));
    assert_eq!(reloaded.games().count(), 5);
}

#[test]
fn test_flushed_players_are_written_in_rank_order() {
    let store = club_store();
    let mut scoreboard = create_scoreboard();
    scoreboard.load(&store).unwrap();
    scoreboard.flush(&store).unwrap();

    let grid = store.fetch_grid("Players").unwrap();
    let players: Vec<Player> = decode_all(&grid, None).unwrap();

    let ranks: Vec<u32> = players.iter().map(|player| player.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert_eq!(players[0].name, "Dade Cook");
    assert_eq!(players[0].wins, 2);
    assert_eq!(players[3].rating, 306.86);
}

#[test]
fn test_clear_games_then_flush_blanks_history() {
    let store = club_store();
    let mut scoreboard = create_scoreboard();
    scoreboard.load(&store).unwrap();

    scoreboard.clear_games().unwrap();
    scoreboard.flush(&store).unwrap();

    let games = store.fetch_grid("Games").unwrap();
    assert!(games[1..]
        .iter()
        .all(|row| row.iter().all(Cell::is_blank)));

    let mut reloaded = create_scoreboard();
    reloaded.load(&store).unwrap();
    assert!(reloaded.history().is_empty());
    assert!(reloaded
        .standings()
        .iter()
        .all(|player| player.rating == 400.0));
}

#[test]
fn test_unresolved_games_survive_a_round_trip() {
    let store = RecordingGridStore::new(InMemoryGridStore::with_sheets([
        (
            "Players",
            text_grid(&[&["Rank", "Name", "Rating"], &["1", "Dade Cook", "400"]]),
        ),
        (
            "Games",
            text_grid(&[
                &["Winner", "Loser", "Stalemate?"],
                &["Dade Cook", "Former Member", "false"],
            ]),
        ),
    ]));
    let mut scoreboard = create_scoreboard();

    let report = scoreboard.load(&store).unwrap();
    assert_eq!(report.games_skipped(), 1);
    assert!(matches!(
        report.skipped[0],
        ScoreboardError::UnresolvedIdentity { game_id: 1, .. }
    ));

    scoreboard.flush(&store).unwrap();

    // The game is kept as data even though it is not rated
    let games: Vec<Game> = decode_all(&store.fetch_grid("Games").unwrap(), None).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].loser_name, "Former Member");
}

#[test]
fn test_reordered_and_extra_columns_still_load() {
    let store = InMemoryGridStore::with_sheets([
        (
            "Players",
            text_grid(&[
                &["Email", "rating", "NAME", "Rank"],
                &["dade@example.com", "512.5", "Dade Cook", "1"],
                &["lane@example.com", "", "Lane Cook", "2"],
            ]),
        ),
        ("Games", text_grid(&[&["Winner", "Loser", "Stalemate?"]])),
    ]);
    let mut scoreboard = create_scoreboard();

    scoreboard.load(&store).unwrap();

    // Ratings are derived, so a stored rating never survives a recompute
    assert_eq!(scoreboard.player("Dade Cook").unwrap().rating, 400.0);
    assert_eq!(scoreboard.roster().len(), 2);
}

#[test]
fn test_bad_cell_fails_the_load() {
    let store = InMemoryGridStore::with_sheets([
        (
            "Players",
            text_grid(&[&["Rank", "Name"], &["first", "Dade Cook"]]),
        ),
        ("Games", text_grid(&[&["Winner", "Loser"]])),
    ]);
    let mut scoreboard = create_scoreboard();

    let err = scoreboard.load(&store).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScoreboardError>(),
        Some(ScoreboardError::InvalidScalarCoercion { field, .. }) if field == "Rank"
    ));
}

#[test]
fn test_json_file_store_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.storage.path = dir.path().join("club.json");

    {
        let store = JsonFileGridStore::open(&config.storage.path).unwrap();
        let mut scoreboard = Scoreboard::from_config(&config).unwrap();
        scoreboard.load(&store).unwrap();

        scoreboard.add_player("Alice Smith").unwrap();
        scoreboard.add_player("Bob Smith").unwrap();
        scoreboard.add_game("Alice Smith", "Bob Smith", false).unwrap();
        scoreboard.add_game("Alice Smith", "Bob Smith", false).unwrap();
        scoreboard.flush(&store).unwrap();
    }

    let store = JsonFileGridStore::open(&config.storage.path).unwrap();
    let mut scoreboard = Scoreboard::from_config(&config).unwrap();
    scoreboard.load(&store).unwrap();

    assert_eq!(
        standings(&scoreboard),
        vec![
            (1, "Alice Smith".to_string(), 485.99),
            (2, "Bob Smith".to_string(), 314.01),
        ]
    );
}

#[test]
fn test_custom_rating_model_from_config() {
    let mut config = AppConfig::default();
    config.rating.k_factor = 32.0;
    config.rating.base_rating = 1500.0;

    let store = InMemoryGridStore::new();
    let mut scoreboard = Scoreboard::from_config(&config).unwrap();
    scoreboard.load(&store).unwrap();
    scoreboard.add_player("Alice Smith").unwrap();
    scoreboard.add_player("Bob Smith").unwrap();
    scoreboard.add_game("Alice Smith", "Bob Smith", false).unwrap();

    assert_eq!(scoreboard.player("Alice Smith").unwrap().rating, 1516.0);
    assert_eq!(scoreboard.player("Bob Smith").unwrap().rating, 1484.0);
}

#[test]
fn test_metrics_follow_the_workflow() {
    let metrics = MetricsCollector::new().unwrap();
    let store = club_store();
    let mut scoreboard = create_scoreboard().with_metrics(metrics.clone());

    scoreboard.load(&store).unwrap();
    scoreboard.add_game("Lane Cook", "Carla Cook", true).unwrap();
    scoreboard.flush(&store).unwrap();

    assert_eq!(metrics.replay().recomputes_total.get(), 2);
    assert_eq!(metrics.replay().games_replayed_total.get(), 9);
    assert_eq!(metrics.replay().players.get(), 4);

    let text = metrics.gather_text().unwrap();
    assert!(text.contains("scoreboard_rows_written_total{sheet=\"Games\"} 7"));
    assert!(text.contains("scoreboard_grid_fetches_total{sheet=\"Players\"} 1"));
}
