//! End-to-end tests for the leaderboard pipeline

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::config::{LeaderboardConfig, MalformedPolicy, TierConfig};
use crate::{
    Commentary, CommentaryError, CommentaryProvider, CommentaryRequest, LeaderboardEngine,
    LeaderboardError, RawBatch, RawRow, Tier, UnavailableReason,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn row(value: Value) -> RawRow {
    match value {
        Value::Object(map) => map,
        _ => panic!("test rows must be objects"),
    }
}

fn player(id: u32, name: &str, team: &str, stats: [u32; 6], minutes: Value) -> RawRow {
    let [pts, reb, ast, stl, blk, tov] = stats;
    row(json!({
        "player_id": id,
        "player_name": name,
        "team": team,
        "points": pts,
        "rebounds": reb,
        "assists": ast,
        "steals": stl,
        "blocks": blk,
        "turnovers": tov,
        "minutes": minutes,
    }))
}

/// A realistic night: 20 rotation players plus two garbage-time cameos
fn slate() -> Vec<RawRow> {
    let mut rows = vec![
        player(201939, "Stephen Curry", "GSW", [30, 8, 5, 2, 0, 3], json!("34:12")),
        player(1629029, "Luka Doncic", "DAL", [41, 10, 12, 1, 0, 4], json!("38:40")),
        player(203999, "Nikola Jokic", "DEN", [26, 14, 11, 2, 1, 3], json!(36)),
        player(1630178, "Garbage Time Guy", "PHI", [9, 4, 2, 1, 1, 0], json!("9:45")),
        player(1631000, "Exactly Ten", "BOS", [12, 3, 1, 0, 0, 0], json!("10:30")),
    ];
    for i in 0..17u32 {
        rows.push(player(
            1_000 + i,
            &format!("Rotation {i:02}"),
            "NYK",
            [4 + i, 2 + i % 5, 1 + i % 3, i % 2, i % 3, 1 + i % 4],
            json!(format!("{}:00", 12 + i)),
        ));
    }
    rows
}

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_empty_batch_yields_empty_leaderboard() {
        let engine = LeaderboardEngine::default();
        let board = engine.build(&RawBatch::default()).unwrap();

        assert!(board.is_empty());
        assert!(board.apex().is_none());
        assert!(board.elite().is_empty());
        assert!(board.shame().is_empty());
        assert_eq!(board.rows_received, 0);
        assert!(board.rejected.is_empty());
    }

    #[test]
    fn test_full_slate() {
        init_tracing();
        let engine = LeaderboardEngine::default();
        let board = engine.build_from_rows(slate()).unwrap();

        assert_eq!(board.rows_received, 22);
        assert_eq!(board.ineligible, 2);
        assert_eq!(board.len(), 20);
        assert!(board.get("1630178").is_none());
        assert!(board.get("1631000").is_none());

        // Luka: 41 + 12 + 18 + 3 + 0 - 4 = 70
        let apex = board.apex().unwrap();
        assert_eq!(apex.player_name(), "Luka Doncic");
        assert_eq!(apex.rank, 1);
        assert_eq!(apex.fantasy_points(), Decimal::from(70));

        let curry = board.get("201939").unwrap();
        assert_eq!(curry.fantasy_points(), Decimal::from_str("50.1").unwrap());

        assert_eq!(board.elite().len(), 8);
        assert_eq!(board.elite()[0].player_name(), "Nikola Jokic");
        assert_eq!(board.shame().len(), 8);
        assert_eq!(board.tier_of("1629029"), Some(Tier::Apex));
        assert_eq!(board.tier_of("203999"), Some(Tier::Elite));
        assert_eq!(board.tier_of(board.entries().last().unwrap().player_id()), Some(Tier::Shame));
    }

    #[test]
    fn test_tier_membership_is_subset_and_ordered() {
        let engine = LeaderboardEngine::default();
        let board = engine.build_from_rows(slate()).unwrap();

        for entry in board.apex().into_iter().chain(board.elite()).chain(board.shame()) {
            assert!(board.entries().contains(entry));
        }
        assert!(board.elite().windows(2).all(|w| w[0].rank < w[1].rank));
        assert!(board.shame().windows(2).all(|w| w[0].fantasy_points() <= w[1].fantasy_points()));
        assert_eq!(board.shame()[0].rank as usize, board.len());
    }

    #[test]
    fn test_rebuild_is_identical_regardless_of_row_order() {
        let engine = LeaderboardEngine::default();
        let first = engine.build_from_rows(slate()).unwrap();

        let mut shuffled = slate();
        shuffled.reverse();
        shuffled.swap(0, 7);
        let second = engine.build_from_rows(shuffled).unwrap();

        assert_eq!(first.entries, second.entries);
        assert_eq!(first.tiers, second.tiers);
    }

    #[test]
    fn test_game_date_is_carried_through() {
        let engine = LeaderboardEngine::default();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let batch = RawBatch::from_rows(slate()).with_game_date(date);

        let board = engine.build(&batch).unwrap();
        assert_eq!(board.game_date, Some(date));
    }

    #[test]
    fn test_batch_deserializes_from_provider_json() {
        let batch: RawBatch = serde_json::from_value(json!({
            "game_date": "2025-01-15",
            "rows": [
                {"PLAYER_ID": 1, "PLAYER_NAME": "A", "TEAM_ABBREVIATION": "LAL",
                 "PTS": 20, "REB": 5, "AST": 5, "STL": 1, "BLK": 1, "TOV": 2, "MIN": "30:00"}
            ]
        }))
        .unwrap();

        let board = LeaderboardEngine::default().build(&batch).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.apex().unwrap().fantasy_points(), Decimal::from_str("37.5").unwrap());
    }

    #[test]
    fn test_leaderboard_serializes_for_presentation() {
        let board = LeaderboardEngine::default().build_from_rows(slate()).unwrap();
        let value = serde_json::to_value(&board).unwrap();

        let apex = &value["tiers"]["apex"];
        assert_eq!(apex["rank"], json!(1));
        assert_eq!(apex["player_name"], json!("Luka Doncic"));
        assert_eq!(apex["points"], json!(41));
        assert_eq!(apex["fantasy_points"], json!("70"));
    }
}

mod malformed_row_tests {
    use super::*;

    fn batch_with_bad_rows() -> Vec<RawRow> {
        let mut rows = slate();
        rows.push(player(42, "Negative Nancy", "MIA", [10, 2, 2, 0, 0, 0], json!(20)));
        rows.last_mut().unwrap().insert("assists".to_string(), json!(-2));
        rows.push(row(json!({"player_name": "No Id", "team": "MIA", "points": 3})));
        rows.push(player(201939, "Stephen Curry", "GSW", [2, 0, 0, 0, 0, 0], json!(15)));
        rows
    }

    #[test]
    fn test_skip_policy_drops_and_records() {
        init_tracing();
        let engine = LeaderboardEngine::default();
        let board = engine.build_from_rows(batch_with_bad_rows()).unwrap();

        assert_eq!(board.rows_received, 25);
        assert_eq!(board.len(), 20);
        assert_eq!(board.rejected.len(), 3);

        let indexes: Vec<usize> = board.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![22, 23, 24]);
        assert!(board.rejected[0].reason.contains("assists"));
        assert_eq!(board.rejected[1].player_id, None);
        assert_eq!(board.rejected[2].reason, "duplicate player id in batch");

        // The first Curry row is the one that counts
        assert_eq!(board.get("201939").unwrap().record().points, 30);
    }

    #[test]
    fn test_strict_policy_fails_batch() {
        let mut config = LeaderboardConfig::default();
        config.normalization.malformed_policy = MalformedPolicy::Strict;
        let engine = LeaderboardEngine::new(config).unwrap();

        let err = engine.build_from_rows(batch_with_bad_rows()).unwrap_err();
        match err {
            LeaderboardError::StrictBatchRejected { rejected, first } => {
                assert_eq!(rejected, 3);
                assert_eq!(first.row_index(), Some(22));
            }
            other => panic!("Expected StrictBatchRejected, got {other:?}"),
        }

        // Clean batches still go through in strict mode
        assert_eq!(engine.build_from_rows(slate()).unwrap().len(), 20);
    }

    #[test]
    fn test_invalid_config_rejected_by_engine() {
        let mut config = LeaderboardConfig::default();
        config.eligibility.min_minutes_exclusive = f64::INFINITY;
        assert!(matches!(LeaderboardEngine::new(config), Err(LeaderboardError::Config(_))));
    }
}

mod config_injection_tests {
    use super::*;

    #[test]
    fn test_injected_weights_change_the_apex() {
        // Rebounds worth 5: Jokic's 14 boards overtake Luka
        let mut config = LeaderboardConfig::default();
        config.scoring.rebounds = Decimal::from(5);
        let engine = LeaderboardEngine::new(config).unwrap();

        let board = engine.build_from_rows(slate()).unwrap();
        assert_eq!(board.apex().unwrap().player_name(), "Nikola Jokic");
    }

    #[test]
    fn test_band_sizes_from_config() {
        let mut config = LeaderboardConfig::default();
        config.tiers = TierConfig { elite_band_size: 3, shame_band_size: 2 };
        let engine = LeaderboardEngine::new(config).unwrap();

        let board = engine.build_from_rows(slate()).unwrap();
        assert_eq!(board.elite().len(), 3);
        assert_eq!(board.shame().len(), 2);
    }

    #[test]
    fn test_lower_minutes_threshold_admits_cameos() {
        let mut config = LeaderboardConfig::default();
        config.eligibility.min_minutes_exclusive = 5.0;
        let engine = LeaderboardEngine::new(config).unwrap();

        let board = engine.build_from_rows(slate()).unwrap();
        assert_eq!(board.ineligible, 0);
        assert_eq!(board.len(), 22);
    }
}

mod commentary_tests {
    use super::*;

    struct AlwaysDown;

    #[async_trait::async_trait]
    impl CommentaryProvider for AlwaysDown {
        async fn generate(&self, _request: &CommentaryRequest) -> Result<String, CommentaryError> {
            Err(CommentaryError::Provider("connection refused".to_string()))
        }
    }

    struct Hype;

    #[async_trait::async_trait]
    impl CommentaryProvider for Hype {
        async fn generate(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
            Ok(format!("{} [{}]", request.player_name, request.stat_summary))
        }
    }

    #[tokio::test]
    async fn test_failing_collaborator_leaves_leaderboard_intact() {
        init_tracing();
        let engine = LeaderboardEngine::default();
        let board = engine.build_from_rows(slate()).unwrap();
        let attacher = engine.commentary_attacher(Arc::new(AlwaysDown));

        let extremes = attacher.annotate_extremes(&board).await;

        let apex = extremes.apex.expect("apex annotated");
        assert_eq!(apex.entry.player_name(), "Luka Doncic");
        assert!(matches!(
            apex.commentary,
            Commentary::Unavailable(UnavailableReason::ProviderError(_))
        ));
        assert_eq!(extremes.shame.len(), board.shame().len());
        assert_eq!(board.len(), 20);
    }

    #[tokio::test]
    async fn test_commentary_follows_shame_display_order() {
        let engine = LeaderboardEngine::default();
        let board = engine.build_from_rows(slate()).unwrap();
        let attacher = engine.commentary_attacher(Arc::new(Hype));

        let extremes = attacher.annotate_extremes(&board).await;

        let annotated: Vec<&str> = extremes.shame.iter().map(|a| a.entry.player_id()).collect();
        let displayed: Vec<&str> = board.shame().iter().map(|e| e.player_id()).collect();
        assert_eq!(annotated, displayed);
        assert!(extremes.apex.unwrap().commentary.display_text().contains("Luka Doncic"));
    }
}
