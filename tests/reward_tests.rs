//! Integration tests for the reward cascade over an in-memory store.

use vulnquest::config::Config;
use vulnquest::models::MetricType;
use vulnquest::state::SharedState;

/// Seeded admin user from the initial migration.
const ADMIN_ID: i32 = 1;

async fn spawn_state() -> SharedState {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    SharedState::new(config)
        .await
        .expect("Failed to create shared state")
}

#[tokio::test]
async fn test_grant_experience_levels_up() {
    let state = spawn_state().await;

    let outcome = state
        .reward_service
        .grant_experience(ADMIN_ID, 2500, "test grant")
        .await
        .unwrap();

    // 1 -> 2 costs 1000; 2 -> 3 costs 2000, so 2500 lands at level 2
    // with 1500 left over.
    assert_eq!(outcome.level, 2);
    assert_eq!(outcome.exp, 1500);
    assert!(outcome.leveled_up);
    assert_eq!(outcome.levels_gained, 1);

    let user = state.store.get_user_by_id(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(user.level, 2);
    assert_eq!(user.exp, 1500);
}

#[tokio::test]
async fn test_grant_experience_rejects_negative() {
    let state = spawn_state().await;

    let result = state
        .reward_service
        .grant_experience(ADMIN_ID, -10, "bad grant")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_achievement_unlock_is_idempotent() {
    let state = spawn_state().await;

    let first = state
        .reward_service
        .evaluate_achievements(ADMIN_ID, MetricType::QuestsCompleted, 5)
        .await
        .unwrap();

    // "Tower Climber" (1) and "Floor Sweeper" (5) both qualify.
    let names: Vec<&str> = first.iter().map(|a| a.name.as_str()).collect();
    assert!(names.contains(&"Tower Climber"));
    assert!(names.contains(&"Floor Sweeper"));

    let second = state
        .reward_service
        .evaluate_achievements(ADMIN_ID, MetricType::QuestsCompleted, 5)
        .await
        .unwrap();

    assert!(second.is_empty());

    // A smaller value is also a no-op.
    let third = state
        .reward_service
        .evaluate_achievements(ADMIN_ID, MetricType::QuestsCompleted, 1)
        .await
        .unwrap();

    assert!(third.is_empty());
}

#[tokio::test]
async fn test_achievement_rewards_cascade_into_level_up() {
    let state = spawn_state().await;

    // Park the admin at 800 exp, just under the level-2 threshold.
    state
        .reward_service
        .grant_experience(ADMIN_ID, 800, "setup")
        .await
        .unwrap();

    // Quest achievements grant 100 + 500 exp: 800 + 600 = 1400, which
    // crosses the 1000 threshold into level 2 with 400 left.
    let unlocked = state
        .reward_service
        .evaluate_achievements(ADMIN_ID, MetricType::QuestsCompleted, 5)
        .await
        .unwrap();

    assert_eq!(unlocked.len(), 2);

    let user = state.store.get_user_by_id(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(user.level, 2);
    assert_eq!(user.exp, 400);
}

#[tokio::test]
async fn test_level_reached_achievements_unlock_on_level_up() {
    let state = spawn_state().await;

    // Enough to clear levels 1-4 (1000 + 2000 + 3000 + 4000 = 10000):
    // level 5 triggers "Rising Star" (250 exp) through the cascade.
    let outcome = state
        .reward_service
        .grant_experience(ADMIN_ID, 10_000, "big grant")
        .await
        .unwrap();

    assert!(outcome.level >= 5);
    assert!(outcome.unlocked.iter().any(|a| a.name == "Rising Star"));

    let user = state.store.get_user_by_id(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(user.exp, 250);
    assert_eq!(user.title, "Bug Tracker");
}

#[tokio::test]
async fn test_guarded_update_detects_stale_read() {
    let state = spawn_state().await;

    // Stale expected values must not write.
    let updated = state
        .store
        .update_experience_guarded(ADMIN_ID, 7, 999, 8, 0)
        .await
        .unwrap();
    assert!(!updated);

    // Matching expected values do.
    let updated = state
        .store
        .update_experience_guarded(ADMIN_ID, 1, 0, 1, 42)
        .await
        .unwrap();
    assert!(updated);

    let user = state.store.get_user_by_id(ADMIN_ID).await.unwrap().unwrap();
    assert_eq!(user.exp, 42);
}

#[tokio::test]
async fn test_quest_completion_row_is_unique() {
    let state = spawn_state().await;

    let first = state
        .store
        .insert_quest_completion(ADMIN_ID, 1, 150)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = state
        .store
        .insert_quest_completion(ADMIN_ID, 1, 99)
        .await
        .unwrap();
    assert!(second.is_none());

    // The service refuses a cleared quest before simulating anything.
    let err = state
        .quest_service
        .attempt(ADMIN_ID, 1, vulnquest::game::BattleAction::Attack)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        vulnquest::services::QuestError::AlreadyCompleted
    ));
}

#[tokio::test]
async fn test_review_pair_is_unique() {
    let state = spawn_state().await;

    let vuln = state
        .store
        .create_vulnerability(
            "Weak session tokens",
            "Tokens are sequential integers.",
            vulnquest::models::Severity::Medium,
            100,
            ADMIN_ID,
        )
        .await
        .unwrap();

    let first = state
        .store
        .insert_review(ADMIN_ID, Some(vuln.id), 5, None)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = state
        .store
        .insert_review(ADMIN_ID, Some(vuln.id), 3, None)
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn test_progress_is_clamped_to_100() {
    let state = spawn_state().await;

    state
        .reward_service
        .evaluate_achievements(ADMIN_ID, MetricType::QuestsCompleted, 50)
        .await
        .unwrap();

    let progress = state
        .reward_service
        .achievement_progress(ADMIN_ID)
        .await
        .unwrap();

    for entry in &progress {
        assert!(entry.progress <= 100);
        assert!(entry.progress >= 0);
    }

    let tower = progress
        .iter()
        .find(|p| p.name == "Tower Climber")
        .unwrap();
    assert!(tower.unlocked);
}
