use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Default API key (regenerate after first login)
const DEFAULT_API_KEY: &str = "vulnquest_default_api_key_please_regenerate";

/// Hash the default password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Users)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Vulnerabilities)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Reports)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Quests)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserQuests)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Achievements)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(UserAchievements)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ActivityLog)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One report per (user, vulnerability); one clear per (user, quest);
        // one unlock per (user, achievement).
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reports_user_vulnerability")
                    .table(Reports)
                    .col(crate::entities::reports::Column::UserId)
                    .col(crate::entities::reports::Column::VulnerabilityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_quests_user_quest")
                    .table(UserQuests)
                    .col(crate::entities::user_quests::Column::UserId)
                    .col(crate::entities::user_quests::Column::QuestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_achievements_user_achievement")
                    .table(UserAchievements)
                    .col(crate::entities::user_achievements::Column::UserId)
                    .col(crate::entities::user_achievements::Column::AchievementId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        seed_admin_user(manager).await?;
        seed_quests(manager).await?;
        seed_achievements(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserAchievements).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Achievements).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserQuests).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quests).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reports).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vulnerabilities).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}

async fn seed_admin_user(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    use crate::entities::users::Column;

    let now = chrono::Utc::now().to_rfc3339();
    let password_hash = hash_default_password();

    let insert = sea_orm_migration::sea_query::Query::insert()
        .into_table(Users)
        .columns([
            Column::Username,
            Column::Email,
            Column::PasswordHash,
            Column::ApiKey,
            Column::Level,
            Column::Exp,
            Column::Title,
            Column::Reputation,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .values_panic([
            "admin".into(),
            "admin@vulnquest.local".into(),
            password_hash.into(),
            DEFAULT_API_KEY.into(),
            1.into(),
            0.into(),
            "Novice Hunter".into(),
            0.into(),
            now.clone().into(),
            now.into(),
        ])
        .to_owned();

    manager.exec_stmt(insert).await?;

    Ok(())
}

async fn seed_quests(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    use crate::entities::quests::Column;

    let quests: &[(&str, i32, &str, i32, i32)] = &[
        ("SQL Injection Slime", 1, "easy", 100, 150),
        ("XSS Phantom", 2, "easy", 150, 200),
        ("CSRF Goblin", 3, "medium", 250, 320),
        ("Buffer Overflow Ogre", 4, "medium", 350, 450),
        ("Race Condition Wraith", 5, "hard", 500, 650),
        ("Privilege Escalation Dragon", 6, "hard", 700, 850),
        ("Zero-Day Leviathan", 7, "nightmare", 1000, 1200),
    ];

    for (boss_name, floor, difficulty, exp_reward, health_points) in quests {
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Quests)
            .columns([
                Column::BossName,
                Column::FloorNumber,
                Column::Difficulty,
                Column::ExpReward,
                Column::HealthPoints,
                Column::Active,
            ])
            .values_panic([
                (*boss_name).into(),
                (*floor).into(),
                (*difficulty).into(),
                (*exp_reward).into(),
                (*health_points).into(),
                true.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;
    }

    Ok(())
}

async fn seed_achievements(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    use crate::entities::achievements::Column;

    let achievements: &[(&str, &str, i32, &str, i32)] = &[
        (
            "First Blood",
            "Report your first vulnerability",
            50,
            "vulnerabilities_reported",
            1,
        ),
        (
            "Bug Magnet",
            "Report 10 vulnerabilities",
            300,
            "vulnerabilities_reported",
            10,
        ),
        (
            "Eagle Eye",
            "Report 50 vulnerabilities",
            1500,
            "vulnerabilities_reported",
            50,
        ),
        (
            "Fixer",
            "Resolve your first vulnerability",
            100,
            "vulnerabilities_resolved",
            1,
        ),
        (
            "Patch Master",
            "Resolve 25 vulnerabilities",
            1000,
            "vulnerabilities_resolved",
            25,
        ),
        (
            "Tower Climber",
            "Complete your first quest",
            100,
            "quests_completed",
            1,
        ),
        (
            "Floor Sweeper",
            "Complete 5 quests",
            500,
            "quests_completed",
            5,
        ),
        ("Rising Star", "Reach level 5", 250, "level_reached", 5),
        ("Veteran", "Reach level 10", 750, "level_reached", 10),
        ("Critic", "Post your first review", 50, "reviews_given", 1),
        ("Voice of the People", "Post 20 reviews", 600, "reviews_given", 20),
    ];

    for (name, description, exp_reward, requirement_type, requirement_value) in achievements {
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Achievements)
            .columns([
                Column::Name,
                Column::Description,
                Column::ExpReward,
                Column::RequirementType,
                Column::RequirementValue,
            ])
            .values_panic([
                (*name).into(),
                (*description).into(),
                (*exp_reward).into(),
                (*requirement_type).into(),
                (*requirement_value).into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;
    }

    Ok(())
}
