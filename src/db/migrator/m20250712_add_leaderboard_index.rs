use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_level_exp")
                    .table(Users)
                    .col(crate::entities::users::Column::Level)
                    .col(crate::entities::users::Column::Exp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_log_user_created")
                    .table(ActivityLog)
                    .col(crate::entities::activity_log::Column::UserId)
                    .col(crate::entities::activity_log::Column::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_users_level_exp").to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_activity_log_user_created")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
