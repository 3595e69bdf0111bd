use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Reviews)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // One review per (user, vulnerability) when a target is given;
        // SQLite treats NULLs as distinct so untargeted reviews stay free.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reviews_user_vulnerability")
                    .table(Reviews)
                    .col(crate::entities::reviews::Column::UserId)
                    .col(crate::entities::reviews::Column::VulnerabilityId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews).to_owned())
            .await?;

        Ok(())
    }
}
