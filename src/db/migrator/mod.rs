use sea_orm_migration::prelude::*;

mod m20250601_initial;
mod m20250623_add_reviews;
mod m20250712_add_leaderboard_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_initial::Migration),
            Box::new(m20250623_add_reviews::Migration),
            Box::new(m20250712_add_leaderboard_index::Migration),
        ]
    }
}
