use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub description: String,

    /// Experience granted when unlocked.
    pub exp_reward: i32,

    /// vulnerabilities_reported | vulnerabilities_resolved | quests_completed
    /// | level_reached | reviews_given
    pub requirement_type: String,

    pub requirement_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
