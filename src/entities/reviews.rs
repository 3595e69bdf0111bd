use sea_orm::entity::prelude::*;

/// A user review, optionally targeting a vulnerability. At most one review
/// per (user, vulnerability) pair when a target is given.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub vulnerability_id: Option<i32>,

    /// 1..=5 inclusive.
    pub rating: i32,

    pub comment: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::vulnerabilities::Entity",
        from = "Column::VulnerabilityId",
        to = "super::vulnerabilities::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Vulnerability,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
