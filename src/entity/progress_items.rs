//! 进度条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "progress_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub progress_id: i64,
    /// video / assignment / section / resources
    pub kind: String,
    pub section_id: i64,
    pub item_id: i64,
    pub completed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_progress::Entity",
        from = "Column::ProgressId",
        to = "super::course_progress::Column::Id"
    )]
    Progress,
}

impl Related<super::course_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
