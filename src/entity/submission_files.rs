//! 提交文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission_file(self) -> crate::models::submissions::entities::SubmissionFile {
        crate::models::submissions::entities::SubmissionFile {
            id: self.id,
            stored_name: self.stored_name,
            original_name: self.original_name,
            mime_type: self.mime_type,
            file_size: self.file_size,
            uploaded_at: super::to_datetime(self.uploaded_at),
        }
    }
}
