//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub submitted_at: i64,
    #[sea_orm(column_type = "Double", nullable)]
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_comment: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(
        self,
        files: Vec<super::submission_files::Model>,
    ) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionReview};

        // 四个批阅字段同时存在才视为已批阅
        let review = match (
            self.grade,
            self.review_comment,
            self.reviewed_by,
            self.reviewed_at,
        ) {
            (Some(grade), Some(comment), Some(reviewed_by), Some(reviewed_at)) => {
                Some(SubmissionReview {
                    grade,
                    comment,
                    reviewed_by,
                    reviewed_at: super::to_datetime(reviewed_at),
                })
            }
            _ => None,
        };

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            files: files.into_iter().map(|f| f.into_submission_file()).collect(),
            submitted_at: super::to_datetime(self.submitted_at),
            review,
        }
    }
}
