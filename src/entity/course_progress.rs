//! 学习进度实体
//!
//! 每个 (user_id, course_id) 一行，完成集合存放在 progress_items 中。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 结合已完成条目组装业务进度
    pub fn into_progress(
        self,
        items: Vec<super::progress_items::Model>,
    ) -> crate::models::progress::CourseProgress {
        use crate::models::progress::{CourseProgress, ProgressKind};
        use std::collections::BTreeSet;

        let mut progress = CourseProgress {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            videos_watched: BTreeSet::new(),
            assignments_submitted: BTreeSet::new(),
            sections_completed: BTreeSet::new(),
            resources_completed: BTreeSet::new(),
            last_section_completed_at: None,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        };

        for item in items {
            match item.kind.parse::<ProgressKind>() {
                Ok(kind) => {
                    if kind == ProgressKind::Section {
                        let at = super::to_datetime(item.completed_at);
                        if progress.last_section_completed_at.is_none_or(|last| at > last) {
                            progress.last_section_completed_at = Some(at);
                        }
                    }
                    progress.set_mut(kind).insert(item.item_id);
                }
                Err(e) => tracing::warn!("忽略无法识别的进度条目 {}: {}", item.id, e),
            }
        }

        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::progress_items;
    use crate::entity::to_datetime;

    fn item(id: i64, kind: &str, item_id: i64, completed_at: i64) -> progress_items::Model {
        progress_items::Model {
            id,
            progress_id: 1,
            kind: kind.to_string(),
            section_id: 10,
            item_id,
            completed_at,
        }
    }

    #[test]
    fn test_last_section_time_ignores_later_items() {
        let row = Model {
            id: 1,
            user_id: 2,
            course_id: 3,
            created_at: 1_000,
            updated_at: 9_000,
        };
        let items = vec![
            item(1, "section", 10, 2_000),
            item(2, "section", 11, 3_000),
            item(3, "video", 100, 9_000),
            item(4, "assignment", 200, 8_500),
        ];

        let progress = row.into_progress(items);
        assert_eq!(progress.sections_completed.len(), 2);
        assert_eq!(progress.last_section_completed_at, Some(to_datetime(3_000)));
        assert_eq!(progress.updated_at, to_datetime(9_000));
    }

    #[test]
    fn test_no_sections_means_no_completion_time() {
        let row = Model {
            id: 1,
            user_id: 2,
            course_id: 3,
            created_at: 1_000,
            updated_at: 1_000,
        };
        let progress = row.into_progress(vec![item(1, "video", 100, 1_500)]);
        assert_eq!(progress.last_section_completed_at, None);
    }
}
