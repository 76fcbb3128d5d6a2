use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Entity as Assignments};
use crate::entity::progress_items::{Column as ItemColumn, Entity as ProgressItems};
use crate::entity::sections::Entity as Sections;
use crate::errors::{LearnHubError, Result};
use crate::models::assignments::{Assignment, CreateAssignmentRequest};
use crate::models::progress::ProgressKind;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 在章节下创建作业
    ///
    /// 章节的作业列表决定了完成判定，已有学生完成该章节后不再允许追加作业。
    pub async fn create_assignment_impl(
        &self,
        section_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("开启事务失败: {e}")))?;

        let section = Sections::find_by_id(section_id)
            .one(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询章节失败: {e}")))?
            .ok_or_else(|| LearnHubError::not_found("Section not found"))?;

        let completed = ProgressItems::find()
            .filter(ItemColumn::Kind.eq(ProgressKind::Section.as_str()))
            .filter(ItemColumn::ItemId.eq(section_id))
            .count(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询章节完成情况失败: {e}")))?;
        if completed > 0 {
            return Err(LearnHubError::conflict(
                "Section has already been completed by students; its assignments are fixed",
            ));
        }

        let links = serde_json::to_string(&req.assignment_links)?;

        let model = ActiveModel {
            section_id: Set(section_id),
            course_id: Set(section.course_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            links: Set(Some(links)),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("创建作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }
}
