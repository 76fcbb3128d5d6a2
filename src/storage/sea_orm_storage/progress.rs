//! 学习进度存储操作
//!
//! 完成集合以 progress_items 行存放，(progress_id, kind, item_id) 唯一，
//! 插入采用 ON CONFLICT DO NOTHING，并发写入互不覆盖。

use std::collections::BTreeSet;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::course_progress::{
    ActiveModel, Column, Entity as CourseProgressEntity, Model as ProgressModel,
};
use crate::entity::progress_items::{
    ActiveModel as ItemActiveModel, Column as ItemColumn, Entity as ProgressItems,
};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LearnHubError, Result};
use crate::models::progress::{CourseProgress, ProgressKind, can_complete_section};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 初始化进度，已存在时返回 AlreadyExists
    pub async fn initialize_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<CourseProgress> {
        if find_progress_row(&self.db, user_id, course_id)
            .await?
            .is_some()
        {
            return Err(already_initialized());
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // 检查与插入之间被并发创建时同样按已存在处理
        let row = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                already_initialized()
            } else {
                LearnHubError::database_operation(format!("创建学习进度失败: {e}"))
            }
        })?;

        Ok(row.into_progress(Vec::new()))
    }

    /// 获取进度
    pub async fn get_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseProgress>> {
        match find_progress_row(&self.db, user_id, course_id).await? {
            Some(row) => Ok(Some(load_progress(&self.db, row).await?)),
            None => Ok(None),
        }
    }

    /// 获取或创建进度
    pub async fn get_or_create_progress_impl(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<CourseProgress> {
        let row = get_or_create_progress_row(&self.db, user_id, course_id).await?;
        load_progress(&self.db, row).await
    }

    /// 记录完成条目
    pub async fn mark_progress_item_impl(
        &self,
        user_id: i64,
        course_id: i64,
        kind: ProgressKind,
        section_id: i64,
        item_id: i64,
    ) -> Result<CourseProgress> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("开启事务失败: {e}")))?;

        let row = get_or_create_progress_row(&txn, user_id, course_id).await?;
        insert_progress_item(&txn, row.id, kind, section_id, item_id).await?;
        let progress = load_progress(&txn, row).await?;

        txn.commit()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(progress)
    }

    /// 标记作业完成，完成状态来源于提交记录
    pub async fn mark_assignment_complete_impl(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
        assignment_id: i64,
    ) -> Result<CourseProgress> {
        let submitted = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .filter(SubmissionColumn::StudentId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交失败: {e}")))?;

        if submitted == 0 {
            return Err(LearnHubError::precondition_failed(
                "assignment has not been submitted",
            ));
        }

        self.mark_progress_item_impl(
            user_id,
            course_id,
            ProgressKind::Assignment,
            section_id,
            assignment_id,
        )
        .await
    }

    /// 标记章节完成
    ///
    /// 总是以数据库中已记录的作业提交重新判定，不信任客户端的判断。
    pub async fn mark_section_complete_impl(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
    ) -> Result<CourseProgress> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("开启事务失败: {e}")))?;

        let row = get_or_create_progress_row(&txn, user_id, course_id).await?;

        let section_assignments: Vec<i64> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::SectionId.eq(section_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询章节作业失败: {e}")))?;

        let submitted: BTreeSet<i64> = ProgressItems::find()
            .select_only()
            .column(ItemColumn::ItemId)
            .filter(ItemColumn::ProgressId.eq(row.id))
            .filter(ItemColumn::Kind.eq(ProgressKind::Assignment.as_str()))
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询作业完成情况失败: {e}")))?
            .into_iter()
            .collect();

        if !can_complete_section(&section_assignments, &submitted) {
            return Err(LearnHubError::precondition_failed(
                "All assignments must be completed first",
            ));
        }

        insert_progress_item(&txn, row.id, ProgressKind::Section, section_id, section_id).await?;
        let progress = load_progress(&txn, row).await?;

        txn.commit()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(progress)
    }
}

fn already_initialized() -> LearnHubError {
    LearnHubError::already_exists("Progress already initialized for this course")
}

async fn find_progress_row<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    course_id: i64,
) -> Result<Option<ProgressModel>> {
    CourseProgressEntity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::CourseId.eq(course_id))
        .one(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询学习进度失败: {e}")))
}

/// 插入（冲突忽略）后再读取，两个并发请求得到同一行
pub(super) async fn get_or_create_progress_row<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    course_id: i64,
) -> Result<ProgressModel> {
    if let Some(row) = find_progress_row(conn, user_id, course_id).await? {
        return Ok(row);
    }

    let now = chrono::Utc::now().timestamp();
    CourseProgressEntity::insert(ActiveModel {
        user_id: Set(user_id),
        course_id: Set(course_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([Column::UserId, Column::CourseId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(|e| LearnHubError::database_operation(format!("创建学习进度失败: {e}")))?;

    find_progress_row(conn, user_id, course_id)
        .await?
        .ok_or_else(|| LearnHubError::database_operation("创建学习进度后读取失败"))
}

/// 记录完成条目，返回是否新增；新增时刷新 updated_at
pub(super) async fn insert_progress_item<C: ConnectionTrait>(
    conn: &C,
    progress_id: i64,
    kind: ProgressKind,
    section_id: i64,
    item_id: i64,
) -> Result<bool> {
    let now = chrono::Utc::now().timestamp();

    let inserted = ProgressItems::insert(ItemActiveModel {
        progress_id: Set(progress_id),
        kind: Set(kind.as_str().to_string()),
        section_id: Set(section_id),
        item_id: Set(item_id),
        completed_at: Set(now),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([ItemColumn::ProgressId, ItemColumn::Kind, ItemColumn::ItemId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(|e| LearnHubError::database_operation(format!("记录学习进度失败: {e}")))?;

    if inserted > 0 {
        CourseProgressEntity::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(progress_id))
            .exec(conn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("更新学习进度失败: {e}")))?;
    }

    Ok(inserted > 0)
}

async fn load_progress<C: ConnectionTrait>(conn: &C, row: ProgressModel) -> Result<CourseProgress> {
    let items = ProgressItems::find()
        .filter(ItemColumn::ProgressId.eq(row.id))
        .order_by_asc(ItemColumn::Id)
        .all(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询进度条目失败: {e}")))?;

    // updated_at 可能已在本事务中刷新
    let row = CourseProgressEntity::find_by_id(row.id)
        .one(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询学习进度失败: {e}")))?
        .unwrap_or(row);

    Ok(row.into_progress(items))
}
