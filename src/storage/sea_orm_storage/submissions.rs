//! 提交存储操作

use std::collections::HashMap;

use super::progress::{get_or_create_progress_row, insert_progress_item};
use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::submission_files::{
    ActiveModel as SubmissionFileActiveModel, Column as SubmissionFileColumn,
    Entity as SubmissionFiles, Model as SubmissionFileModel,
};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LearnHubError, Result};
use crate::models::assignments::Assignment;
use crate::models::progress::ProgressKind;
use crate::models::submissions::{
    entities::{NewSubmissionFile, Submission},
    responses::{SubmissionListItem, SubmissionStudent},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建提交
    ///
    /// 在同一事务内写入提交与文件记录，并把作业计入学习进度。
    /// 允许重新提交时，未批阅的提交会被替换，返回被替换文件的存储名供调用方清理。
    pub async fn create_submission_impl(
        &self,
        assignment: &Assignment,
        student_id: i64,
        files: Vec<NewSubmissionFile>,
        allow_resubmit: bool,
    ) -> Result<(Submission, Vec<String>)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment.id))
            .filter(Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交失败: {e}")))?;

        let mut replaced = Vec::new();
        let submission = match existing {
            Some(existing) => {
                if !allow_resubmit {
                    return Err(LearnHubError::conflict("Assignment already submitted"));
                }
                // 条件更新，与并发批阅互斥
                let submission = touch_unreviewed_submission(&txn, existing, now).await?;

                let old_files = SubmissionFiles::find()
                    .filter(SubmissionFileColumn::SubmissionId.eq(submission.id))
                    .all(&txn)
                    .await
                    .map_err(|e| {
                        LearnHubError::database_operation(format!("查询提交文件失败: {e}"))
                    })?;
                replaced = old_files.into_iter().map(|f| f.stored_name).collect();

                SubmissionFiles::delete_many()
                    .filter(SubmissionFileColumn::SubmissionId.eq(submission.id))
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        LearnHubError::database_operation(format!("删除提交文件失败: {e}"))
                    })?;

                submission
            }
            None => ActiveModel {
                assignment_id: Set(assignment.id),
                student_id: Set(student_id),
                submitted_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LearnHubError::conflict("Assignment already submitted")
                } else {
                    LearnHubError::database_operation(format!("创建提交失败: {e}"))
                }
            })?,
        };

        if !files.is_empty() {
            let file_models = files.into_iter().map(|f| SubmissionFileActiveModel {
                submission_id: Set(submission.id),
                stored_name: Set(f.stored_name),
                original_name: Set(f.original_name),
                mime_type: Set(f.mime_type),
                file_size: Set(f.file_size),
                uploaded_at: Set(now),
                ..Default::default()
            });
            SubmissionFiles::insert_many(file_models)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| LearnHubError::database_operation(format!("保存提交文件失败: {e}")))?;
        }

        // 提交即完成作业
        let progress = get_or_create_progress_row(&txn, student_id, assignment.course_id).await?;
        insert_progress_item(
            &txn,
            progress.id,
            ProgressKind::Assignment,
            assignment.section_id,
            assignment.id,
        )
        .await?;

        let submission = with_files(&txn, submission).await?;

        txn.commit()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((submission, replaced))
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(with_files(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 获取学生在某作业下的提交
    pub async fn get_user_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(with_files(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 列出作业的全部提交，附带提交者信息
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>> {
        let submissions = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        // 批量查询文件与用户信息
        let submission_ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        let mut files: HashMap<i64, Vec<SubmissionFileModel>> = HashMap::new();
        for file in SubmissionFiles::find()
            .filter(SubmissionFileColumn::SubmissionId.is_in(submission_ids))
            .order_by_asc(SubmissionFileColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交文件失败: {e}")))?
        {
            files.entry(file.submission_id).or_default().push(file);
        }

        let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
        let users: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询用户失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|model| {
                let student = match users.get(&model.student_id) {
                    Some(user) => SubmissionStudent {
                        id: user.id,
                        username: user.username.clone(),
                        display_name: user.display_name.clone(),
                    },
                    None => SubmissionStudent {
                        id: model.student_id,
                        username: String::new(),
                        display_name: None,
                    },
                };
                let submission_files = files.remove(&model.id).unwrap_or_default();
                SubmissionListItem {
                    submission: model.into_submission(submission_files).into(),
                    student,
                }
            })
            .collect())
    }

    /// 批阅提交，新批阅覆盖旧批阅
    pub async fn review_submission_impl(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        grade: f64,
        comment: String,
    ) -> Result<Submission> {
        let existing = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| LearnHubError::not_found("Submission not found"))?;

        let mut model = existing.into_active_model();
        model.grade = Set(Some(grade));
        model.review_comment = Set(Some(comment));
        model.reviewed_by = Set(Some(reviewer_id));
        model.reviewed_at = Set(Some(chrono::Utc::now().timestamp()));

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("批阅提交失败: {e}")))?;

        with_files(&self.db, updated).await
    }
}

/// 仅当提交尚未批阅时刷新提交时间
///
/// 批阅与重新提交竞争同一行，影响行数为 0 表示提交已被批阅。
pub(super) async fn touch_unreviewed_submission<C: ConnectionTrait>(
    conn: &C,
    existing: Model,
    now: i64,
) -> Result<Model> {
    let result = Submissions::update_many()
        .col_expr(Column::SubmittedAt, Expr::value(now))
        .filter(Column::Id.eq(existing.id))
        .filter(Column::ReviewedAt.is_null())
        .exec(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("更新提交失败: {e}")))?;

    if result.rows_affected == 0 {
        return Err(LearnHubError::conflict(
            "Submission has already been reviewed",
        ));
    }

    Ok(Model {
        submitted_at: now,
        ..existing
    })
}

async fn with_files<C: ConnectionTrait>(conn: &C, model: Model) -> Result<Submission> {
    let files = SubmissionFiles::find()
        .filter(SubmissionFileColumn::SubmissionId.eq(model.id))
        .order_by_asc(SubmissionFileColumn::Id)
        .all(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询提交文件失败: {e}")))?;

    Ok(model.into_submission(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::CreateAssignmentRequest;
    use crate::models::courses::requests::{CreateCourseRequest, CreateSectionRequest};
    use crate::models::organizations::CreateOrganizationRequest;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::Storage;
    use sea_orm::{ConnectOptions, Database};

    async fn storage() -> SeaOrmStorage {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        SeaOrmStorage::from_connection(db).await.unwrap()
    }

    async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> i64 {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hash".to_string(),
                role,
                display_name: None,
                organization_id: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn assignment(storage: &SeaOrmStorage, teacher_id: i64) -> Assignment {
        let organization = storage
            .create_organization(CreateOrganizationRequest {
                name: "Org".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let course = storage
            .create_course(
                CreateCourseRequest {
                    organization_id: organization.id,
                    name: "Course".to_string(),
                    description: None,
                },
                teacher_id,
            )
            .await
            .unwrap();
        let section = storage
            .create_section(
                course.id,
                CreateSectionRequest {
                    name: "Week 1".to_string(),
                    description: None,
                    position: None,
                    videos: Vec::new(),
                    resources: Vec::new(),
                },
            )
            .await
            .unwrap();
        storage
            .create_assignment(
                section.id,
                CreateAssignmentRequest {
                    title: "Lab".to_string(),
                    description: None,
                    due_date: None,
                    assignment_links: Vec::new(),
                },
                teacher_id,
            )
            .await
            .unwrap()
    }

    /// 读到未批阅的快照之后提交才被批阅，刷新必须失败
    #[tokio::test]
    async fn test_touch_rejects_submission_reviewed_after_read() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher", UserRole::Teacher).await;
        let student = user(&storage, "student", UserRole::Student).await;
        let assignment = assignment(&storage, teacher).await;

        let (submission, _) = storage
            .create_submission_impl(&assignment, student, Vec::new(), true)
            .await
            .unwrap();
        let stale = Submissions::find_by_id(submission.id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert!(stale.reviewed_at.is_none());

        storage
            .review_submission(submission.id, teacher, 80.0, "ok".to_string())
            .await
            .unwrap();

        let result = touch_unreviewed_submission(&storage.db, stale, 42).await;
        assert!(matches!(result, Err(LearnHubError::Conflict(_))));

        let row = Submissions::find_by_id(submission.id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(row.submitted_at, 42);
    }

    #[tokio::test]
    async fn test_touch_refreshes_unreviewed_submission() {
        let storage = storage().await;
        let teacher = user(&storage, "teacher", UserRole::Teacher).await;
        let student = user(&storage, "student", UserRole::Student).await;
        let assignment = assignment(&storage, teacher).await;

        let (submission, _) = storage
            .create_submission_impl(&assignment, student, Vec::new(), true)
            .await
            .unwrap();
        let existing = Submissions::find_by_id(submission.id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();

        let touched = touch_unreviewed_submission(&storage.db, existing, 42)
            .await
            .unwrap();
        assert_eq!(touched.submitted_at, 42);
    }
}
