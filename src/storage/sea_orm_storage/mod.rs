//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod enrollments;
mod organizations;
mod progress;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LearnHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::from_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 基于已有连接创建存储实例并运行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LearnHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LearnHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LearnHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LearnHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{Assignment, CreateAssignmentRequest},
    courses::{
        entities::{Course, CourseOutline, Enrollment, Section},
        requests::{CourseListParams, CreateCourseRequest, CreateSectionRequest},
        responses::CourseListResponse,
    },
    organizations::{CreateOrganizationRequest, Organization},
    progress::{CourseProgress, ProgressKind},
    submissions::{
        entities::{NewSubmissionFile, Submission},
        responses::SubmissionListItem,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 机构模块
    async fn create_organization(&self, req: CreateOrganizationRequest) -> Result<Organization> {
        self.create_organization_impl(req).await
    }

    async fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>> {
        self.get_organization_by_id_impl(id).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.list_organizations_impl().await
    }

    // 课程模块
    async fn create_course(&self, req: CreateCourseRequest, created_by: i64) -> Result<Course> {
        self.create_course_impl(req, created_by).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
        enrolled_user: Option<i64>,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query, enrolled_user)
            .await
    }

    async fn get_course_outline(&self, course_id: i64) -> Result<Option<CourseOutline>> {
        self.get_course_outline_impl(course_id).await
    }

    async fn create_section(&self, course_id: i64, req: CreateSectionRequest) -> Result<Section> {
        self.create_section_impl(course_id, req).await
    }

    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<Section>> {
        self.get_section_by_id_impl(section_id).await
    }

    // 选课模块
    async fn enroll_student(&self, course_id: i64, user_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(course_id, user_id).await
    }

    async fn is_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.is_enrolled_impl(course_id, user_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        section_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(section_id, req, created_by)
            .await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    // 学习进度模块
    async fn initialize_progress(&self, user_id: i64, course_id: i64) -> Result<CourseProgress> {
        self.initialize_progress_impl(user_id, course_id).await
    }

    async fn get_progress(&self, user_id: i64, course_id: i64) -> Result<Option<CourseProgress>> {
        self.get_progress_impl(user_id, course_id).await
    }

    async fn get_or_create_progress(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<CourseProgress> {
        self.get_or_create_progress_impl(user_id, course_id).await
    }

    async fn mark_progress_item(
        &self,
        user_id: i64,
        course_id: i64,
        kind: ProgressKind,
        section_id: i64,
        item_id: i64,
    ) -> Result<CourseProgress> {
        self.mark_progress_item_impl(user_id, course_id, kind, section_id, item_id)
            .await
    }

    async fn mark_assignment_complete(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
        assignment_id: i64,
    ) -> Result<CourseProgress> {
        self.mark_assignment_complete_impl(user_id, course_id, section_id, assignment_id)
            .await
    }

    async fn mark_section_complete(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
    ) -> Result<CourseProgress> {
        self.mark_section_complete_impl(user_id, course_id, section_id)
            .await
    }

    // 作业提交模块
    async fn create_submission(
        &self,
        assignment: &Assignment,
        student_id: i64,
        files: Vec<NewSubmissionFile>,
        allow_resubmit: bool,
    ) -> Result<(Submission, Vec<String>)> {
        self.create_submission_impl(assignment, student_id, files, allow_resubmit)
            .await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_user_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_user_submission_impl(assignment_id, student_id)
            .await
    }

    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>> {
        self.list_assignment_submissions_impl(assignment_id).await
    }

    async fn review_submission(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        grade: f64,
        comment: String,
    ) -> Result<Submission> {
        self.review_submission_impl(submission_id, reviewer_id, grade, comment)
            .await
    }
}

/// 唯一约束冲突判断
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
