use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，password 字段需为已哈希的值
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 机构管理方法
    async fn create_organization(&self, req: CreateOrganizationRequest) -> Result<Organization>;
    async fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>>;
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// 课程目录方法
    // 创建课程
    async fn create_course(&self, req: CreateCourseRequest, created_by: i64) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出课程，enrolled_user 为 Some 时只返回该用户已选的课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
        enrolled_user: Option<i64>,
    ) -> Result<CourseListResponse>;
    // 获取课程大纲（章节、视频、资料、作业 id）
    async fn get_course_outline(&self, course_id: i64) -> Result<Option<CourseOutline>>;
    // 创建章节及其视频与资料
    async fn create_section(&self, course_id: i64, req: CreateSectionRequest) -> Result<Section>;
    // 通过ID获取章节
    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<Section>>;

    /// 选课方法
    async fn enroll_student(&self, course_id: i64, user_id: i64) -> Result<Enrollment>;
    async fn is_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool>;

    /// 作业方法
    // 在章节下创建作业；已有学生完成该章节时返回 Conflict
    async fn create_assignment(
        &self,
        section_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    /// 学习进度方法
    // 初始化进度，已存在时返回 AlreadyExists
    async fn initialize_progress(&self, user_id: i64, course_id: i64) -> Result<CourseProgress>;
    // 获取进度
    async fn get_progress(&self, user_id: i64, course_id: i64) -> Result<Option<CourseProgress>>;
    // 获取或创建进度（幂等）
    async fn get_or_create_progress(&self, user_id: i64, course_id: i64)
    -> Result<CourseProgress>;
    // 记录一个完成条目（幂等），返回最新进度
    async fn mark_progress_item(
        &self,
        user_id: i64,
        course_id: i64,
        kind: ProgressKind,
        section_id: i64,
        item_id: i64,
    ) -> Result<CourseProgress>;
    // 标记作业完成，需要该用户已有提交
    async fn mark_assignment_complete(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
        assignment_id: i64,
    ) -> Result<CourseProgress>;
    // 标记章节完成，章节作业未全部提交时返回 PreconditionFailed
    async fn mark_section_complete(
        &self,
        user_id: i64,
        course_id: i64,
        section_id: i64,
    ) -> Result<CourseProgress>;

    /// 作业提交方法
    // 创建提交并记录作业完成；返回提交以及被替换掉的旧文件名
    async fn create_submission(
        &self,
        assignment: &Assignment,
        student_id: i64,
        files: Vec<NewSubmissionFile>,
        allow_resubmit: bool,
    ) -> Result<(Submission, Vec<String>)>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取学生在某作业下的提交
    async fn get_user_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    // 列出作业的全部提交及提交者
    async fn list_assignment_submissions(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionListItem>>;
    // 批阅提交，覆盖已有批阅
    async fn review_submission(
        &self,
        submission_id: i64,
        reviewer_id: i64,
        grade: f64,
        comment: String,
    ) -> Result<Submission>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
