//! 课程级别的数据权限与大纲缓存
//!
//! 角色中间件只判断“是不是教师”，这里判断“是不是这门课的教师/学生”。

use actix_web::HttpResponse;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{self, ObjectCache};
use crate::errors::Result;
use crate::models::assignments::Assignment;
use crate::models::courses::entities::{Course, CourseOutline};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 当前用户与课程的关系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseMembership {
    /// 管理员或课程创建者
    Manager,
    /// 已选课的学生
    Learner,
}

/// 管理员与课程创建者可以管理课程
pub fn can_manage_course(user: &User, course: &Course) -> bool {
    user.role.is_admin() || (user.role == UserRole::Teacher && course.created_by == user.id)
}

pub async fn course_membership(
    storage: &Arc<dyn Storage>,
    user: &User,
    course: &Course,
) -> Result<Option<CourseMembership>> {
    if can_manage_course(user, course) {
        return Ok(Some(CourseMembership::Manager));
    }
    if storage.is_enrolled(course.id, user.id).await? {
        return Ok(Some(CourseMembership::Learner));
    }
    Ok(None)
}

/// 查看课程内容：管理者或已选课学生
pub async fn ensure_course_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    course: &Course,
) -> std::result::Result<CourseMembership, HttpResponse> {
    match course_membership(storage, user, course).await {
        Ok(Some(membership)) => Ok(membership),
        Ok(None) => Err(not_enrolled()),
        Err(e) => Err(e.to_http_response()),
    }
}

/// 记录学习进度：必须已选课，管理员除外
pub async fn ensure_learner(
    storage: &Arc<dyn Storage>,
    user: &User,
    course: &Course,
) -> std::result::Result<(), HttpResponse> {
    if user.role.is_admin() {
        return Ok(());
    }
    match storage.is_enrolled(course.id, user.id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(not_enrolled()),
        Err(e) => Err(e.to_http_response()),
    }
}

pub fn ensure_course_manager(
    user: &User,
    course: &Course,
) -> std::result::Result<(), HttpResponse> {
    if can_manage_course(user, course) {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only the course teacher or an administrator can do this",
        )))
    }
}

fn not_enrolled() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::NotEnrolled,
        "You are not enrolled in this course",
    ))
}

pub async fn require_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> std::result::Result<Course, HttpResponse> {
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Err(e.to_http_response()),
    }
}

pub async fn require_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> std::result::Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => Ok(assignment),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Err(e.to_http_response()),
    }
}

/// 读取课程大纲，优先走缓存
pub async fn load_course_outline(
    storage: &Arc<dyn Storage>,
    cache: Option<&Arc<dyn ObjectCache>>,
    course_id: i64,
) -> Result<Option<CourseOutline>> {
    let key = cache::course_outline_key(course_id);
    if let Some(cache) = cache
        && let Some(outline) = cache::get_json::<CourseOutline>(cache.as_ref(), &key).await
    {
        return Ok(Some(outline));
    }

    let outline = storage.get_course_outline(course_id).await?;
    if let (Some(cache), Some(outline)) = (cache, &outline) {
        cache::insert_json(cache.as_ref(), key, outline, 0).await;
    }
    Ok(outline)
}

/// 目录变更后清除大纲缓存
pub async fn invalidate_course_outline(cache: Option<&Arc<dyn ObjectCache>>, course_id: i64) {
    if let Some(cache) = cache {
        debug!("Invalidating outline cache for course {}", course_id);
        cache.remove(&cache::course_outline_key(course_id)).await;
    }
}

/// 读取大纲，不存在时给出 404 响应
pub async fn require_course_outline(
    storage: &Arc<dyn Storage>,
    cache: Option<&Arc<dyn ObjectCache>>,
    course_id: i64,
) -> std::result::Result<CourseOutline, HttpResponse> {
    match load_course_outline(storage, cache, course_id).await {
        Ok(Some(outline)) => Ok(outline),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Err(e.to_http_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            organization_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn course(created_by: i64) -> Course {
        let now = chrono::Utc::now();
        Course {
            id: 1,
            organization_id: 1,
            name: "Rust".into(),
            description: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_manager_rules() {
        let course = course(10);
        assert!(can_manage_course(&user(10, UserRole::Teacher), &course));
        assert!(!can_manage_course(&user(11, UserRole::Teacher), &course));
        assert!(can_manage_course(&user(12, UserRole::Admin), &course));
        assert!(can_manage_course(&user(13, UserRole::Superadmin), &course));
        // 学生即使 id 碰巧等于创建者也不是管理者
        assert!(!can_manage_course(&user(10, UserRole::Student), &course));
    }
}
