use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::errors::LearnHubError;
use crate::models::courses::requests::EnrollStudentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_course_manager, require_course};
use crate::services::current_user;

pub async fn enroll_student(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    req: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let course = match require_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_course_manager(&user, &course) {
        return Ok(resp);
    }

    match storage.get_user_by_id(req.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ValidationFailed,
                "Only students can be enrolled",
            )));
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => return Ok(e.to_http_response()),
    }

    match storage.enroll_student(course_id, req.student_id).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in course {} by {}",
                req.student_id, course_id, user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(enrollment, "Student enrolled successfully")))
        }
        Err(e @ LearnHubError::AlreadyExists(_)) => {
            Ok(e.to_http_response_with(ErrorCode::AlreadyEnrolled))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
