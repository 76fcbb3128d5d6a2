use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::models::submissions::requests::ReviewSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_course_manager, require_assignment, require_course};
use crate::services::current_user;

/// 批阅提交，覆盖之前的成绩与评语
pub async fn review_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    req: ReviewSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let comment = match req.validate() {
        Ok(comment) => comment,
        Err(msg) => {
            let grade_range =
                ReviewSubmissionRequest::MIN_GRADE..=ReviewSubmissionRequest::MAX_GRADE;
            let code = if grade_range.contains(&req.grade) {
                ErrorCode::ValidationFailed
            } else {
                ErrorCode::InvalidGrade
            };
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
        }
    };

    let storage = service.get_storage(request)?;
    let assignment = match require_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    let course = match require_course(&storage, assignment.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_course_manager(&user, &course) {
        return Ok(resp);
    }

    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) if submission.assignment_id == assignment_id => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found for this assignment",
            )));
        }
        Err(e) => return Ok(e.to_http_response()),
    }

    match storage
        .review_submission(submission_id, user.id, req.grade, comment)
        .await
    {
        Ok(submission) => {
            info!(
                "Submission {} reviewed by user {} with grade {}",
                submission_id, user.id, req.grade
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse::from(submission),
                "Submission reviewed successfully",
            )))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
