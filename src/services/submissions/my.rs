use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::ApiResponse;
use crate::models::submissions::responses::SubmissionResponse;
use crate::services::access::{ensure_course_member, require_assignment, require_course};
use crate::services::current_user;

/// 当前用户在该作业下的提交；未提交时 data 为 null，而不是 404
pub async fn get_my_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
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
    if let Err(resp) = ensure_course_member(&storage, &user, &course).await {
        return Ok(resp);
    }

    match storage.get_user_submission(assignment_id, user.id).await {
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            Some(SubmissionResponse::from(submission)),
            "Query successful",
        ))),
        Ok(None) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            None::<SubmissionResponse>,
            "No submission yet",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}
