use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::upload::receive_submission_file;
use super::{SubmissionService, submission_upload_dir};
use crate::config::AppConfig;
use crate::errors::LearnHubError;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_learner, require_assignment, require_course};
use crate::services::current_user;
use crate::utils::SubmissionFileRules;

fn already_submitted(reviewed: bool) -> HttpResponse {
    if reviewed {
        LearnHubError::conflict("Submission has already been reviewed")
            .to_http_response_with(ErrorCode::SubmissionAlreadyReviewed)
    } else {
        LearnHubError::conflict("Assignment already submitted")
            .to_http_response_with(ErrorCode::SubmissionAlreadyExists)
    }
}

/// 提交作业文件
///
/// 文件校验通过并落盘后，在一个事务里写入提交记录并把作业计入学习进度。
pub async fn submit_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let config = AppConfig::get();

    let assignment = match require_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    let course = match require_course(&storage, assignment.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_learner(&storage, &user, &course).await {
        return Ok(resp);
    }

    // 不允许重新提交时，在读取上传内容之前就拒绝
    let allow_resubmit = config.submission.allow_resubmit;
    match storage.get_user_submission(assignment_id, user.id).await {
        Ok(Some(existing)) if !allow_resubmit || existing.review.is_some() => {
            return Ok(already_submitted(existing.review.is_some()));
        }
        Ok(_) => {}
        Err(e) => return Ok(e.to_http_response()),
    }

    let rules = SubmissionFileRules::from_config(&config.upload);
    let dir = submission_upload_dir();
    let received = match receive_submission_file(payload, &rules, &dir).await {
        Ok(received) => received,
        Err(resp) => return Ok(resp),
    };

    let new_file = received.to_new_file();
    match storage
        .create_submission(&assignment, user.id, vec![new_file], allow_resubmit)
        .await
    {
        Ok((submission, replaced)) => {
            received.keep();
            for stored_name in replaced {
                if let Err(e) = std::fs::remove_file(dir.join(&stored_name)) {
                    warn!("Failed to remove replaced file {}: {}", stored_name, e);
                }
            }
            info!(
                "User {} submitted assignment {} (submission {})",
                user.id, assignment_id, submission.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionResponse::from(submission),
                "Assignment submitted successfully",
            )))
        }
        // 与并发提交竞争失败，received 析构时删除文件
        Err(e @ LearnHubError::Conflict(_)) => {
            Ok(e.to_http_response_with(ErrorCode::SubmissionAlreadyExists))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
