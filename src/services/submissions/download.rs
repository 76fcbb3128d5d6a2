use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::io::ErrorKind;
use tracing::error;

use super::{SubmissionService, submission_upload_dir};
use crate::errors::LearnHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{can_manage_course, require_assignment, require_course};
use crate::services::current_user;

/// 用于 Content-Disposition 的文件名，去掉引号与控制字符
fn attachment_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "submission".to_string()
    } else {
        cleaned
    }
}

fn file_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "File not found",
    ))
}

/// 下载提交的文件，提交者本人或课程教师可用
pub async fn download_submission_file(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    index: usize,
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
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) if submission.assignment_id == assignment_id => submission,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found for this assignment",
            )));
        }
        Err(e) => return Ok(e.to_http_response()),
    };

    if submission.student_id != user.id {
        let course = match require_course(&storage, assignment.course_id).await {
            Ok(course) => course,
            Err(resp) => return Ok(resp),
        };
        if !can_manage_course(&user, &course) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "You cannot download this file",
            )));
        }
    }

    let Some(file) = submission.files.get(index) else {
        return Ok(file_not_found());
    };

    let path = submission_upload_dir().join(&file.stored_name);
    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("Stored file missing on disk: {:?}", path);
            return Ok(file_not_found());
        }
        Err(e) => return Ok(LearnHubError::from(e).to_http_response()),
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, file.mime_type.as_str()))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                attachment_name(&file.original_name)
            ),
        ))
        .body(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_name_is_sanitized() {
        assert_eq!(attachment_name("report.pdf"), "report.pdf");
        assert_eq!(attachment_name("a\"b\r\n.pdf"), "ab.pdf");
        assert_eq!(attachment_name("\"\""), "submission");
    }
}
