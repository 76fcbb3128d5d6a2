use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::models::assignments::CreateAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    ensure_course_manager, invalidate_course_outline, require_course,
};
use crate::services::current_user;
use crate::utils::validate::{validate_link, validate_title};

fn normalize_assignment(req: &mut CreateAssignmentRequest) -> Result<(), String> {
    req.title = validate_title("Assignment title", &req.title, 200)?;
    req.description = req
        .description
        .take()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let mut links = Vec::with_capacity(req.assignment_links.len());
    for link in &req.assignment_links {
        validate_link(link)?;
        let link = link.trim().to_string();
        if !links.contains(&link) {
            links.push(link);
        }
    }
    req.assignment_links = links;
    Ok(())
}

/// 在章节下创建作业
///
/// 已有学生完成该章节时存储层返回 Conflict，避免改变已完成章节的判定条件。
pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    section_id: i64,
    mut req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = normalize_assignment(&mut req) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;

    let section = match storage.get_section_by_id(section_id).await {
        Ok(Some(section)) => section,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SectionNotFound,
                "Section not found",
            )));
        }
        Err(e) => return Ok(e.to_http_response()),
    };
    let course = match require_course(&storage, section.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_course_manager(&user, &course) {
        return Ok(resp);
    }

    match storage.create_assignment(section_id, req, user.id).await {
        Ok(assignment) => {
            invalidate_course_outline(service.get_cache(request).as_ref(), course.id).await;
            info!(
                "Assignment {} created in section {} by user {}",
                assignment.id, section_id, user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(assignment, "Assignment created successfully")))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_are_trimmed_and_deduplicated() {
        let mut req = CreateAssignmentRequest {
            title: " Lab 1 ".into(),
            description: None,
            due_date: None,
            assignment_links: vec![
                "https://example.com/lab1".into(),
                " https://example.com/lab1 ".into(),
            ],
        };
        normalize_assignment(&mut req).unwrap();
        assert_eq!(req.title, "Lab 1");
        assert_eq!(req.assignment_links, vec!["https://example.com/lab1"]);
    }

    #[test]
    fn test_empty_links_allowed() {
        let mut req = CreateAssignmentRequest {
            title: "Essay".into(),
            description: Some("Write about lifetimes".into()),
            due_date: None,
            assignment_links: vec![],
        };
        assert!(normalize_assignment(&mut req).is_ok());
        assert!(req.assignment_links.is_empty());
    }

    #[test]
    fn test_invalid_link_rejected() {
        let mut req = CreateAssignmentRequest {
            title: "Essay".into(),
            description: None,
            due_date: None,
            assignment_links: vec!["javascript:alert(1)".into()],
        };
        assert!(normalize_assignment(&mut req).is_err());
    }
}
