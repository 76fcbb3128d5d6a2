use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::CreateSectionRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{
    ensure_course_manager, invalidate_course_outline, require_course,
};
use crate::services::current_user;
use crate::utils::validate::{validate_link, validate_title};

/// 清理并校验章节请求，返回第一条错误信息
fn normalize_section(req: &mut CreateSectionRequest) -> Result<(), String> {
    req.name = validate_title("Section name", &req.name, 200)?;
    req.description = req
        .description
        .take()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if req.position.is_some_and(|p| p < 0) {
        return Err("position must not be negative".to_string());
    }

    for video in &mut req.videos {
        video.title = validate_title("Video title", &video.title, 200)?;
        validate_link(&video.url)?;
        video.url = video.url.trim().to_string();
    }
    for resource in &mut req.resources {
        resource.name = validate_title("Resource name", &resource.name, 200)?;
        validate_link(&resource.link)?;
        resource.link = resource.link.trim().to_string();
    }
    Ok(())
}

pub async fn create_section(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut req: CreateSectionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(msg) = normalize_section(&mut req) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request)?;
    let course = match require_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_course_manager(&user, &course) {
        return Ok(resp);
    }

    match storage.create_section(course_id, req).await {
        Ok(section) => {
            invalidate_course_outline(service.get_cache(request).as_ref(), course_id).await;
            info!("Section {} added to course {}", section.id, course_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(section, "Section created successfully")))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::{NewResource, NewVideo};

    fn request() -> CreateSectionRequest {
        CreateSectionRequest {
            name: "  Ownership  ".into(),
            description: Some("   ".into()),
            position: None,
            videos: vec![NewVideo {
                title: "Borrowing".into(),
                url: " https://videos.example.com/borrow ".into(),
            }],
            resources: vec![NewResource {
                name: "Slides".into(),
                link: "https://example.com/slides.pdf".into(),
            }],
        }
    }

    #[test]
    fn test_normalize_trims_fields() {
        let mut req = request();
        normalize_section(&mut req).unwrap();
        assert_eq!(req.name, "Ownership");
        assert!(req.description.is_none());
        assert_eq!(req.videos[0].url, "https://videos.example.com/borrow");
    }

    #[test]
    fn test_normalize_rejects_bad_links() {
        let mut req = request();
        req.resources[0].link = "ftp://example.com/file".into();
        assert!(normalize_section(&mut req).is_err());

        let mut req = request();
        req.position = Some(-1);
        assert!(normalize_section(&mut req).is_err());
    }
}
