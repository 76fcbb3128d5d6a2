use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::validate::validate_title;

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    mut req: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    req.name = match validate_title("Course name", &req.name, 200) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };
    req.description = req
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    // 归属机构的教师与管理员只能在本机构下开课
    if user.role != UserRole::Superadmin
        && user
            .organization_id
            .is_some_and(|org| org != req.organization_id)
    {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You can only create courses in your own organization",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.get_organization_by_id(req.organization_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::OrganizationNotFound,
                "Organization not found",
            )));
        }
        Err(e) => return Ok(e.to_http_response()),
    }

    match storage.create_course(req, user.id).await {
        Ok(course) => {
            info!("Course {} created by user {}", course.id, user.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(course, "Course created successfully")))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
