use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::errors::LearnHubError;
use crate::models::organizations::CreateOrganizationRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_title;

pub async fn create_organization(
    service: &OrganizationService,
    request: &HttpRequest,
    mut req: CreateOrganizationRequest,
) -> ActixResult<HttpResponse> {
    req.name = match validate_title("Organization name", &req.name, 128) {
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

    let storage = service.get_storage(request)?;
    match storage.create_organization(req).await {
        Ok(organization) => Ok(HttpResponse::Created().json(ApiResponse::success(
            organization,
            "Organization created successfully",
        ))),
        Err(e @ LearnHubError::AlreadyExists(_)) => {
            Ok(e.to_http_response_with(ErrorCode::OrganizationAlreadyExists))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
