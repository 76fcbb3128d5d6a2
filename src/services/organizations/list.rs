use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrganizationService;
use crate::models::ApiResponse;
use crate::models::organizations::OrganizationListResponse;

pub async fn list_organizations(
    service: &OrganizationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.list_organizations().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            OrganizationListResponse { items },
            "Query successful",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}
