use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::organizations::CreateOrganizationRequest;
use crate::models::users::entities::UserRole;
use crate::services::OrganizationService;

static ORGANIZATION_SERVICE: Lazy<OrganizationService> =
    Lazy::new(OrganizationService::new_lazy);

pub async fn create_organization(
    req: HttpRequest,
    body: web::Json<CreateOrganizationRequest>,
) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE
        .create_organization(&req, body.into_inner())
        .await
}

pub async fn list_organizations(req: HttpRequest) -> ActixResult<HttpResponse> {
    ORGANIZATION_SERVICE.list_organizations(&req).await
}

pub fn configure_organization_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/organizations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_organizations))
                    // 创建组织 - 仅超级管理员
                    .route(
                        web::post()
                            .to(create_organization)
                            .wrap(middlewares::RequireRole::new_any(UserRole::superadmin_roles())),
                    ),
            ),
    );
}
