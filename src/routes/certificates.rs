use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::CertificateService;

static CERTIFICATE_SERVICE: Lazy<CertificateService> = Lazy::new(CertificateService::new_lazy);

// 下载结业证书（PDF）
pub async fn download_certificate(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE.download(&req, path.into_inner()).await
}

pub fn configure_certificate_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/certificates")
            .wrap(middlewares::RequireJWT)
            .route("/{course_id}", web::get().to(download_certificate)),
    );
}
