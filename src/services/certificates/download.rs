use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use tracing::info;

use super::CertificateService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_learner, require_course_outline};
use crate::services::{cache_from_request, current_user};
use crate::utils::certificate_pdf::{CertificateData, render_certificate_pdf};

fn not_available() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::CertificateNotAvailable,
        "Course is not completed yet",
    ))
}

pub async fn download_certificate(
    service: &CertificateService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let cache = cache_from_request(request);

    let outline = match require_course_outline(&storage, cache.as_ref(), course_id).await {
        Ok(outline) => outline,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = ensure_learner(&storage, &user, &outline.course).await {
        return Ok(resp);
    }

    let progress = match storage.get_progress(user.id, course_id).await {
        Ok(Some(progress)) => progress,
        Ok(None) => return Ok(not_available()),
        Err(e) => return Ok(e.to_http_response()),
    };
    if !progress.is_course_complete(&outline.section_ids()) {
        return Ok(not_available());
    }

    let data = CertificateData {
        student_name: user.name_for_display().to_string(),
        course_name: outline.course.name.clone(),
        completed_at: progress
            .last_section_completed_at
            .unwrap_or(progress.updated_at),
        issuer: AppConfig::get().certificate.issuer.clone(),
    };
    let pdf = render_certificate_pdf(&data);

    info!("Issued certificate for user {} in course {}", user.id, course_id);

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"certificate-{course_id}.pdf\""),
        ))
        .body(pdf))
}
