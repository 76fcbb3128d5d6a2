use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_progress(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match ctx.storage.get_progress(ctx.user.id, course_id).await {
        Ok(Some(progress)) => Ok(ctx.respond(progress, "Query successful")),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProgressNotFound,
            "Progress has not been initialized for this course",
        ))),
        Err(e) => Ok(e.to_http_response()),
    }
}

/// 幂等的获取或创建，多个标签页同时打开课程时不会出现 409
pub async fn get_or_create_progress(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match ctx.storage.get_or_create_progress(ctx.user.id, course_id).await {
        Ok(progress) => Ok(ctx.respond(progress, "Query successful")),
        Err(e) => Ok(e.to_http_response()),
    }
}
