use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::errors::LearnHubError;
use crate::models::ErrorCode;

/// 初始化进度，重复初始化返回 409
pub async fn initialize_progress(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };

    match ctx.storage.initialize_progress(ctx.user.id, course_id).await {
        Ok(progress) => Ok(ctx.respond(progress, "Progress initialized")),
        Err(e @ LearnHubError::AlreadyExists(_)) => {
            Ok(e.to_http_response_with(ErrorCode::ProgressAlreadyExists))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
