use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{ProgressService, section_not_found};
use crate::errors::LearnHubError;
use crate::models::progress::ProgressKind;
use crate::models::{ApiResponse, ErrorCode};

pub async fn mark_video_complete(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
    section_id: i64,
    video_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let Some(section) = ctx.outline.section(section_id) else {
        return Ok(section_not_found());
    };
    if !section.has_video(video_id) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::VideoNotFound,
            "Video not found in this section",
        )));
    }

    match ctx
        .storage
        .mark_progress_item(ctx.user.id, course_id, ProgressKind::Video, section_id, video_id)
        .await
    {
        Ok(progress) => Ok(ctx.respond(progress, "Video marked as complete")),
        Err(e) => Ok(e.to_http_response()),
    }
}

/// 作业完成状态来源于提交记录，未提交时返回 400
pub async fn mark_assignment_complete(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
    section_id: i64,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    let Some(section) = ctx.outline.section(section_id) else {
        return Ok(section_not_found());
    };
    if !section.has_assignment(assignment_id) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found in this section",
        )));
    }

    match ctx
        .storage
        .mark_assignment_complete(ctx.user.id, course_id, section_id, assignment_id)
        .await
    {
        Ok(progress) => Ok(ctx.respond(progress, "Assignment marked as complete")),
        Err(e @ LearnHubError::PreconditionFailed(_)) => {
            Ok(e.to_http_response_with(ErrorCode::AssignmentNotSubmitted))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}

pub async fn mark_resources_complete(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
    section_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    if ctx.outline.section(section_id).is_none() {
        return Ok(section_not_found());
    }

    // 资料里程碑以章节 id 作为条目 id
    match ctx
        .storage
        .mark_progress_item(
            ctx.user.id,
            course_id,
            ProgressKind::Resources,
            section_id,
            section_id,
        )
        .await
    {
        Ok(progress) => Ok(ctx.respond(progress, "Resources marked as complete")),
        Err(e) => Ok(e.to_http_response()),
    }
}

/// 章节完成受作业提交约束，判定总是在服务端基于已存储的数据重新进行
pub async fn mark_section_complete(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
    section_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match service.context(request, course_id).await? {
        Ok(ctx) => ctx,
        Err(resp) => return Ok(resp),
    };
    if ctx.outline.section(section_id).is_none() {
        return Ok(section_not_found());
    }

    match ctx
        .storage
        .mark_section_complete(ctx.user.id, course_id, section_id)
        .await
    {
        Ok(progress) => Ok(ctx.respond(progress, "Section marked as complete")),
        Err(e @ LearnHubError::PreconditionFailed(_)) => {
            debug!(
                "User {} cannot complete section {} yet: {}",
                ctx.user.id, section_id, e
            );
            Ok(e.to_http_response_with(ErrorCode::SectionPrerequisiteNotMet))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
