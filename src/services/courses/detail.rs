use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::ApiResponse;
use crate::models::courses::responses::{CourseDetailResponse, SectionOutlineResponse};
use crate::models::progress::can_complete_section;
use crate::services::access::{CourseMembership, ensure_course_member, require_course_outline};
use crate::services::current_user;

/// 课程大纲；学生视角为每个章节附带 can_complete
pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request);

    let outline = match require_course_outline(&storage, cache.as_ref(), course_id).await {
        Ok(outline) => outline,
        Err(resp) => return Ok(resp),
    };

    let membership = match ensure_course_member(&storage, &user, &outline.course).await {
        Ok(membership) => membership,
        Err(resp) => return Ok(resp),
    };

    let submitted = match membership {
        CourseMembership::Manager => None,
        CourseMembership::Learner => match storage.get_progress(user.id, course_id).await {
            Ok(progress) => Some(
                progress
                    .map(|p| p.assignments_submitted)
                    .unwrap_or_default(),
            ),
            Err(e) => return Ok(e.to_http_response()),
        },
    };

    let sections = outline
        .sections
        .into_iter()
        .map(|section| {
            let can_complete = submitted
                .as_ref()
                .map(|done| can_complete_section(&section.assignment_ids, done));
            SectionOutlineResponse::from_section(section, can_complete)
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course: outline.course,
            sections,
        },
        "Query successful",
    )))
}
