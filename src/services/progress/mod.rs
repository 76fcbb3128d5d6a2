//! 学习进度服务
//!
//! 所有操作都作用于当前登录用户自己的进度。课程、章节、视频、作业必须
//! 属于同一棵大纲树，否则返回 404；变更接口返回完整的最新进度。

pub mod get;
pub mod initialize;
pub mod mark;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::entities::CourseOutline;
use crate::models::progress::CourseProgress;
use crate::models::progress::responses::CourseProgressResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{ensure_learner, require_course_outline};
use crate::services::current_user;
use crate::storage::Storage;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

/// 一次进度请求的上下文
pub(crate) struct ProgressContext {
    pub user: User,
    pub storage: Arc<dyn Storage>,
    pub outline: CourseOutline,
}

impl ProgressContext {
    /// 以课程当前的章节列表计算百分比
    pub fn respond(&self, progress: CourseProgress, message: &str) -> HttpResponse {
        let response = CourseProgressResponse::build(progress, &self.outline.section_ids());
        HttpResponse::Ok().json(ApiResponse::success(response, message))
    }
}

impl ProgressService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 解析当前用户、课程大纲并检查选课关系
    pub(crate) async fn context(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<Result<ProgressContext, HttpResponse>> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(Err(resp)),
        };
        let storage = self.get_storage(request)?;
        let cache = super::cache_from_request(request);

        let outline = match require_course_outline(&storage, cache.as_ref(), course_id).await {
            Ok(outline) => outline,
            Err(resp) => return Ok(Err(resp)),
        };
        if let Err(resp) = ensure_learner(&storage, &user, &outline.course).await {
            return Ok(Err(resp));
        }

        Ok(Ok(ProgressContext {
            user,
            storage,
            outline,
        }))
    }

    pub async fn initialize(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        initialize::initialize_progress(self, request, course_id).await
    }

    pub async fn get(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_progress(self, request, course_id).await
    }

    pub async fn get_or_create(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_or_create_progress(self, request, course_id).await
    }

    pub async fn mark_video_complete(
        &self,
        request: &HttpRequest,
        course_id: i64,
        section_id: i64,
        video_id: i64,
    ) -> ActixResult<HttpResponse> {
        mark::mark_video_complete(self, request, course_id, section_id, video_id).await
    }

    pub async fn mark_assignment_complete(
        &self,
        request: &HttpRequest,
        course_id: i64,
        section_id: i64,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        mark::mark_assignment_complete(self, request, course_id, section_id, assignment_id).await
    }

    pub async fn mark_resources_complete(
        &self,
        request: &HttpRequest,
        course_id: i64,
        section_id: i64,
    ) -> ActixResult<HttpResponse> {
        mark::mark_resources_complete(self, request, course_id, section_id).await
    }

    pub async fn mark_section_complete(
        &self,
        request: &HttpRequest,
        course_id: i64,
        section_id: i64,
    ) -> ActixResult<HttpResponse> {
        mark::mark_section_complete(self, request, course_id, section_id).await
    }
}

pub(crate) fn section_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SectionNotFound,
        "Section not found in this course",
    ))
}
