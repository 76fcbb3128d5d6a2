//! 作业提交服务
//!
//! 状态机：未提交 -> 已提交 -> 已批阅，不可回退。

pub mod download;
pub mod list;
pub mod my;
pub mod review;
pub mod submit;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::submissions::requests::ReviewSubmissionRequest;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

/// 提交文件在上传目录下的子目录
pub(crate) fn submission_upload_dir() -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join("submissions")
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, request, assignment_id, payload).await
    }

    pub async fn get_my_submission(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        my::get_my_submission(self, request, assignment_id).await
    }

    pub async fn review(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        req: ReviewSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        review::review_submission(self, request, assignment_id, submission_id, req).await
    }

    pub async fn list(&self, request: &HttpRequest, assignment_id: i64) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, assignment_id).await
    }

    pub async fn download_file(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_id: i64,
        index: usize,
    ) -> ActixResult<HttpResponse> {
        download::download_submission_file(self, request, assignment_id, submission_id, index).await
    }
}
