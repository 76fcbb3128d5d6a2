//! 结业证书
//!
//! 只有课程全部章节完成（且课程至少有一个章节）时才能下载。

pub mod download;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct CertificateService {
    storage: Option<Arc<dyn Storage>>,
}

impl CertificateService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn download(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        download::download_certificate(self, request, course_id).await
    }
}
