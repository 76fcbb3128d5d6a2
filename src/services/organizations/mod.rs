pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::organizations::CreateOrganizationRequest;
use crate::storage::Storage;

pub struct OrganizationService {
    storage: Option<Arc<dyn Storage>>,
}

impl OrganizationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn create_organization(
        &self,
        request: &HttpRequest,
        req: CreateOrganizationRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_organization(self, request, req).await
    }

    pub async fn list_organizations(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_organizations(self, request).await
    }
}
