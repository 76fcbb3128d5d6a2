use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::organizations::{ActiveModel, Column, Entity as Organizations};
use crate::errors::{LearnHubError, Result};
use crate::models::organizations::{CreateOrganizationRequest, Organization};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建机构，名称重复时返回 AlreadyExists
    pub async fn create_organization_impl(
        &self,
        req: CreateOrganizationRequest,
    ) -> Result<Organization> {
        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LearnHubError::already_exists("Organization name already exists")
            } else {
                LearnHubError::database_operation(format!("创建机构失败: {e}"))
            }
        })?;

        Ok(result.into_organization())
    }

    pub async fn get_organization_by_id_impl(&self, id: i64) -> Result<Option<Organization>> {
        let result = Organizations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询机构失败: {e}")))?;

        Ok(result.map(|m| m.into_organization()))
    }

    pub async fn list_organizations_impl(&self) -> Result<Vec<Organization>> {
        let results = Organizations::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询机构列表失败: {e}")))?;

        Ok(results
            .into_iter()
            .map(|m| m.into_organization())
            .collect())
    }
}
