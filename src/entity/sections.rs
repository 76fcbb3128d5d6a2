//! 章节实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub position: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装业务章节，子项由调用方批量查询后传入
    pub fn into_section(
        self,
        videos: Vec<crate::models::courses::entities::Video>,
        resources: Vec<crate::models::courses::entities::Resource>,
        assignment_ids: Vec<i64>,
    ) -> crate::models::courses::entities::Section {
        crate::models::courses::entities::Section {
            id: self.id,
            course_id: self.course_id,
            name: self.name,
            description: self.description,
            position: self.position,
            videos,
            resources,
            assignment_ids,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
