//! 课程目录存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::section_resources::{
    ActiveModel as ResourceActiveModel, Column as ResourceColumn, Entity as SectionResources,
};
use crate::entity::section_videos::{
    ActiveModel as VideoActiveModel, Column as VideoColumn, Entity as SectionVideos,
};
use crate::entity::sections::{
    ActiveModel as SectionActiveModel, Column as SectionColumn, Entity as Sections,
    Model as SectionModel,
};
use crate::errors::{LearnHubError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseOutline, Resource, Section, Video},
        requests::{CourseListParams, CreateCourseRequest, CreateSectionRequest},
        responses::CourseListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        req: CreateCourseRequest,
        created_by: i64,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            organization_id: Set(req.organization_id),
            name: Set(req.name),
            description: Set(req.description),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListParams,
        enrolled_user: Option<i64>,
    ) -> Result<CourseListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Courses::find();

        if let Some(organization_id) = query.organization_id {
            select = select.filter(Column::OrganizationId.eq(organization_id));
        }

        // 学生只能看到已选的课程
        if let Some(user_id) = enrolled_user {
            let course_ids: Vec<i64> = Enrollments::find()
                .select_only()
                .column(EnrollmentColumn::CourseId)
                .filter(EnrollmentColumn::UserId.eq(user_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| LearnHubError::database_operation(format!("查询选课失败: {e}")))?;
            select = select.filter(Column::Id.is_in(course_ids));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size as u64);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page((page - 1) as u64)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }

    /// 获取课程大纲
    pub async fn get_course_outline_impl(&self, course_id: i64) -> Result<Option<CourseOutline>> {
        let Some(course) = self.get_course_by_id_impl(course_id).await? else {
            return Ok(None);
        };

        let section_models = Sections::find()
            .filter(SectionColumn::CourseId.eq(course_id))
            .order_by_asc(SectionColumn::Position)
            .order_by_asc(SectionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询章节失败: {e}")))?;

        let sections = load_section_children(&self.db, section_models).await?;

        Ok(Some(CourseOutline { course, sections }))
    }

    /// 创建章节，视频与资料按请求顺序编号
    pub async fn create_section_impl(
        &self,
        course_id: i64,
        req: CreateSectionRequest,
    ) -> Result<Section> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("开启事务失败: {e}")))?;

        let position = match req.position {
            Some(position) => position,
            None => {
                let last: Option<i32> = Sections::find()
                    .select_only()
                    .column(SectionColumn::Position)
                    .filter(SectionColumn::CourseId.eq(course_id))
                    .order_by_desc(SectionColumn::Position)
                    .into_tuple()
                    .one(&txn)
                    .await
                    .map_err(|e| {
                        LearnHubError::database_operation(format!("查询章节位置失败: {e}"))
                    })?;
                last.map_or(1, |p| p + 1)
            }
        };

        let section = SectionActiveModel {
            course_id: Set(course_id),
            name: Set(req.name),
            description: Set(req.description),
            position: Set(position),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("创建章节失败: {e}")))?;

        if !req.videos.is_empty() {
            let videos = req
                .videos
                .into_iter()
                .enumerate()
                .map(|(i, v)| VideoActiveModel {
                    section_id: Set(section.id),
                    title: Set(v.title),
                    url: Set(v.url),
                    position: Set(i as i32 + 1),
                    ..Default::default()
                });
            SectionVideos::insert_many(videos)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| LearnHubError::database_operation(format!("创建章节视频失败: {e}")))?;
        }

        if !req.resources.is_empty() {
            let resources =
                req.resources
                    .into_iter()
                    .enumerate()
                    .map(|(i, r)| ResourceActiveModel {
                        section_id: Set(section.id),
                        name: Set(r.name),
                        link: Set(r.link),
                        position: Set(i as i32 + 1),
                        ..Default::default()
                    });
            SectionResources::insert_many(resources)
                .exec_without_returning(&txn)
                .await
                .map_err(|e| LearnHubError::database_operation(format!("创建章节资料失败: {e}")))?;
        }

        // 更新课程修改时间
        Courses::update_many()
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(course_id))
            .exec(&txn)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("更新课程失败: {e}")))?;

        let mut sections = load_section_children(&txn, vec![section]).await?;

        txn.commit()
            .await
            .map_err(|e| LearnHubError::database_operation(format!("提交事务失败: {e}")))?;

        sections
            .pop()
            .ok_or_else(|| LearnHubError::database_operation("创建章节后读取失败"))
    }

    /// 通过 ID 获取章节
    pub async fn get_section_by_id_impl(&self, section_id: i64) -> Result<Option<Section>> {
        let Some(model) = Sections::find_by_id(section_id)
            .one(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询章节失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut sections = load_section_children(&self.db, vec![model]).await?;
        Ok(sections.pop())
    }
}

/// 批量加载章节的视频、资料与作业 id，保持传入章节的顺序
async fn load_section_children<C: ConnectionTrait>(
    conn: &C,
    section_models: Vec<SectionModel>,
) -> Result<Vec<Section>> {
    if section_models.is_empty() {
        return Ok(Vec::new());
    }

    let section_ids: Vec<i64> = section_models.iter().map(|s| s.id).collect();

    let mut videos: HashMap<i64, Vec<Video>> = HashMap::new();
    for video in SectionVideos::find()
        .filter(VideoColumn::SectionId.is_in(section_ids.clone()))
        .order_by_asc(VideoColumn::Position)
        .order_by_asc(VideoColumn::Id)
        .all(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询章节视频失败: {e}")))?
    {
        videos
            .entry(video.section_id)
            .or_default()
            .push(video.into_video());
    }

    let mut resources: HashMap<i64, Vec<Resource>> = HashMap::new();
    for resource in SectionResources::find()
        .filter(ResourceColumn::SectionId.is_in(section_ids.clone()))
        .order_by_asc(ResourceColumn::Position)
        .order_by_asc(ResourceColumn::Id)
        .all(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询章节资料失败: {e}")))?
    {
        resources
            .entry(resource.section_id)
            .or_default()
            .push(resource.into_resource());
    }

    let assignment_rows: Vec<(i64, i64)> = Assignments::find()
        .select_only()
        .column(AssignmentColumn::Id)
        .column(AssignmentColumn::SectionId)
        .filter(AssignmentColumn::SectionId.is_in(section_ids))
        .order_by_asc(AssignmentColumn::Id)
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| LearnHubError::database_operation(format!("查询章节作业失败: {e}")))?;

    let mut assignment_ids: HashMap<i64, Vec<i64>> = HashMap::new();
    for (assignment_id, section_id) in assignment_rows {
        assignment_ids
            .entry(section_id)
            .or_default()
            .push(assignment_id);
    }

    Ok(section_models
        .into_iter()
        .map(|model| {
            let id = model.id;
            model.into_section(
                videos.remove(&id).unwrap_or_default(),
                resources.remove(&id).unwrap_or_default(),
                assignment_ids.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}
