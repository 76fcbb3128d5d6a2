use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, Resource, Section, Video};
use crate::models::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

/// 大纲中的章节，学生视角附带 can_complete
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct SectionOutlineResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub videos: Vec<Video>,
    pub resources: Vec<Resource>,
    pub assignment_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_complete: Option<bool>,
}

impl SectionOutlineResponse {
    pub fn from_section(section: Section, can_complete: Option<bool>) -> Self {
        Self {
            id: section.id,
            name: section.name,
            description: section.description,
            position: section.position,
            videos: section.videos,
            resources: section.resources,
            assignment_ids: section.assignment_ids,
            can_complete,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseDetailResponse {
    pub course: Course,
    pub sections: Vec<SectionOutlineResponse>,
}
