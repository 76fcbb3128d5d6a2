use serde::Serialize;
use ts_rs::TS;

use super::entities::CourseProgress;

/// 学习进度响应，所有变更接口都返回完整的最新进度
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CourseProgressResponse {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub videos_watched: Vec<i64>,
    pub assignments_submitted: Vec<i64>,
    pub sections_completed: Vec<i64>,
    pub resources_completed: Vec<i64>,
    pub completion_percentage: u8,
    pub total_sections: usize,
    pub certificate_available: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl CourseProgressResponse {
    pub fn build(progress: CourseProgress, course_sections: &[i64]) -> Self {
        let completion_percentage = progress.completion_percentage(course_sections);
        let certificate_available = progress.is_course_complete(course_sections);
        Self {
            id: progress.id,
            user_id: progress.user_id,
            course_id: progress.course_id,
            videos_watched: progress.videos_watched.into_iter().collect(),
            assignments_submitted: progress.assignments_submitted.into_iter().collect(),
            sections_completed: progress.sections_completed.into_iter().collect(),
            resources_completed: progress.resources_completed.into_iter().collect(),
            completion_percentage,
            total_sections: course_sections.len(),
            certificate_available,
            created_at: progress.created_at,
            updated_at: progress.updated_at,
        }
    }
}
