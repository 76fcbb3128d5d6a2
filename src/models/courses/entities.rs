use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 章节视频
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub position: i32,
}

// 章节资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub link: String,
    pub position: i32,
}

/// 章节
///
/// `assignment_ids` 在章节被任何学生完成后不再变化，完成判定依赖这一点。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Section {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub videos: Vec<Video>,
    pub resources: Vec<Resource>,
    pub assignment_ids: Vec<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Section {
    pub fn has_video(&self, video_id: i64) -> bool {
        self.videos.iter().any(|v| v.id == video_id)
    }

    pub fn has_assignment(&self, assignment_id: i64) -> bool {
        self.assignment_ids.contains(&assignment_id)
    }
}

/// 课程大纲：课程本身加上按 position 排序的章节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutline {
    pub course: Course,
    pub sections: Vec<Section>,
}

impl CourseOutline {
    pub fn section(&self, section_id: i64) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_ids(&self) -> Vec<i64> {
        self.sections.iter().map(|s| s.id).collect()
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Enrollment {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}
