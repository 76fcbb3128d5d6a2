use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交附带的文件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionFile {
    pub id: i64,
    #[serde(skip_serializing, default)] // 磁盘上的文件名只在服务端使用
    #[ts(skip)]
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

// 教师批阅
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionReview {
    pub grade: f64,
    pub comment: String,
    pub reviewed_by: i64,
    pub reviewed_at: chrono::DateTime<chrono::Utc>,
}

/// 提交状态：Submitted -> Reviewed，不可回退
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Reviewed,
}

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub files: Vec<SubmissionFile>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub review: Option<SubmissionReview>,
}

impl Submission {
    pub fn status(&self) -> SubmissionStatus {
        if self.review.is_some() {
            SubmissionStatus::Reviewed
        } else {
            SubmissionStatus::Submitted
        }
    }
}

/// 已落盘、待写入数据库的文件
#[derive(Debug, Clone)]
pub struct NewSubmissionFile {
    pub stored_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub file_size: i64,
}
