use serde::Serialize;
use ts_rs::TS;

use super::entities::{Submission, SubmissionStatus};

/// 提交者信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionStudent {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

/// 单个提交的响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub status: SubmissionStatus,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        let status = submission.status();
        Self { submission, status }
    }
}

/// 教师查看的提交列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: SubmissionResponse,
    pub student: SubmissionStudent,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionListItem>,
}
