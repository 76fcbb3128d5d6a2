use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReviewSubmissionRequest {
    /// 0 到 100，含边界
    pub grade: f64,
    pub comment: String,
}

impl ReviewSubmissionRequest {
    pub const MIN_GRADE: f64 = 0.0;
    pub const MAX_GRADE: f64 = 100.0;

    /// 校验分数与评语，返回去除首尾空白后的评语
    pub fn validate(&self) -> Result<String, &'static str> {
        if !self.grade.is_finite() || !(Self::MIN_GRADE..=Self::MAX_GRADE).contains(&self.grade) {
            return Err("Grade must be between 0 and 100");
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err("Review comment must not be empty");
        }
        Ok(comment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(grade: f64, comment: &str) -> ReviewSubmissionRequest {
        ReviewSubmissionRequest {
            grade,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_grade_bounds_are_inclusive() {
        assert!(review(0.0, "ok").validate().is_ok());
        assert!(review(100.0, "ok").validate().is_ok());
        assert!(review(-0.5, "ok").validate().is_err());
        assert!(review(100.5, "ok").validate().is_err());
        assert!(review(f64::NAN, "ok").validate().is_err());
    }

    #[test]
    fn test_comment_is_trimmed_and_required() {
        assert_eq!(review(90.0, "  good work \n").validate().unwrap(), "good work");
        assert!(review(90.0, "   ").validate().is_err());
    }
}
