use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::{LearnHubError, Result};
use crate::models::courses::entities::Enrollment;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 学生选课，重复选课返回 AlreadyExists
    pub async fn enroll_student_impl(&self, course_id: i64, user_id: i64) -> Result<Enrollment> {
        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LearnHubError::already_exists("Student is already enrolled in this course")
            } else {
                LearnHubError::database_operation(format!("选课失败: {e}"))
            }
        })?;

        Ok(result.into_enrollment())
    }

    pub async fn is_enrolled_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let count = Enrollments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LearnHubError::database_operation(format!("查询选课失败: {e}")))?;

        Ok(count > 0)
    }
}
