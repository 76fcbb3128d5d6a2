//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::course_progress::{
    ActiveModel as CourseProgressActiveModel, Entity as CourseProgress,
    Model as CourseProgressModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::organizations::{
    ActiveModel as OrganizationActiveModel, Entity as Organizations, Model as OrganizationModel,
};
pub use super::progress_items::{
    ActiveModel as ProgressItemActiveModel, Entity as ProgressItems, Model as ProgressItemModel,
};
pub use super::section_resources::{
    ActiveModel as SectionResourceActiveModel, Entity as SectionResources,
    Model as SectionResourceModel,
};
pub use super::section_videos::{
    ActiveModel as SectionVideoActiveModel, Entity as SectionVideos, Model as SectionVideoModel,
};
pub use super::sections::{
    ActiveModel as SectionActiveModel, Entity as Sections, Model as SectionModel,
};
pub use super::submission_files::{
    ActiveModel as SubmissionFileActiveModel, Entity as SubmissionFiles,
    Model as SubmissionFileModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
