pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod organizations;
pub mod progress;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 应用启动时间，注入到 actix 的 app_data 中
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 0 表示成功，其余按模块分段：
/// 1xxx 通用，2xxx 认证与用户，3xxx 课程目录，4xxx 学习进度，
/// 5xxx 作业提交与文件，6xxx 证书。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InternalServerError = 1007,

    // 认证与用户
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,

    // 课程目录
    OrganizationNotFound = 3000,
    OrganizationAlreadyExists = 3001,
    CourseNotFound = 3100,
    SectionNotFound = 3101,
    VideoNotFound = 3102,
    NotEnrolled = 3103,
    AlreadyEnrolled = 3104,
    AssignmentNotFound = 3200,

    // 学习进度
    ProgressNotFound = 4000,
    ProgressAlreadyExists = 4001,
    SectionPrerequisiteNotMet = 4002,
    AssignmentNotSubmitted = 4003,

    // 作业提交与文件
    SubmissionNotFound = 5000,
    SubmissionAlreadyExists = 5001,
    SubmissionAlreadyReviewed = 5002,
    InvalidFileType = 5003,
    FileTooLarge = 5004,
    FileNotFound = 5005,
    FileUploadFailed = 5006,
    MultifileUploadNotAllowed = 5007,
    InvalidGrade = 5008,

    // 证书
    CertificateNotAvailable = 6000,
}
