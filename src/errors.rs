//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称以及到 HTTP 响应的映射。

use std::fmt;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_learnhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LearnHubError {
            $($variant(String),)*
        }

        impl LearnHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LearnHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LearnHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LearnHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LearnHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LearnHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_learnhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    AlreadyExists("E013", "Already Exists"),
    Conflict("E014", "Conflict"),
    PreconditionFailed("E015", "Precondition Failed"),
    InvalidFileType("E016", "Invalid File Type"),
    FileTooLarge("E017", "File Too Large"),
}

impl LearnHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            LearnHubError::Validation(_)
            | LearnHubError::InvalidFileType(_)
            | LearnHubError::FileTooLarge(_)
            | LearnHubError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            LearnHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            LearnHubError::Authorization(_) => StatusCode::FORBIDDEN,
            LearnHubError::NotFound(_) => StatusCode::NOT_FOUND,
            LearnHubError::AlreadyExists(_) | LearnHubError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的业务错误码（未细分时的默认值）
    pub fn api_code(&self) -> ErrorCode {
        match self {
            LearnHubError::Validation(_) => ErrorCode::ValidationFailed,
            LearnHubError::InvalidFileType(_) => ErrorCode::InvalidFileType,
            LearnHubError::FileTooLarge(_) => ErrorCode::FileTooLarge,
            LearnHubError::PreconditionFailed(_) => ErrorCode::BadRequest,
            LearnHubError::Authentication(_) => ErrorCode::Unauthorized,
            LearnHubError::Authorization(_) => ErrorCode::Forbidden,
            LearnHubError::NotFound(_) => ErrorCode::NotFound,
            LearnHubError::AlreadyExists(_) | LearnHubError::Conflict(_) => ErrorCode::Conflict,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 转换为统一响应信封，业务码由调用方指定
    pub fn to_http_response_with(&self, code: ErrorCode) -> HttpResponse {
        // 内部错误不向客户端暴露细节
        let message = if self.status_code().is_server_error() {
            tracing::error!("{}", self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error_empty(code, message))
    }

    /// 转换为统一响应信封
    pub fn to_http_response(&self) -> HttpResponse {
        self.to_http_response_with(self.api_code())
    }
}

impl fmt::Display for LearnHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LearnHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LearnHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        LearnHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LearnHubError {
    fn from(err: std::io::Error) -> Self {
        LearnHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LearnHubError {
    fn from(err: serde_json::Error) -> Self {
        LearnHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LearnHubError {
    fn from(err: chrono::ParseError) -> Self {
        LearnHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LearnHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LearnHubError::cache_connection("test").code(), "E001");
        assert_eq!(LearnHubError::database_config("test").code(), "E003");
        assert_eq!(LearnHubError::validation("test").code(), "E007");
        assert_eq!(LearnHubError::authentication("test").code(), "E011");
        assert_eq!(LearnHubError::precondition_failed("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LearnHubError::already_exists("test").error_type(),
            "Already Exists"
        );
        assert_eq!(
            LearnHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LearnHubError::precondition_failed("All assignments must be completed first");
        assert_eq!(err.message(), "All assignments must be completed first");
    }

    #[test]
    fn test_format_simple() {
        let err = LearnHubError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            LearnHubError::precondition_failed("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LearnHubError::already_exists("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(LearnHubError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            LearnHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LearnHubError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            LearnHubError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
