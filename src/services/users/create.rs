use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::config::AppConfig;
use crate::errors::LearnHubError;
use crate::models::auth::UserInfoResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode, users::requests::CreateUserRequest};
use crate::services::current_user;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let operator = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 只有超级管理员可以创建管理员账号
    if user_data.role.is_admin() && operator.role != UserRole::Superadmin {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Only a superadmin can create administrator accounts",
        )));
    }

    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();

    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }
    if let Err(msg) = validate_password(&user_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let storage = service.get_storage(request)?;

    if let Some(organization_id) = user_data.organization_id {
        match storage.get_organization_by_id(organization_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::OrganizationNotFound,
                    "Organization not found",
                )));
            }
            Err(e) => return Ok(e.to_http_response()),
        }
    }

    user_data.password = match hash_password(&user_data.password, &AppConfig::get().argon2) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Password hashing failed",
                )),
            );
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!(
                "User {} ({}) created by {}",
                user.username, user.role, operator.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserInfoResponse { user },
                "User created successfully",
            )))
        }
        Err(e @ LearnHubError::AlreadyExists(_)) => {
            Ok(e.to_http_response_with(ErrorCode::UserAlreadyExists))
        }
        Err(e) => Ok(e.to_http_response()),
    }
}
