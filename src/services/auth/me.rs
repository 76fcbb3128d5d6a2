use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::auth::UserInfoResponse;
use crate::services::current_user;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "Query successful",
    )))
}
