use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::ApiResponse;
use crate::models::courses::requests::CourseListParams;
use crate::models::users::entities::UserRole;
use crate::services::current_user;

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 学生只能看到已选的课程
    let enrolled_user = (user.role == UserRole::Student).then_some(user.id);

    match storage
        .list_courses_with_pagination(query, enrolled_user)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Query successful"))),
        Err(e) => Ok(e.to_http_response()),
    }
}
