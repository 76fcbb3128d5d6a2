use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::assignments::CreateAssignmentRequest;
use crate::models::submissions::requests::ReviewSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 在章节下创建作业
pub async fn create_assignment(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn get_assignment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(&req, path.into_inner())
        .await
}

// 提交作业（multipart，字段名 file）
pub async fn submit_assignment(
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, path.into_inner(), payload)
        .await
}

pub async fn get_my_submission(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_my_submission(&req, path.into_inner())
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list(&req, path.into_inner()).await
}

// 批阅
pub async fn review_submission(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    body: web::Json<ReviewSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .review(&req, assignment_id, submission_id, body.into_inner())
        .await
}

pub async fn download_submission_file(
    req: HttpRequest,
    path: web::Path<(i64, i64, usize)>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id, index) = path.into_inner();
    SUBMISSION_SERVICE
        .download_file(&req, assignment_id, submission_id, index)
        .await
}

pub fn configure_section_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/sections")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/assignments")
                    .route(web::post().to(create_assignment))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignment")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{id}").route(web::get().to(get_assignment)))
            // 上传限流按用户计数，因此放在 JWT 之内
            .service(
                web::resource("/{id}/submit")
                    .wrap(RateLimit::submission_upload())
                    .route(web::post().to(submit_assignment)),
            )
            .service(web::resource("/{id}/my-submission").route(web::get().to(get_my_submission)))
            .service(
                web::resource("/{id}/submissions")
                    .route(web::get().to(list_submissions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/submissions/{submission_id}/review")
                    .route(web::post().to(review_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            // 提交者本人或课程教师可下载，业务层判断
            .service(
                web::resource("/{id}/submissions/{submission_id}/files/{index}")
                    .route(web::get().to(download_submission_file)),
            ),
    );
}
