use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::ProgressService;

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

pub async fn initialize_progress(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.initialize(&req, path.into_inner()).await
}

pub async fn get_progress(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get(&req, path.into_inner()).await
}

// 不存在则创建，可重复调用
pub async fn get_or_create_progress(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_or_create(&req, path.into_inner()).await
}

pub async fn mark_video_complete(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, section_id, video_id) = path.into_inner();
    PROGRESS_SERVICE
        .mark_video_complete(&req, course_id, section_id, video_id)
        .await
}

pub async fn mark_assignment_complete(
    req: HttpRequest,
    path: web::Path<(i64, i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, section_id, assignment_id) = path.into_inner();
    PROGRESS_SERVICE
        .mark_assignment_complete(&req, course_id, section_id, assignment_id)
        .await
}

pub async fn mark_resources_complete(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, section_id) = path.into_inner();
    PROGRESS_SERVICE
        .mark_resources_complete(&req, course_id, section_id)
        .await
}

pub async fn mark_section_complete(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (course_id, section_id) = path.into_inner();
    PROGRESS_SERVICE
        .mark_section_complete(&req, course_id, section_id)
        .await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/progress")
            .wrap(middlewares::RequireJWT)
            .route("/initialize/{course_id}", web::post().to(initialize_progress))
            .service(
                web::resource("/course/{course_id}")
                    .route(web::get().to(get_progress))
                    .route(web::put().to(get_or_create_progress)),
            )
            .route(
                "/video/{course_id}/{section_id}/{video_id}/complete",
                web::post().to(mark_video_complete),
            )
            .route(
                "/assignment/{course_id}/{section_id}/{assignment_id}/complete",
                web::post().to(mark_assignment_complete),
            )
            .route(
                "/resource/{course_id}/{section_id}/complete",
                web::post().to(mark_resources_complete),
            )
            .route(
                "/section/{course_id}/{section_id}/complete",
                web::post().to(mark_section_complete),
            ),
    );
}
