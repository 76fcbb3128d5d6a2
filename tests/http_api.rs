//! 经过 JWT 中间件与路由的接口测试

mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test, web};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use common::{Fixture, add_assignment, create_user, submit};
use rust_learnhub::config::AppConfig;
use rust_learnhub::models::ErrorCode;
use rust_learnhub::models::users::entities::{User, UserRole};
use rust_learnhub::routes;
use rust_learnhub::storage::Storage;
use rust_learnhub::utils::jwt::JwtUtils;
use rust_learnhub::utils::path_error_handler;

fn bearer(user: &User) -> (actix_web::http::header::HeaderName, String) {
    let token = JwtUtils::generate_access_token(user.id, user.role.as_str()).unwrap();
    (AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! init_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone() as Arc<dyn Storage>))
                .app_data(web::PathConfig::default().error_handler(path_error_handler))
                .configure(routes::configure_progress_routes)
                .configure(routes::configure_assignment_routes)
                .configure(routes::configure_certificate_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_progress_requires_token() {
    let fx = Fixture::new(1).await;
    let app = init_app!(fx.storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/progress/course/{}", fx.course.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_initialize_then_initialize_again_conflicts() {
    let fx = Fixture::new(2).await;
    let app = init_app!(fx.storage);
    let uri = format!("/api/progress/initialize/{}", fx.course.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["completion_percentage"], 0);
    assert_eq!(body["data"]["total_sections"], 2);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::ProgressAlreadyExists as i32);
}

#[actix_web::test]
async fn test_get_or_create_is_repeatable() {
    let fx = Fixture::new(1).await;
    let app = init_app!(fx.storage);
    let uri = format!("/api/progress/course/{}", fx.course.id);

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&fx.student))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }
    assert_eq!(ids[0], ids[1]);
}

#[actix_web::test]
async fn test_section_gate_returns_400_with_message() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;
    add_assignment(&fx.storage, section_id, "Lab 1", fx.teacher.id).await;
    let app = init_app!(fx.storage);

    let req = test::TestRequest::post()
        .uri(&format!("/api/progress/section/{}/{}/complete", fx.course.id, section_id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::SectionPrerequisiteNotMet as i32);
    assert_eq!(body["message"], "All assignments must be completed first");
}

#[actix_web::test]
async fn test_video_outside_section_is_not_found() {
    let fx = Fixture::new(2).await;
    let app = init_app!(fx.storage);
    // 第二个章节的视频挂在第一个章节下
    let foreign_video = fx.sections[1].videos[0].id;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/progress/video/{}/{}/{}/complete",
            fx.course.id, fx.sections[0].id, foreign_video
        ))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_unenrolled_student_is_forbidden() {
    let fx = Fixture::new(1).await;
    let outsider = create_user(&fx.storage, "outsider", UserRole::Student).await;
    let app = init_app!(fx.storage);

    let req = test::TestRequest::put()
        .uri(&format!("/api/progress/course/{}", fx.course.id))
        .insert_header(bearer(&outsider))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::NotEnrolled as i32);
}

#[actix_web::test]
async fn test_my_submission_is_null_before_submit() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;
    let app = init_app!(fx.storage);

    let req = test::TestRequest::get()
        .uri(&format!("/api/assignment/{}/my-submission", assignment.id))
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert!(body.get("data").is_some());
    assert!(body["data"].is_null());
}

#[actix_web::test]
async fn test_review_by_teacher_and_validation() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;
    let submission = submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();
    let app = init_app!(fx.storage);
    let uri = format!(
        "/api/assignment/{}/submissions/{}/review",
        assignment.id, submission.id
    );

    // 学生不能批阅
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&fx.student))
        .set_json(serde_json::json!({ "grade": 90, "comment": "self review" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&fx.teacher))
        .set_json(serde_json::json!({ "grade": 101, "comment": "too generous" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::InvalidGrade as i32);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&fx.teacher))
        .set_json(serde_json::json!({ "grade": 88.5, "comment": "  Solid work  " }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["review"]["grade"], 88.5);
    assert_eq!(body["data"]["review"]["comment"], "Solid work");
}

#[actix_web::test]
async fn test_certificate_only_at_full_completion() {
    let fx = Fixture::new(2).await;
    let app = init_app!(fx.storage);
    let uri = format!("/api/certificates/{}", fx.course.id);

    fx.storage
        .mark_section_complete(fx.student.id, fx.course.id, fx.sections[0].id)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::CertificateNotAvailable as i32);
    assert_eq!(body["message"], "Course is not completed yet");

    fx.storage
        .mark_section_complete(fx.student.id, fx.course.id, fx.sections[1].id)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&fx.student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
        "application/pdf"
    );
    let pdf = test::read_body(resp).await;
    assert!(pdf.starts_with(b"%PDF-1.4"));
}

const BOUNDARY: &str = "learnhub-test-boundary";

/// 单个文件字段的 multipart 请求体
fn multipart_body(field: &str, file_name: &str, mime: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn submission_dir() -> PathBuf {
    PathBuf::from(&AppConfig::get().upload.dir).join("submissions")
}

fn stored_upload_count() -> usize {
    std::fs::read_dir(submission_dir())
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn upload_request(student: &User, assignment_id: i64, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/api/assignment/{assignment_id}/submit"))
        .insert_header(bearer(student))
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

/// 校验失败的上传既不落盘也不入库，大小恰好等于上限时可以提交
#[actix_web::test]
async fn test_submit_upload_rejections_and_size_boundary() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Essay", fx.teacher.id).await;
    let app = init_app!(fx.storage);
    let max_size = AppConfig::get().upload.max_size;
    let files_before = stored_upload_count();

    let rejected = [
        (
            "file",
            "report.pdf",
            "application/octet-stream",
            b"%PDF-1.7 body".to_vec(),
            ErrorCode::InvalidFileType,
        ),
        (
            "file",
            "report.exe",
            "application/pdf",
            b"%PDF-1.7 body".to_vec(),
            ErrorCode::InvalidFileType,
        ),
        (
            "file",
            "report.pdf",
            "application/pdf",
            b"MZ not a pdf".to_vec(),
            ErrorCode::InvalidFileType,
        ),
        (
            "file",
            "notes.txt",
            "text/plain",
            vec![b'a'; max_size + 1],
            ErrorCode::FileTooLarge,
        ),
        (
            "attachment",
            "notes.txt",
            "text/plain",
            b"hello".to_vec(),
            ErrorCode::FileNotFound,
        ),
    ];

    for (field, file_name, mime, data, code) in rejected {
        let body = multipart_body(field, file_name, mime, &data);
        let req = upload_request(&fx.student, assignment.id, body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{file_name} as {mime}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], code as i32, "{file_name} as {mime}");

        let stored = fx
            .storage
            .get_user_submission(assignment.id, fx.student.id)
            .await
            .unwrap();
        assert!(stored.is_none());
        assert_eq!(stored_upload_count(), files_before);
    }

    let progress = fx
        .storage
        .get_progress(fx.student.id, fx.course.id)
        .await
        .unwrap();
    assert!(progress.is_none_or(|p| !p.assignments_submitted.contains(&assignment.id)));

    // 恰好等于上限的文件可以提交
    let body = multipart_body("file", "notes.txt", "text/plain", &vec![b'a'; max_size]);
    let req = upload_request(&fx.student, assignment.id, body).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "submitted");
    assert_eq!(body["data"]["files"][0]["file_size"], max_size as i64);
    assert_eq!(body["data"]["files"][0]["original_name"], "notes.txt");

    let stored = fx
        .storage
        .get_user_submission(assignment.id, fx.student.id)
        .await
        .unwrap()
        .expect("submission stored");
    let path = submission_dir().join(&stored.files[0].stored_name);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), max_size as u64);
    assert_eq!(stored_upload_count(), files_before + 1);

    let progress = fx
        .storage
        .get_progress(fx.student.id, fx.course.id)
        .await
        .unwrap()
        .expect("progress created by submission");
    assert!(progress.assignments_submitted.contains(&assignment.id));

    std::fs::remove_file(path).unwrap();
}

