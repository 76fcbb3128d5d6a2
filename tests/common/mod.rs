//! 集成测试公共夹具：内存 SQLite 上的存储层与一门预置课程

#![allow(dead_code)]

use std::sync::Arc;

use rust_learnhub::models::assignments::{Assignment, CreateAssignmentRequest};
use rust_learnhub::models::courses::entities::{Course, Section};
use rust_learnhub::models::courses::requests::{
    CreateCourseRequest, CreateSectionRequest, NewResource, NewVideo,
};
use rust_learnhub::models::organizations::CreateOrganizationRequest;
use rust_learnhub::models::submissions::entities::{NewSubmissionFile, Submission};
use rust_learnhub::models::users::entities::{User, UserRole};
use rust_learnhub::models::users::requests::CreateUserRequest;
use rust_learnhub::storage::Storage;
use rust_learnhub::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::{ConnectOptions, Database};

/// 单连接内存库，多连接时每个连接各自是一个空库
pub async fn memory_storage() -> Arc<dyn Storage> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect sqlite::memory:");
    let storage = SeaOrmStorage::from_connection(db)
        .await
        .expect("run migrations");
    Arc::new(storage)
}

pub async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
            organization_id: None,
        })
        .await
        .expect("create user")
}

pub fn new_section(name: &str, videos: &[&str]) -> CreateSectionRequest {
    CreateSectionRequest {
        name: name.to_string(),
        description: None,
        position: None,
        videos: videos
            .iter()
            .map(|title| NewVideo {
                title: title.to_string(),
                url: format!("https://videos.example.com/{title}"),
            })
            .collect(),
        resources: vec![NewResource {
            name: format!("{name} notes"),
            link: "https://docs.example.com/notes".to_string(),
        }],
    }
}

pub async fn add_assignment(
    storage: &Arc<dyn Storage>,
    section_id: i64,
    title: &str,
    teacher_id: i64,
) -> Assignment {
    storage
        .create_assignment(
            section_id,
            CreateAssignmentRequest {
                title: title.to_string(),
                description: None,
                due_date: None,
                assignment_links: Vec::new(),
            },
            teacher_id,
        )
        .await
        .expect("create assignment")
}

pub fn text_file(name: &str) -> NewSubmissionFile {
    NewSubmissionFile {
        stored_name: format!("stored-{name}"),
        original_name: name.to_string(),
        mime_type: "text/plain".to_string(),
        file_size: 12,
    }
}

pub async fn submit(
    storage: &Arc<dyn Storage>,
    assignment: &Assignment,
    student_id: i64,
    allow_resubmit: bool,
) -> rust_learnhub::errors::Result<Submission> {
    storage
        .create_submission(
            assignment,
            student_id,
            vec![text_file("answer.txt")],
            allow_resubmit,
        )
        .await
        .map(|(submission, _)| submission)
}

/// 一门课：教师、已选课学生、若干章节
pub struct Fixture {
    pub storage: Arc<dyn Storage>,
    pub teacher: User,
    pub student: User,
    pub course: Course,
    pub sections: Vec<Section>,
}

impl Fixture {
    /// `section_count` 个章节，每个章节带两个视频，不含作业
    pub async fn new(section_count: usize) -> Self {
        let storage = memory_storage().await;
        let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
        let student = create_user(&storage, "student", UserRole::Student).await;

        let organization = storage
            .create_organization(CreateOrganizationRequest {
                name: "Test University".to_string(),
                description: None,
            })
            .await
            .expect("create organization");

        let course = storage
            .create_course(
                CreateCourseRequest {
                    organization_id: organization.id,
                    name: "Systems Programming".to_string(),
                    description: Some("Ownership, borrowing and friends".to_string()),
                },
                teacher.id,
            )
            .await
            .expect("create course");

        let mut sections = Vec::with_capacity(section_count);
        for i in 0..section_count {
            let section = storage
                .create_section(course.id, new_section(&format!("Week {}", i + 1), &["intro", "deep-dive"]))
                .await
                .expect("create section");
            sections.push(section);
        }

        storage
            .enroll_student(course.id, student.id)
            .await
            .expect("enroll student");

        Self {
            storage,
            teacher,
            student,
            course,
            sections,
        }
    }

    pub fn section_ids(&self) -> Vec<i64> {
        self.sections.iter().map(|s| s.id).collect()
    }
}
