mod common;

use common::{Fixture, add_assignment, submit};
use rust_learnhub::errors::LearnHubError;
use rust_learnhub::models::progress::ProgressKind;

#[tokio::test]
async fn test_mark_video_complete_is_idempotent() {
    let fx = Fixture::new(1).await;
    let section = &fx.sections[0];
    let video_id = section.videos[0].id;

    let first = fx
        .storage
        .mark_progress_item(fx.student.id, fx.course.id, ProgressKind::Video, section.id, video_id)
        .await
        .unwrap();
    let second = fx
        .storage
        .mark_progress_item(fx.student.id, fx.course.id, ProgressKind::Video, section.id, video_id)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.videos_watched.len(), 1);
    assert!(second.videos_watched.contains(&video_id));
}

#[tokio::test]
async fn test_initialize_twice_is_already_exists() {
    let fx = Fixture::new(1).await;

    fx.storage
        .initialize_progress(fx.student.id, fx.course.id)
        .await
        .unwrap();
    let second = fx
        .storage
        .initialize_progress(fx.student.id, fx.course.id)
        .await;

    assert!(matches!(second, Err(LearnHubError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_get_before_initialize_is_none() {
    let fx = Fixture::new(1).await;
    let progress = fx.storage.get_progress(fx.student.id, fx.course.id).await.unwrap();
    assert!(progress.is_none());
}

#[tokio::test]
async fn test_get_or_create_returns_same_record() {
    let fx = Fixture::new(1).await;

    let first = fx
        .storage
        .get_or_create_progress(fx.student.id, fx.course.id)
        .await
        .unwrap();
    let second = fx
        .storage
        .get_or_create_progress(fx.student.id, fx.course.id)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    // 已初始化后 initialize 仍按已存在处理
    let again = fx.storage.initialize_progress(fx.student.id, fx.course.id).await;
    assert!(matches!(again, Err(LearnHubError::AlreadyExists(_))));
}

#[tokio::test]
async fn test_section_without_assignments_can_complete() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;

    let progress = fx
        .storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap();

    assert!(progress.sections_completed.contains(&section_id));
    assert_eq!(progress.completion_percentage(&fx.section_ids()), 100);
}

#[tokio::test]
async fn test_section_gate_is_checked_against_stored_submissions() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;
    let a1 = add_assignment(&fx.storage, section_id, "Lab 1", fx.teacher.id).await;
    let a2 = add_assignment(&fx.storage, section_id, "Lab 2", fx.teacher.id).await;

    // 没有任何提交
    let err = fx
        .storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap_err();
    assert!(matches!(err, LearnHubError::PreconditionFailed(_)));
    assert_eq!(err.message(), "All assignments must be completed first");

    // 只交了一份
    submit(&fx.storage, &a1, fx.student.id, false).await.unwrap();
    let err = fx
        .storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap_err();
    assert!(matches!(err, LearnHubError::PreconditionFailed(_)));

    // 两份都交齐
    submit(&fx.storage, &a2, fx.student.id, false).await.unwrap();
    let progress = fx
        .storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap();

    assert!(progress.assignments_submitted.contains(&a1.id));
    assert!(progress.assignments_submitted.contains(&a2.id));
    assert!(progress.sections_completed.contains(&section_id));
    assert_eq!(progress.completion_percentage(&fx.section_ids()), 100);
    assert!(progress.is_course_complete(&fx.section_ids()));
}

#[tokio::test]
async fn test_mark_assignment_requires_submission() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;
    let assignment = add_assignment(&fx.storage, section_id, "Essay", fx.teacher.id).await;

    let err = fx
        .storage
        .mark_assignment_complete(fx.student.id, fx.course.id, section_id, assignment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LearnHubError::PreconditionFailed(_)));

    submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();
    let progress = fx
        .storage
        .mark_assignment_complete(fx.student.id, fx.course.id, section_id, assignment.id)
        .await
        .unwrap();
    assert_eq!(progress.assignments_submitted.len(), 1);
}

#[tokio::test]
async fn test_three_of_four_sections_is_seventy_five_percent() {
    let fx = Fixture::new(4).await;

    let mut progress = None;
    for section in &fx.sections[..3] {
        progress = Some(
            fx.storage
                .mark_section_complete(fx.student.id, fx.course.id, section.id)
                .await
                .unwrap(),
        );
    }
    let progress = progress.unwrap();

    assert_eq!(progress.completion_percentage(&fx.section_ids()), 75);
    assert!(!progress.is_course_complete(&fx.section_ids()));
}

#[tokio::test]
async fn test_assignments_are_fixed_once_section_is_completed() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;

    fx.storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap();

    let result = fx
        .storage
        .create_assignment(
            section_id,
            rust_learnhub::models::assignments::CreateAssignmentRequest {
                title: "Late addition".to_string(),
                description: None,
                due_date: None,
                assignment_links: Vec::new(),
            },
            fx.teacher.id,
        )
        .await;
    assert!(matches!(result, Err(LearnHubError::Conflict(_))));
}

#[tokio::test]
async fn test_resources_milestone_is_recorded_per_section() {
    let fx = Fixture::new(2).await;
    let section_id = fx.sections[1].id;

    let progress = fx
        .storage
        .mark_progress_item(
            fx.student.id,
            fx.course.id,
            ProgressKind::Resources,
            section_id,
            section_id,
        )
        .await
        .unwrap();

    assert_eq!(progress.resources_completed.iter().copied().collect::<Vec<_>>(), vec![section_id]);
    assert!(progress.sections_completed.is_empty());
}
