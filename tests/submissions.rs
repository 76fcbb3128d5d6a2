mod common;

use common::{Fixture, add_assignment, create_user, submit, text_file};
use rust_learnhub::errors::LearnHubError;
use rust_learnhub::models::submissions::entities::SubmissionStatus;
use rust_learnhub::models::users::entities::UserRole;

#[tokio::test]
async fn test_submit_records_assignment_progress() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;

    let submission = submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();
    assert_eq!(submission.status(), SubmissionStatus::Submitted);
    assert_eq!(submission.files.len(), 1);
    assert_eq!(submission.files[0].original_name, "answer.txt");

    let progress = fx
        .storage
        .get_progress(fx.student.id, fx.course.id)
        .await
        .unwrap()
        .expect("progress created by submission");
    assert!(progress.assignments_submitted.contains(&assignment.id));
}

#[tokio::test]
async fn test_second_submit_conflicts_without_resubmit() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;

    submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();
    let second = submit(&fx.storage, &assignment, fx.student.id, false).await;

    assert!(matches!(second, Err(LearnHubError::Conflict(_))));
}

#[tokio::test]
async fn test_resubmit_replaces_files_until_reviewed() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;

    let first = submit(&fx.storage, &assignment, fx.student.id, true).await.unwrap();
    let (second, replaced) = fx
        .storage
        .create_submission(&assignment, fx.student.id, vec![text_file("v2.txt")], true)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(replaced, vec!["stored-answer.txt".to_string()]);
    assert_eq!(second.files.len(), 1);
    assert_eq!(second.files[0].original_name, "v2.txt");

    fx.storage
        .review_submission(second.id, fx.teacher.id, 80.0, "Good".to_string())
        .await
        .unwrap();
    let after_review = submit(&fx.storage, &assignment, fx.student.id, true).await;
    assert!(matches!(after_review, Err(LearnHubError::Conflict(_))));
}

#[tokio::test]
async fn test_review_overwrites_previous_review() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;
    let submission = submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();

    fx.storage
        .review_submission(submission.id, fx.teacher.id, 60.0, "Needs work".to_string())
        .await
        .unwrap();
    let reviewed = fx
        .storage
        .review_submission(submission.id, fx.teacher.id, 95.0, "Much better".to_string())
        .await
        .unwrap();

    let review = reviewed.review.as_ref().expect("review present");
    assert_eq!(review.grade, 95.0);
    assert_eq!(review.comment, "Much better");
    assert_eq!(review.reviewed_by, fx.teacher.id);
    assert_eq!(reviewed.status(), SubmissionStatus::Reviewed);

    let stored = fx
        .storage
        .get_user_submission(assignment.id, fx.student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.review.map(|r| r.comment), Some("Much better".to_string()));
}

#[tokio::test]
async fn test_my_submission_is_none_before_submit() {
    let fx = Fixture::new(1).await;
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;

    let mine = fx
        .storage
        .get_user_submission(assignment.id, fx.student.id)
        .await
        .unwrap();
    assert!(mine.is_none());
}

#[tokio::test]
async fn test_list_submissions_includes_students() {
    let fx = Fixture::new(1).await;
    let other = create_user(&fx.storage, "other", UserRole::Student).await;
    fx.storage.enroll_student(fx.course.id, other.id).await.unwrap();
    let assignment = add_assignment(&fx.storage, fx.sections[0].id, "Lab 1", fx.teacher.id).await;

    submit(&fx.storage, &assignment, fx.student.id, false).await.unwrap();
    submit(&fx.storage, &assignment, other.id, false).await.unwrap();

    let items = fx
        .storage
        .list_assignment_submissions(assignment.id)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
}

/// 一个章节两份作业的完整流程
#[tokio::test]
async fn test_end_to_end_single_section_two_assignments() {
    let fx = Fixture::new(1).await;
    let section_id = fx.sections[0].id;
    let a1 = add_assignment(&fx.storage, section_id, "Part A", fx.teacher.id).await;
    let a2 = add_assignment(&fx.storage, section_id, "Part B", fx.teacher.id).await;

    let progress = fx
        .storage
        .initialize_progress(fx.student.id, fx.course.id)
        .await
        .unwrap();
    assert_eq!(progress.completion_percentage(&fx.section_ids()), 0);

    submit(&fx.storage, &a1, fx.student.id, false).await.unwrap();
    assert!(
        fx.storage
            .mark_section_complete(fx.student.id, fx.course.id, section_id)
            .await
            .is_err()
    );

    submit(&fx.storage, &a2, fx.student.id, false).await.unwrap();
    let progress = fx
        .storage
        .mark_section_complete(fx.student.id, fx.course.id, section_id)
        .await
        .unwrap();

    assert_eq!(progress.completion_percentage(&fx.section_ids()), 100);
    assert!(progress.is_course_complete(&fx.section_ids()));
}
