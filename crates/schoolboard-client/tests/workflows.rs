//! Form submission and status workflows against the in-memory backend.

use chrono::{Duration, Local, NaiveDate};
use serde_json::json;

use schoolboard_client::MockBackend;
use schoolboard_core::assessment::AssessmentDraft;
use schoolboard_core::error::{ApiError, SubmitError, ValidationError};
use schoolboard_core::form::{submit, FormValues, SubmitMode};
use schoolboard_core::model::{Assessment, AssessmentStatus, Class, ResourceKind};
use schoolboard_core::traits::{
    create_assessment, fetch_all, fetch_one, set_assessment_status, StatusChangeError,
};

fn future(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn assessment(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": "Mid-term",
        "termId": "t1",
        "schoolId": "school-1",
        "startDate": future(5),
        "endDate": future(10),
        "status": status,
        "createdBy": "admin-1"
    })
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let backend = MockBackend::new();
    let session = backend.session();

    let err = submit(
        &backend,
        &session,
        ResourceKind::Student,
        &FormValues::new().set("firstName", "Ada"),
        SubmitMode::Create,
    )
    .await
    .unwrap_err();

    assert_eq!(err.validation_errors().len(), 2);
    assert_eq!(backend.call_count(), 0);
    assert!(backend.records(ResourceKind::Student).is_empty());
}

#[tokio::test]
async fn valid_form_creates_one_record() {
    let backend = MockBackend::new();
    let session = backend.session();

    let record = submit(
        &backend,
        &session,
        ResourceKind::Class,
        &FormValues::new().set("name", "Grade 7A").set("gradeLevel", "7"),
        SubmitMode::Create,
    )
    .await
    .unwrap();
    assert_eq!(record["name"], "Grade 7A");
    assert_eq!(backend.call_count(), 1);

    let classes: Vec<Class> = fetch_all(&backend, &session).await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].grade_level.as_deref(), Some("7"));
}

#[tokio::test]
async fn assessment_in_the_past_is_refused_locally() {
    let backend = MockBackend::new();
    let values = FormValues::new()
        .set("name", "Finals")
        .set("termId", "t1")
        .set("startDate", future(-3))
        .set("endDate", future(4));

    let err = submit(
        &backend,
        &backend.session(),
        ResourceKind::Assessment,
        &values,
        SubmitMode::Create,
    )
    .await
    .unwrap_err();
    assert_eq!(err.validation_errors(), &[ValidationError::StartInPast]);
    assert_eq!(err.to_string(), "Start date cannot be in the past.");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn backend_failure_is_reported_not_retried() {
    let backend = MockBackend::new();
    backend.fail_with(409, "Class name already exists");

    let err = submit(
        &backend,
        &backend.session(),
        ResourceKind::Class,
        &FormValues::new().set("name", "Grade 7A"),
        SubmitMode::Create,
    )
    .await
    .unwrap_err();

    match err {
        SubmitError::Api(ApiError::Api { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Class name already exists");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn edit_sends_only_supplied_fields() {
    let backend = MockBackend::new().with_records(
        ResourceKind::Class,
        vec![json!({"_id": "k1", "name": "Grade 7A", "gradeLevel": "7"})],
    );
    let session = backend.session();

    submit(
        &backend,
        &session,
        ResourceKind::Class,
        &FormValues::new().set("name", "Grade 7 Alpha"),
        SubmitMode::Update("k1".into()),
    )
    .await
    .unwrap();

    let class: Class = fetch_one(&backend, &session, "k1").await.unwrap();
    assert_eq!(class.name, "Grade 7 Alpha");
    assert_eq!(class.grade_level.as_deref(), Some("7"));
}

#[tokio::test]
async fn assessment_lifecycle() {
    let backend = MockBackend::new().with_records(
        ResourceKind::Assessment,
        vec![assessment("a1", "pending")],
    );
    let session = backend.session();

    let pending: Assessment = fetch_one(&backend, &session, "a1").await.unwrap();
    let active = set_assessment_status(&backend, &session, &pending, AssessmentStatus::Active, false)
        .await
        .unwrap();
    assert_eq!(active.status, AssessmentStatus::Active);

    // active cannot go back to pending unless forced
    let err = set_assessment_status(&backend, &session, &active, AssessmentStatus::Pending, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StatusChangeError::Invalid(ValidationError::IllegalTransition { .. })
    ));

    let forced = set_assessment_status(&backend, &session, &active, AssessmentStatus::Pending, true)
        .await
        .unwrap();
    assert_eq!(forced.status, AssessmentStatus::Pending);
}

#[tokio::test]
async fn reselecting_status_is_a_no_op() {
    let backend = MockBackend::new().with_records(
        ResourceKind::Assessment,
        vec![assessment("a1", "active")],
    );
    let session = backend.session();
    let active: Assessment = fetch_one(&backend, &session, "a1").await.unwrap();
    let calls = backend.call_count();

    let same = set_assessment_status(&backend, &session, &active, AssessmentStatus::Active, false)
        .await
        .unwrap();
    assert_eq!(same, active);
    assert_eq!(backend.call_count(), calls);
}

#[tokio::test]
async fn malformed_record_fails_typed_fetch() {
    let backend = MockBackend::new().with_records(
        ResourceKind::Class,
        vec![json!({"_id": "k1", "name": "Grade 7A"}), json!({"_id": "k2"})],
    );
    let err = fetch_all::<Class>(&backend, &backend.session())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn assessment_draft_carries_session_identity() {
    let backend = MockBackend::new();
    let session = backend.session();
    let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let draft = AssessmentDraft {
        name: "Spring exams".into(),
        term_id: "t2".into(),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 10),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 20),
        ..AssessmentDraft::default()
    };

    let created = create_assessment(&backend, &session, &draft, today)
        .await
        .unwrap();
    assert_eq!(created.status, AssessmentStatus::Pending);
    assert_eq!(created.school_id, "school-1");
    assert_eq!(created.created_by, "admin-1");
    assert_eq!(backend.records(ResourceKind::Assessment).len(), 1);

    let backwards = AssessmentDraft {
        end_date: NaiveDate::from_ymd_opt(2026, 3, 10),
        ..draft
    };
    let err = create_assessment(&backend, &session, &backwards, today)
        .await
        .unwrap_err();
    assert_eq!(err.validation_errors(), &[ValidationError::EndNotAfterStart]);
    assert_eq!(backend.records(ResourceKind::Assessment).len(), 1);
}
