//! The backend trait and the typed parsing boundary on top of it.
//!
//! `SchoolApi` speaks untyped JSON that has already been unwrapped from the
//! backend's response envelopes. [`fetch_all`] and friends turn that JSON
//! into model types in one place, so nothing downstream has to guess at
//! response shapes.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use chrono::NaiveDate;

use crate::assessment::AssessmentDraft;
use crate::error::{ApiError, SubmitError, ValidationError};
use crate::model::{
    Announcement, Assessment, AssessmentStatus, Class, Complaint, ComplaintStatus, Course,
    LeaveRequest, LeaveStatus, ResourceKind, Student, Subject, Teacher, Term, TimetableEntry,
};
use crate::session::Session;

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Trait for school-management backends.
///
/// Every call except `login` takes the session explicitly; implementations
/// must refuse an expired session before sending anything.
#[async_trait]
pub trait SchoolApi: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    /// List a collection, optionally filtered by query parameters.
    async fn list(
        &self,
        session: &Session,
        kind: ResourceKind,
        query: &[(&str, &str)],
    ) -> Result<Vec<Value>, ApiError>;

    /// Fetch one record.
    async fn get(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<Value, ApiError>;

    /// Create a record and return it as stored.
    async fn create(
        &self,
        session: &Session,
        kind: ResourceKind,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError>;

    /// Update a record and return it as stored.
    async fn update(
        &self,
        session: &Session,
        kind: ResourceKind,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError>;

    /// Delete a record.
    async fn delete(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<(), ApiError>;
}

/// Login credentials.
///
/// Note: Custom Debug impl masks the password to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Typed boundary
// ---------------------------------------------------------------------------

/// A model type served from one collection endpoint.
pub trait Resource: DeserializeOwned + Send {
    const KIND: ResourceKind;
}

macro_rules! resource {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Resource for $ty {
            const KIND: ResourceKind = ResourceKind::$kind;
        })*
    };
}

resource! {
    Class => Class,
    Teacher => Teacher,
    Student => Student,
    Course => Course,
    Subject => Subject,
    Term => Term,
    TimetableEntry => Timetable,
    Assessment => Assessment,
    Announcement => Announcement,
    Complaint => Complaint,
    LeaveRequest => LeaveRequest,
}

/// Decode one record, naming the resource in the error.
pub fn decode<T: Resource>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Decode(format!("invalid {} record: {e}", T::KIND)))
}

/// Decode a list. One malformed record fails the whole list.
pub fn decode_all<T: Resource>(values: Vec<Value>) -> Result<Vec<T>, ApiError> {
    values.into_iter().map(decode).collect()
}

pub async fn fetch_all<T: Resource>(
    api: &dyn SchoolApi,
    session: &Session,
) -> Result<Vec<T>, ApiError> {
    fetch_filtered(api, session, &[]).await
}

pub async fn fetch_filtered<T: Resource>(
    api: &dyn SchoolApi,
    session: &Session,
    query: &[(&str, &str)],
) -> Result<Vec<T>, ApiError> {
    let values = api.list(session, T::KIND, query).await?;
    decode_all(values)
}

pub async fn fetch_one<T: Resource>(
    api: &dyn SchoolApi,
    session: &Session,
    id: &str,
) -> Result<T, ApiError> {
    decode(api.get(session, T::KIND, id).await?)
}

/// Timetable entries for one class.
pub async fn fetch_timetable(
    api: &dyn SchoolApi,
    session: &Session,
    class_id: &str,
) -> Result<Vec<TimetableEntry>, ApiError> {
    fetch_filtered(api, session, &[("classId", class_id)]).await
}

/// Validate a draft and create the assessment.
///
/// Nothing is sent when validation fails.
pub async fn create_assessment(
    api: &dyn SchoolApi,
    session: &Session,
    draft: &AssessmentDraft,
    today: NaiveDate,
) -> Result<Assessment, SubmitError> {
    let body = draft
        .validate(session, today)
        .map_err(SubmitError::Invalid)?;
    let body = match serde_json::to_value(&body) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            return Err(ApiError::Decode("assessment body is not a JSON object".into()).into())
        }
    };
    let created = api.create(session, ResourceKind::Assessment, &body).await?;
    tracing::info!(name = %draft.name, "assessment created");
    Ok(decode(created)?)
}

/// Errors from a status change: refused locally, or by the backend.
#[derive(Debug, thiserror::Error)]
pub enum StatusChangeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Move an assessment to `next`.
///
/// The lifecycle check runs first unless `force` is set; the backend stays
/// authoritative either way.
pub async fn set_assessment_status(
    api: &dyn SchoolApi,
    session: &Session,
    assessment: &Assessment,
    next: AssessmentStatus,
    force: bool,
) -> Result<Assessment, StatusChangeError> {
    if !force {
        assessment.status.transition_to(next)?;
    }
    if assessment.status == next {
        return Ok(assessment.clone());
    }
    let body = status_body(next.as_str());
    let updated = api
        .update(session, ResourceKind::Assessment, &assessment.id, &body)
        .await?;
    Ok(decode(updated)?)
}

/// Approve or reject a leave request.
pub async fn decide_leave(
    api: &dyn SchoolApi,
    session: &Session,
    id: &str,
    decision: LeaveStatus,
) -> Result<LeaveRequest, ApiError> {
    let body = status_body(&decision.to_string());
    decode(api.update(session, ResourceKind::LeaveRequest, id, &body).await?)
}

/// Set a complaint's status.
pub async fn set_complaint_status(
    api: &dyn SchoolApi,
    session: &Session,
    id: &str,
    status: ComplaintStatus,
) -> Result<Complaint, ApiError> {
    let body = status_body(&status.to_string());
    decode(api.update(session, ResourceKind::Complaint, id, &body).await?)
}

fn status_body(status: &str) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("status".into(), json!(status));
    body
}
