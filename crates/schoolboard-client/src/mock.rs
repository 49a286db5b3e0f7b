//! In-memory backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use schoolboard_core::error::ApiError;
use schoolboard_core::model::{ResourceKind, UserProfile};
use schoolboard_core::session::Session;
use schoolboard_core::traits::{Credentials, SchoolApi};

/// A mock backend that stores records per resource in memory.
///
/// Accepts a single set of credentials, assigns `_id`s on create, and
/// filters lists by exact field equality on query parameters.
pub struct MockBackend {
    records: Mutex<HashMap<ResourceKind, Vec<Value>>>,
    credentials: Credentials,
    user: UserProfile,
    /// Number of calls that reached the backend.
    call_count: AtomicU32,
    /// When set, every data call fails with this status and message.
    failure: Mutex<Option<(u16, String)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            credentials: Credentials {
                email: "admin@school.test".into(),
                password: "password".into(),
            },
            user: UserProfile {
                id: "admin-1".into(),
                name: "Test Admin".into(),
                email: "admin@school.test".into(),
                role: "admin".into(),
                school_id: Some("school-1".into()),
            },
            call_count: AtomicU32::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Seed a collection.
    pub fn with_records(self, kind: ResourceKind, records: Vec<Value>) -> Self {
        self.lock_records().insert(kind, records);
        self
    }

    /// Make every subsequent data call fail with `status`.
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) =
            Some((status, message.to_string()));
    }

    /// A live session for the built-in user, without going through login.
    pub fn session(&self) -> Session {
        Session::new("mock-token", self.user.clone(), None)
    }

    /// Get the number of calls made to this backend.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Current contents of a collection.
    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        self.lock_records().get(&kind).cloned().unwrap_or_default()
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<ResourceKind, Vec<Value>>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enter(&self, session: &Session) -> Result<(), ApiError> {
        session.bearer_token()?;
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some((status, message)) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(ApiError::Api { status, message });
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record
        .get("_id")
        .or_else(|| record.get("id"))
        .and_then(Value::as_str)
}

fn not_found(kind: ResourceKind, id: &str) -> ApiError {
    ApiError::NotFound(format!("{kind} {id} not found"))
}

#[async_trait]
impl SchoolApi for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if credentials.email != self.credentials.email
            || credentials.password != self.credentials.password
        {
            return Err(ApiError::Unauthorized("Invalid email or password".into()));
        }
        Ok(Session::from_login(
            format!("mock-{}", Uuid::new_v4()),
            self.user.clone(),
            Some(3600),
            Utc::now(),
        ))
    }

    async fn list(
        &self,
        session: &Session,
        kind: ResourceKind,
        query: &[(&str, &str)],
    ) -> Result<Vec<Value>, ApiError> {
        self.enter(session)?;
        let records = self.records(kind);
        Ok(records
            .into_iter()
            .filter(|r| {
                query
                    .iter()
                    .all(|(key, value)| r.get(*key).and_then(Value::as_str) == Some(*value))
            })
            .collect())
    }

    async fn get(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<Value, ApiError> {
        self.enter(session)?;
        self.records(kind)
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found(kind, id))
    }

    async fn create(
        &self,
        session: &Session,
        kind: ResourceKind,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.enter(session)?;
        let mut record = body.clone();
        record.insert("_id".into(), Value::String(Uuid::new_v4().to_string()));
        let record = Value::Object(record);
        self.lock_records()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        session: &Session,
        kind: ResourceKind,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        self.enter(session)?;
        let mut records = self.lock_records();
        let record = records
            .get_mut(&kind)
            .and_then(|rs| rs.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(kind, id))?;
        if let Value::Object(map) = &mut *record {
            for (k, v) in body {
                map.insert(k.clone(), v.clone());
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        self.enter(session)?;
        let mut records = self.lock_records();
        let collection = records.entry(kind).or_default();
        let before = collection.len();
        collection.retain(|r| record_id(r) != Some(id));
        if collection.len() == before {
            return Err(not_found(kind, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn login_checks_credentials() {
        let backend = MockBackend::new();
        let session = backend
            .login(&Credentials {
                email: "admin@school.test".into(),
                password: "password".into(),
            })
            .await
            .unwrap();
        assert!(session.access_token.starts_with("mock-"));
        assert!(session.expires_at.is_some());

        let err = backend
            .login(&Credentials {
                email: "admin@school.test".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn crud_roundtrip() {
        let backend = MockBackend::new();
        let session = backend.session();

        let mut body = Map::new();
        body.insert("name".into(), json!("Grade 7A"));
        let created = backend
            .create(&session, ResourceKind::Class, &body)
            .await
            .unwrap();
        let id = record_id(&created).unwrap().to_string();

        let mut patch = Map::new();
        patch.insert("gradeLevel".into(), json!("7"));
        let updated = backend
            .update(&session, ResourceKind::Class, &id, &patch)
            .await
            .unwrap();
        assert_eq!(updated["name"], "Grade 7A");
        assert_eq!(updated["gradeLevel"], "7");

        backend
            .delete(&session, ResourceKind::Class, &id)
            .await
            .unwrap();
        assert!(backend.records(ResourceKind::Class).is_empty());
        assert!(matches!(
            backend.get(&session, ResourceKind::Class, &id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_query() {
        let backend = MockBackend::new().with_records(
            ResourceKind::Timetable,
            vec![
                json!({"day": "Monday", "classId": "k1"}),
                json!({"day": "Monday", "classId": "k2"}),
            ],
        );
        let rows = backend
            .list(&backend.session(), ResourceKind::Timetable, &[("classId", "k2")])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn injected_failure() {
        let backend = MockBackend::new();
        backend.fail_with(503, "maintenance");
        let err = backend
            .list(&backend.session(), ResourceKind::Class, &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }
}
