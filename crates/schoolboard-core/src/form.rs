//! Generic resource forms.
//!
//! Every create/edit form in the dashboard has the same shape: a fixed set of
//! fields, a required-field check, one request, and a success or failure
//! message. A [`FormSpec`] describes the fields of one resource; [`submit`]
//! validates user input against it and sends a single create or update.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

use crate::assessment::validate_assessment_dates;
use crate::error::{SubmitError, ValidationError};
use crate::model::ResourceKind;
use crate::serde_dates::parse_date;
use crate::session::Session;
use crate::timetable::parse_time;
use crate::traits::SchoolApi;

/// How a field's raw text is checked and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM`
    Time,
    Number,
    /// One of a fixed set of lowercase values.
    Choice(&'static [&'static str]),
    /// Id of another record.
    Reference(ResourceKind),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON key sent to the backend.
    pub name: &'static str,
    /// Label used in messages.
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
    }
}

/// The form for one resource.
#[derive(Debug, Clone, Copy)]
pub struct FormSpec {
    pub kind: ResourceKind,
    pub fields: &'static [FieldSpec],
    pub date_rule: Option<DateRule>,
}

/// Cross-field check between a start and an end date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// End may not precede start; same day is fine.
    Ordered {
        start: &'static str,
        end: &'static str,
    },
    /// The assessment window rule: end strictly after start, start not in
    /// the past. Edits only check the ordering.
    AssessmentWindow {
        start: &'static str,
        end: &'static str,
    },
}

const START_END: (&str, &str) = ("startDate", "endDate");

const DAYS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];
const ASSESSMENT_STATUSES: &[&str] = &["pending", "active", "completed", "cancelled"];
const COMPLAINT_STATUSES: &[&str] = &["open", "in-progress", "resolved"];
const LEAVE_STATUSES: &[&str] = &["pending", "approved", "rejected"];

static CLASS_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("gradeLevel", "Grade level", FieldKind::Text, false),
    field(
        "classTeacherId",
        "Class teacher",
        FieldKind::Reference(ResourceKind::Teacher),
        false,
    ),
];

static TEACHER_FIELDS: &[FieldSpec] = &[
    field("firstName", "First name", FieldKind::Text, true),
    field("lastName", "Last name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, true),
    field("phone", "Phone", FieldKind::Text, false),
];

static STUDENT_FIELDS: &[FieldSpec] = &[
    field("firstName", "First name", FieldKind::Text, true),
    field("lastName", "Last name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, false),
    field(
        "classId",
        "Class",
        FieldKind::Reference(ResourceKind::Class),
        true,
    ),
    field("admissionNumber", "Admission number", FieldKind::Text, false),
];

static COURSE_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("code", "Code", FieldKind::Text, true),
    field(
        "subjectId",
        "Subject",
        FieldKind::Reference(ResourceKind::Subject),
        false,
    ),
];

static SUBJECT_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("code", "Code", FieldKind::Text, false),
];

static TERM_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("academicYear", "Academic year", FieldKind::Text, true),
    field("startDate", "Start date", FieldKind::Date, true),
    field("endDate", "End date", FieldKind::Date, true),
];

static TIMETABLE_FIELDS: &[FieldSpec] = &[
    field("day", "Day", FieldKind::Choice(DAYS), true),
    field("startTime", "Start time", FieldKind::Time, true),
    field("endTime", "End time", FieldKind::Time, true),
    field(
        "courseId",
        "Course",
        FieldKind::Reference(ResourceKind::Course),
        true,
    ),
    field(
        "subjectId",
        "Subject",
        FieldKind::Reference(ResourceKind::Subject),
        true,
    ),
    field(
        "classId",
        "Class",
        FieldKind::Reference(ResourceKind::Class),
        true,
    ),
];

static ASSESSMENT_FIELDS: &[FieldSpec] = &[
    field("name", "Name", FieldKind::Text, true),
    field("description", "Description", FieldKind::Text, false),
    field(
        "termId",
        "Term",
        FieldKind::Reference(ResourceKind::Term),
        true,
    ),
    field("startDate", "Start date", FieldKind::Date, true),
    field("endDate", "End date", FieldKind::Date, true),
    field("status", "Status", FieldKind::Choice(ASSESSMENT_STATUSES), false),
];

static ANNOUNCEMENT_FIELDS: &[FieldSpec] = &[
    field("title", "Title", FieldKind::Text, true),
    field("content", "Content", FieldKind::Text, true),
    field("audience", "Audience", FieldKind::Text, false),
];

static COMPLAINT_FIELDS: &[FieldSpec] = &[
    field("subject", "Subject", FieldKind::Text, true),
    field("description", "Description", FieldKind::Text, true),
    field("status", "Status", FieldKind::Choice(COMPLAINT_STATUSES), false),
];

static LEAVE_FIELDS: &[FieldSpec] = &[
    field(
        "teacherId",
        "Teacher",
        FieldKind::Reference(ResourceKind::Teacher),
        false,
    ),
    field("reason", "Reason", FieldKind::Text, true),
    field("startDate", "Start date", FieldKind::Date, true),
    field("endDate", "End date", FieldKind::Date, true),
    field("status", "Status", FieldKind::Choice(LEAVE_STATUSES), false),
];

impl FormSpec {
    /// The form describing `kind`.
    pub fn for_kind(kind: ResourceKind) -> FormSpec {
        let ordered = Some(DateRule::Ordered {
            start: START_END.0,
            end: START_END.1,
        });
        let (fields, date_rule) = match kind {
            ResourceKind::Class => (CLASS_FIELDS, None),
            ResourceKind::Teacher => (TEACHER_FIELDS, None),
            ResourceKind::Student => (STUDENT_FIELDS, None),
            ResourceKind::Course => (COURSE_FIELDS, None),
            ResourceKind::Subject => (SUBJECT_FIELDS, None),
            ResourceKind::Term => (TERM_FIELDS, ordered),
            ResourceKind::Timetable => (TIMETABLE_FIELDS, None),
            ResourceKind::Assessment => (
                ASSESSMENT_FIELDS,
                Some(DateRule::AssessmentWindow {
                    start: START_END.0,
                    end: START_END.1,
                }),
            ),
            ResourceKind::Announcement => (ANNOUNCEMENT_FIELDS, None),
            ResourceKind::Complaint => (COMPLAINT_FIELDS, None),
            ResourceKind::LeaveRequest => (LEAVE_FIELDS, ordered),
        };
        FormSpec {
            kind,
            fields,
            date_rule,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate raw input and encode it as a JSON body.
    ///
    /// With `partial` set (edits), missing required fields are allowed and
    /// only the supplied fields are checked and sent. All problems are
    /// reported together. `today` feeds the assessment window rule.
    pub fn validate(
        &self,
        values: &FormValues,
        partial: bool,
        today: NaiveDate,
    ) -> Result<Map<String, Value>, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut body = Map::new();

        for key in values.keys() {
            if self.field(key).is_none() {
                errors.push(ValidationError::UnknownField(key.to_string()));
            }
        }

        for spec in self.fields {
            let raw = values.get(spec.name).map(str::trim).unwrap_or_default();
            if raw.is_empty() {
                if spec.required && !partial {
                    errors.push(ValidationError::MissingField {
                        field: spec.label.to_string(),
                    });
                }
                continue;
            }
            match encode_field(spec, raw) {
                Ok(value) => {
                    body.insert(spec.name.to_string(), value);
                }
                Err(reason) => errors.push(ValidationError::InvalidField {
                    field: spec.label.to_string(),
                    reason,
                }),
            }
        }

        if let Some(rule) = self.date_rule {
            if let Err(e) = check_date_rule(rule, values, partial, today) {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(body)
        } else {
            Err(errors)
        }
    }
}

fn check_date_rule(
    rule: DateRule,
    values: &FormValues,
    partial: bool,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let (start_key, end_key) = match rule {
        DateRule::Ordered { start, end } | DateRule::AssessmentWindow { start, end } => {
            (start, end)
        }
    };
    let start = values.get(start_key).and_then(parse_date);
    let end = values.get(end_key).and_then(parse_date);
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(());
    };

    match rule {
        DateRule::Ordered { .. } if end < start => Err(ValidationError::EndBeforeStart),
        DateRule::Ordered { .. } => Ok(()),
        DateRule::AssessmentWindow { .. } if partial => {
            if start >= end {
                Err(ValidationError::EndNotAfterStart)
            } else {
                Ok(())
            }
        }
        DateRule::AssessmentWindow { .. } => validate_assessment_dates(start, end, today),
    }
}

fn encode_field(spec: &FieldSpec, raw: &str) -> Result<Value, String> {
    match spec.kind {
        FieldKind::Text | FieldKind::Reference(_) => Ok(Value::String(raw.to_string())),
        FieldKind::Email => {
            if is_plausible_email(raw) {
                Ok(Value::String(raw.to_string()))
            } else {
                Err(format!("'{raw}' is not a valid email address"))
            }
        }
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| format!("'{raw}' is not a date (expected YYYY-MM-DD)")),
        FieldKind::Time => parse_time(raw)
            .map(|t| Value::String(t.format("%H:%M").to_string()))
            .ok_or_else(|| format!("'{raw}' is not a time (expected HH:MM)")),
        FieldKind::Number => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("'{raw}' is not a number")),
        FieldKind::Choice(options) => {
            let lowered = raw.to_lowercase();
            if options.contains(&lowered.as_str()) {
                Ok(Value::String(lowered))
            } else {
                Err(format!("must be one of: {}", options.join(", ")))
            }
        }
    }
}

fn is_plausible_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !s.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|part| !part.is_empty())
}

/// Raw user input, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `key=value` pairs as given on a command line.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = FormValues::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ValidationError::InvalidField {
                    field: pair.to_string(),
                    reason: "expected key=value".into(),
                })?;
            values.insert(key.trim(), value);
        }
        Ok(values)
    }
}

/// Whether a submission creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update(String),
}

/// Validate `values` against the resource's form and send one request.
///
/// Validation failures never reach the network. There is no retry and no
/// idempotency key: resubmitting after a failure may create duplicates.
pub async fn submit(
    api: &dyn SchoolApi,
    session: &Session,
    kind: ResourceKind,
    values: &FormValues,
    mode: SubmitMode,
) -> Result<Value, SubmitError> {
    let spec = FormSpec::for_kind(kind);
    let partial = matches!(mode, SubmitMode::Update(_));
    let today = Local::now().date_naive();
    let body = spec
        .validate(values, partial, today)
        .map_err(SubmitError::Invalid)?;

    let record = match mode {
        SubmitMode::Create => api.create(session, kind, &body).await?,
        SubmitMode::Update(id) => api.update(session, kind, &id, &body).await?,
    };
    tracing::info!(resource = %kind, "saved");
    Ok(record)
}
