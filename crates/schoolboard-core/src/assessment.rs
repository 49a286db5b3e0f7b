//! Assessment lifecycle and client-side date validation.
//!
//! These checks only give immediate feedback; the backend re-validates
//! everything and can be reached directly, bypassing them.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::ValidationError;
use crate::model::AssessmentStatus;
use crate::session::Session;

/// Validate an assessment's date range against `today`.
///
/// Rules, in order: the end must fall strictly after the start, then the
/// start must not be before `today`. Dates carry no time component, so
/// `today` is effectively midnight.
pub fn validate_assessment_dates(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::EndNotAfterStart);
    }
    if start < today {
        return Err(ValidationError::StartInPast);
    }
    Ok(())
}

/// [`validate_assessment_dates`] against the local calendar date.
pub fn validate_assessment_dates_now(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    validate_assessment_dates(start, end, Local::now().date_naive())
}

impl AssessmentStatus {
    /// Statuses reachable from this one by a user action.
    pub fn next_statuses(&self) -> &'static [AssessmentStatus] {
        match self {
            AssessmentStatus::Pending => &[AssessmentStatus::Active, AssessmentStatus::Cancelled],
            AssessmentStatus::Active => &[AssessmentStatus::Completed, AssessmentStatus::Cancelled],
            AssessmentStatus::Completed => &[AssessmentStatus::Cancelled],
            AssessmentStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AssessmentStatus) -> bool {
        *self == next || self.next_statuses().contains(&next)
    }

    /// Check a user-selected status change.
    pub fn transition_to(&self, next: AssessmentStatus) -> Result<AssessmentStatus, ValidationError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ValidationError::IllegalTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    /// Whether the record may still be edited (name, dates, description).
    pub fn is_editable(&self) -> bool {
        matches!(self, AssessmentStatus::Pending)
    }
}

/// User input for a new assessment, before validation.
#[derive(Debug, Clone, Default)]
pub struct AssessmentDraft {
    pub name: String,
    pub description: Option<String>,
    pub term_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: AssessmentStatus,
}

/// Body sent to `POST /assessments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub term_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub school_id: String,
    #[serde(with = "crate::serde_dates")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::serde_dates")]
    pub end_date: NaiveDate,
    pub status: AssessmentStatus,
    pub created_by: String,
}

impl AssessmentDraft {
    /// Validate the draft and build the request body.
    ///
    /// Required-field errors are collected together; the date rule only runs
    /// once both dates are present.
    pub fn validate(
        &self,
        session: &Session,
        today: NaiveDate,
    ) -> Result<NewAssessment, Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "Name".into(),
            });
        }
        if self.term_id.trim().is_empty() {
            errors.push(ValidationError::MissingField {
                field: "Term".into(),
            });
        }
        if self.start_date.is_none() {
            errors.push(ValidationError::MissingField {
                field: "Start date".into(),
            });
        }
        if self.end_date.is_none() {
            errors.push(ValidationError::MissingField {
                field: "End date".into(),
            });
        }

        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return Err(errors);
        };
        if let Err(e) = validate_assessment_dates(start, end, today) {
            errors.push(e);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewAssessment {
            name: self.name.trim().to_string(),
            description: self
                .description
                .as_ref()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            term_id: self.term_id.trim().to_string(),
            school_id: session.user.school_id.clone().unwrap_or_default(),
            start_date: start,
            end_date: end,
            status: self.status,
            created_by: session.user.id.clone(),
        })
    }
}
