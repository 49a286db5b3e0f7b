//! Records served by the school-management backend.
//!
//! Field names follow the backend's camelCase JSON. Ids arrive as either
//! `id` or `_id`. Everything optional on the wire is optional here, so a
//! sparse record never fails the whole list.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every resource the backend exposes, with its REST collection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Class,
    Teacher,
    Student,
    Course,
    Subject,
    Term,
    Timetable,
    Assessment,
    Announcement,
    Complaint,
    LeaveRequest,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::Class,
        ResourceKind::Teacher,
        ResourceKind::Student,
        ResourceKind::Course,
        ResourceKind::Subject,
        ResourceKind::Term,
        ResourceKind::Timetable,
        ResourceKind::Assessment,
        ResourceKind::Announcement,
        ResourceKind::Complaint,
        ResourceKind::LeaveRequest,
    ];

    /// Collection path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Class => "/classes",
            ResourceKind::Teacher => "/teachers",
            ResourceKind::Student => "/students",
            ResourceKind::Course => "/courses",
            ResourceKind::Subject => "/subjects",
            ResourceKind::Term => "/terms",
            ResourceKind::Timetable => "/timetable",
            ResourceKind::Assessment => "/assessments",
            ResourceKind::Announcement => "/announcements",
            ResourceKind::Complaint => "/complaints",
            ResourceKind::LeaveRequest => "/leave-requests",
        }
    }

    /// Singular human-readable name, used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Class => "class",
            ResourceKind::Teacher => "teacher",
            ResourceKind::Student => "student",
            ResourceKind::Course => "course",
            ResourceKind::Subject => "subject",
            ResourceKind::Term => "term",
            ResourceKind::Timetable => "timetable entry",
            ResourceKind::Assessment => "assessment",
            ResourceKind::Announcement => "announcement",
            ResourceKind::Complaint => "complaint",
            ResourceKind::LeaveRequest => "leave request",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "class" | "classes" => Ok(ResourceKind::Class),
            "teacher" | "teachers" => Ok(ResourceKind::Teacher),
            "student" | "students" => Ok(ResourceKind::Student),
            "course" | "courses" => Ok(ResourceKind::Course),
            "subject" | "subjects" => Ok(ResourceKind::Subject),
            "term" | "terms" => Ok(ResourceKind::Term),
            "timetable" | "timetables" => Ok(ResourceKind::Timetable),
            "assessment" | "assessments" => Ok(ResourceKind::Assessment),
            "announcement" | "announcements" => Ok(ResourceKind::Announcement),
            "complaint" | "complaints" => Ok(ResourceKind::Complaint),
            "leave" | "leave-request" | "leave-requests" => Ok(ResourceKind::LeaveRequest),
            other => Err(format!("unknown resource: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Assessments
// ---------------------------------------------------------------------------

/// Lifecycle status of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl AssessmentStatus {
    pub const ALL: [AssessmentStatus; 4] = [
        AssessmentStatus::Pending,
        AssessmentStatus::Active,
        AssessmentStatus::Completed,
        AssessmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Pending => "pending",
            AssessmentStatus::Active => "active",
            AssessmentStatus::Completed => "completed",
            AssessmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(AssessmentStatus::Pending),
            "active" => Ok(AssessmentStatus::Active),
            "completed" => Ok(AssessmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AssessmentStatus::Cancelled),
            other => Err(ValidationError::InvalidField {
                field: "Status".into(),
                reason: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// A school-defined evaluation period (e.g. an exam window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub term_id: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(with = "crate::serde_dates")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::serde_dates")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub created_by: String,
}

// ---------------------------------------------------------------------------
// Timetable
// ---------------------------------------------------------------------------

/// School day. Weekends exist on the wire but are not part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// The days shown on the timetable grid.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" | "tues" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" | "thurs" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            "sunday" | "sun" => Ok(Day::Sunday),
            other => Err(format!("unknown day: {other}")),
        }
    }
}

/// A scheduled session for a class on a given day and time range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    /// Backend id, only needed to delete the entry.
    #[serde(flatten, with = "crate::record_id::option")]
    pub id: Option<String>,
    #[serde(deserialize_with = "deserialize_day")]
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub class_id: String,
}

fn deserialize_day<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Day, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// Reference records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_teacher_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admission_number: Option<String>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// An academic sub-period (e.g. "First Term") under an academic year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default, with = "crate::serde_dates::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "crate::serde_dates::option")]
    pub end_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Communication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintStatus::Open => write!(f, "open"),
            ComplaintStatus::InProgress => write!(f, "in-progress"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ComplaintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(with = "crate::serde_dates")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::serde_dates")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: LeaveStatus,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// The logged-in administrator, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten, with = "crate::record_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}
