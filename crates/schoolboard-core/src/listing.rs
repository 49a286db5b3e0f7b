//! Search and pagination over already-fetched lists.

use serde::Serialize;
use serde_json::Value;

use crate::model::{
    Announcement, Assessment, Class, Complaint, Course, LeaveRequest, Student, Subject, Teacher,
    Term, TimetableEntry,
};

/// Records that can be filtered by a free-text query.
pub trait Searchable {
    /// The display fields a query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any display field. An empty or
    /// blank query matches everything.
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keep the items matching `query`, in their original order.
pub fn search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query)).collect()
}

/// One page of a list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

/// Slice `items` into the requested 1-based page.
///
/// `page` 0 is treated as 1 and `per_page` 0 as 1. Pages past the end are
/// empty but still report the real totals.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total,
        total_pages,
    }
}

impl Searchable for Class {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.grade_level.as_deref());
        fields
    }
}

impl Searchable for Teacher {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ];
        fields.extend(self.phone.as_deref());
        fields
    }

    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.full_name().to_lowercase().contains(&needle)
            || self
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
    }
}

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.first_name.as_str(), self.last_name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.admission_number.as_deref());
        fields
    }

    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.full_name().to_lowercase().contains(&needle)
            || self
                .search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
    }
}

impl Searchable for Course {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Subject {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }
}

impl Searchable for Term {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.academic_year.as_str()]
    }
}

impl Searchable for Assessment {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.status.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for TimetableEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.day.as_str(),
            self.course_id.as_str(),
            self.subject_id.as_str(),
            self.class_id.as_str(),
        ]
    }
}

impl Searchable for Announcement {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.content.as_str()];
        fields.extend(self.audience.as_deref());
        fields
    }
}

impl Searchable for Complaint {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.subject.as_str(), self.description.as_str()]
    }
}

impl Searchable for LeaveRequest {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.reason.as_str()];
        fields.extend(self.teacher_id.as_deref());
        fields
    }
}

/// Untyped records (generic list views): every top-level string value.
impl Searchable for Value {
    fn search_fields(&self) -> Vec<&str> {
        match self {
            Value::Object(map) => map.values().filter_map(Value::as_str).collect(),
            Value::String(s) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }
}
