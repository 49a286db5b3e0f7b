//! Display names for timetable cells.

use std::collections::HashMap;

use schoolboard_core::model::{Course, Subject, TimetableEntry};

/// Course and subject names keyed by id.
///
/// Unknown ids render as the raw id so a partially loaded lookup still
/// produces a readable grid.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    courses: HashMap<String, String>,
    subjects: HashMap<String, String>,
}

impl Labels {
    pub fn new(courses: &[Course], subjects: &[Subject]) -> Self {
        Self {
            courses: courses
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
            subjects: subjects
                .iter()
                .map(|s| (s.id.clone(), s.name.clone()))
                .collect(),
        }
    }

    pub fn course<'a>(&'a self, id: &'a str) -> &'a str {
        self.courses.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn subject<'a>(&'a self, id: &'a str) -> &'a str {
        self.subjects.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Text shown in a grid cell: course, then subject when it differs.
    pub fn cell_text(&self, entry: &TimetableEntry) -> String {
        let course = self.course(&entry.course_id);
        let subject = self.subject(&entry.subject_id);
        match (course.is_empty(), subject.is_empty()) {
            (true, true) => "(unnamed)".to_string(),
            (false, true) => course.to_string(),
            (true, false) => subject.to_string(),
            _ if course == subject => course.to_string(),
            _ => format!("{course} / {subject}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolboard_core::model::Day;

    fn entry(course: &str, subject: &str) -> TimetableEntry {
        TimetableEntry {
            id: None,
            day: Day::Monday,
            start_time: "08:00".into(),
            end_time: "09:00".into(),
            course_id: course.into(),
            subject_id: subject.into(),
            class_id: "k1".into(),
        }
    }

    fn labels() -> Labels {
        Labels::new(
            &[Course {
                id: "c1".into(),
                name: "Algebra I".into(),
                code: "ALG1".into(),
                subject_id: Some("s1".into()),
            }],
            &[Subject {
                id: "s1".into(),
                name: "Mathematics".into(),
                code: "MATH".into(),
            }],
        )
    }

    #[test]
    fn resolves_names() {
        assert_eq!(labels().cell_text(&entry("c1", "s1")), "Algebra I / Mathematics");
    }

    #[test]
    fn falls_back_to_ids() {
        let labels = labels();
        assert_eq!(labels.cell_text(&entry("c9", "s1")), "c9 / Mathematics");
        assert_eq!(labels.cell_text(&entry("c1", "")), "Algebra I");
        assert_eq!(labels.cell_text(&entry("", "")), "(unnamed)");
        assert_eq!(Labels::default().cell_text(&entry("x", "x")), "x");
    }
}
