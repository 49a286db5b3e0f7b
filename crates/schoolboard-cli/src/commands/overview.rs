//! The `schoolboard overview` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use comfy_table::{Cell, Table};
use serde::Serialize;

use schoolboard_core::model::{
    Announcement, Assessment, AssessmentStatus, Complaint, ComplaintStatus, LeaveRequest,
    LeaveStatus, ResourceKind,
};
use schoolboard_core::traits::{fetch_all, SchoolApi};

use super::context::Context;

const UPCOMING: usize = 5;
const RECENT_ANNOUNCEMENTS: usize = 3;

#[derive(Debug, Serialize)]
struct Overview {
    classes: usize,
    teachers: usize,
    students: usize,
    courses: usize,
    assessments: Vec<(AssessmentStatus, usize)>,
    open_complaints: usize,
    pending_leave_requests: usize,
    upcoming: Vec<Assessment>,
    announcements: Vec<Announcement>,
}

pub async fn execute(config_path: Option<PathBuf>, format: String) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json"),
        "unknown format '{format}' (expected table or json)"
    );
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;

    let (classes, teachers, students, courses, assessments, complaints, leave, announcements) =
        ctx.api(futures::try_join!(
            backend.list(&session, ResourceKind::Class, &[]),
            backend.list(&session, ResourceKind::Teacher, &[]),
            backend.list(&session, ResourceKind::Student, &[]),
            backend.list(&session, ResourceKind::Course, &[]),
            fetch_all::<Assessment>(&backend, &session),
            fetch_all::<Complaint>(&backend, &session),
            fetch_all::<LeaveRequest>(&backend, &session),
            fetch_all::<Announcement>(&backend, &session),
        ))?;

    let overview = summarize(
        [classes.len(), teachers.len(), students.len(), courses.len()],
        assessments,
        &complaints,
        &leave,
        announcements,
    );

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }
    print_overview(&overview);
    Ok(())
}

fn summarize(
    [classes, teachers, students, courses]: [usize; 4],
    mut assessments: Vec<Assessment>,
    complaints: &[Complaint],
    leave: &[LeaveRequest],
    mut announcements: Vec<Announcement>,
) -> Overview {
    let today = Local::now().date_naive();
    let by_status = AssessmentStatus::ALL
        .iter()
        .map(|s| (*s, assessments.iter().filter(|a| a.status == *s).count()))
        .collect();

    assessments.retain(|a| a.start_date >= today && a.status != AssessmentStatus::Cancelled);
    assessments.sort_by_key(|a| a.start_date);
    assessments.truncate(UPCOMING);

    // newest first; undated announcements sort last
    announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    announcements.truncate(RECENT_ANNOUNCEMENTS);

    Overview {
        classes,
        teachers,
        students,
        courses,
        assessments: by_status,
        open_complaints: complaints
            .iter()
            .filter(|c| c.status != ComplaintStatus::Resolved)
            .count(),
        pending_leave_requests: leave
            .iter()
            .filter(|l| l.status == LeaveStatus::Pending)
            .count(),
        upcoming: assessments,
        announcements,
    }
}

fn print_overview(overview: &Overview) {
    let mut counts = Table::new();
    counts.set_header(vec!["Classes", "Teachers", "Students", "Courses"]);
    counts.add_row(vec![
        Cell::new(overview.classes),
        Cell::new(overview.teachers),
        Cell::new(overview.students),
        Cell::new(overview.courses),
    ]);
    println!("{counts}");

    let statuses: Vec<String> = overview
        .assessments
        .iter()
        .map(|(status, n)| format!("{n} {status}"))
        .collect();
    println!("\nAssessments: {}", statuses.join(", "));
    println!("Open complaints: {}", overview.open_complaints);
    println!("Pending leave requests: {}", overview.pending_leave_requests);

    if !overview.upcoming.is_empty() {
        println!("\nUpcoming assessments:");
        for a in &overview.upcoming {
            println!("  {} {} ({})", a.start_date, a.name, a.status);
        }
    }
    if !overview.announcements.is_empty() {
        println!("\nLatest announcements:");
        for a in &overview.announcements {
            match a.created_at {
                Some(at) => println!("  {} {}", at.format("%Y-%m-%d"), a.title),
                None => println!("  {}", a.title),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn assessment(id: &str, start: NaiveDate, status: AssessmentStatus) -> Assessment {
        Assessment {
            id: id.into(),
            name: id.into(),
            description: None,
            term_id: "t1".into(),
            school_id: "s1".into(),
            start_date: start,
            end_date: start + Duration::days(2),
            status,
            created_by: "u1".into(),
        }
    }

    fn announcement(title: &str, day: Option<u32>) -> Announcement {
        Announcement {
            id: title.into(),
            title: title.into(),
            content: String::new(),
            audience: None,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2026, 1, d, 9, 0, 0).unwrap()),
        }
    }

    #[test]
    fn summary_counts_and_ordering() {
        let today = Local::now().date_naive();
        let overview = summarize(
            [2, 3, 40, 5],
            vec![
                assessment("later", today + Duration::days(20), AssessmentStatus::Pending),
                assessment("soon", today + Duration::days(1), AssessmentStatus::Pending),
                assessment("past", today - Duration::days(30), AssessmentStatus::Completed),
                assessment("dropped", today + Duration::days(3), AssessmentStatus::Cancelled),
            ],
            &[],
            &[],
            vec![
                announcement("undated", None),
                announcement("old", Some(2)),
                announcement("new", Some(9)),
            ],
        );

        assert_eq!(overview.students, 40);
        assert_eq!(
            overview.assessments,
            vec![
                (AssessmentStatus::Pending, 2),
                (AssessmentStatus::Active, 0),
                (AssessmentStatus::Completed, 1),
                (AssessmentStatus::Cancelled, 1),
            ]
        );
        let upcoming: Vec<&str> = overview.upcoming.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(upcoming, ["soon", "later"]);
        let titles: Vec<&str> = overview
            .announcements
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, ["new", "old", "undated"]);
    }
}
