//! The `schoolboard check-dates` command.

use anyhow::Result;
use chrono::{Local, NaiveDate};

use schoolboard_core::assessment::validate_assessment_dates;

/// Run the assessment date rule offline. Exits non-zero when it fails.
pub fn execute(start: NaiveDate, end: NaiveDate, today: Option<NaiveDate>) -> Result<()> {
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    validate_assessment_dates(start, end, today)?;
    println!("Dates are valid: {start} to {end}");
    Ok(())
}
