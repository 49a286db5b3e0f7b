//! The `leave approve` and `leave reject` commands.

use std::path::PathBuf;

use anyhow::Result;

use schoolboard_core::model::{LeaveRequest, LeaveStatus};
use schoolboard_core::traits::{decide_leave, fetch_one};

use super::context::Context;

pub async fn approve(config_path: Option<PathBuf>, id: String) -> Result<()> {
    decide(config_path, id, LeaveStatus::Approved).await
}

pub async fn reject(config_path: Option<PathBuf>, id: String) -> Result<()> {
    decide(config_path, id, LeaveStatus::Rejected).await
}

async fn decide(config_path: Option<PathBuf>, id: String, decision: LeaveStatus) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;

    let request: LeaveRequest = ctx.api(fetch_one(&backend, &session, &id).await)?;
    anyhow::ensure!(
        request.status == LeaveStatus::Pending,
        "leave request {id} is already {}",
        request.status
    );

    let updated = ctx.api(decide_leave(&backend, &session, &id, decision).await)?;
    println!(
        "Leave request {id} ({} to {}): {}",
        updated.start_date, updated.end_date, updated.status
    );
    Ok(())
}
