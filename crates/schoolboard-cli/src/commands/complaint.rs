//! The `complaint resolve` command.

use std::path::PathBuf;

use anyhow::Result;

use schoolboard_core::model::ComplaintStatus;
use schoolboard_core::traits::set_complaint_status;

use super::context::Context;

pub async fn resolve(config_path: Option<PathBuf>, id: String) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let (backend, session) = ctx.connect()?;
    let complaint =
        ctx.api(set_complaint_status(&backend, &session, &id, ComplaintStatus::Resolved).await)?;
    println!("Complaint {id} \"{}\": {}", complaint.subject, complaint.status);
    Ok(())
}
