//! The `login`, `logout` and `whoami` commands.

use std::path::PathBuf;

use anyhow::Result;

use schoolboard_core::traits::SchoolApi;

use super::context::Context;

pub async fn login(
    config_path: Option<PathBuf>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let credentials = ctx
        .config
        .auth
        .credentials(email, password)
        .filter(|c| !c.email.trim().is_empty() && !c.password.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("no credentials: pass --email and --password or set [auth] in the config")
        })?;

    let backend = ctx.backend()?;
    tracing::info!(backend = backend.name(), email = %credentials.email, "logging in");
    let session = backend.login(&credentials).await?;
    ctx.store.save(&session)?;

    println!("Logged in as {} <{}>", session.user.name, session.user.email);
    if let Some(at) = session.expires_at {
        println!("Session valid until {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

pub fn logout(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = Context::load(config_path)?;
    if ctx.store.clear()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(config_path: Option<PathBuf>) -> Result<()> {
    let ctx = Context::load(config_path)?;
    let session = ctx.store.require()?;
    let user = &session.user;

    println!("{} <{}>", user.name, user.email);
    println!("  role:   {}", user.role);
    if let Some(school) = &user.school_id {
        println!("  school: {school}");
    }
    match session.expires_at {
        Some(at) => println!("  expires {}", at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  no expiry reported"),
    }
    Ok(())
}
