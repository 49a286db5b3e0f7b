//! The `schoolboard init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("schoolboard.toml").exists() {
        println!("schoolboard.toml already exists, skipping.");
    } else {
        std::fs::write("schoolboard.toml", SAMPLE_CONFIG)?;
        println!("Created schoolboard.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point base_url at your backend: schoolboard config set base_url <url>");
    println!("  2. Run: schoolboard login --email <you@school>");
    println!("  3. Run: schoolboard overview");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# schoolboard configuration

base_url = "http://localhost:5000/api"
timeout_secs = 30
page_size = 10

[auth]
email = "${SCHOOLBOARD_EMAIL}"
password = "${SCHOOLBOARD_PASSWORD}"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config: schoolboard_client::SchoolboardConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.page_size, 10);
        assert!(config.auth.email.is_some());
    }
}
