//! `outbox labels` - list the taxonomy labels a destination offers

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::common::load;
use crate::client::RedditClient;
use crate::orchestrator::fetch_templates;

pub fn execute(destination: &str, config_path: Option<&Path>) -> Result<()> {
    let config = load(config_path)?;
    let client = RedditClient::from_env(&config.client)?;

    let templates = fetch_templates(&client, destination);
    if templates.is_empty() {
        println!("{} No labels available on {destination}", "─".dimmed());
        return Ok(());
    }

    println!("{}", format!("Labels on {destination}:").bold());
    for template in templates {
        println!("  {}  {}", template.id.dimmed(), template.label_text);
    }
    Ok(())
}
