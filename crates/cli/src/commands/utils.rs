use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use jira_rest_api::{JiraClient, JiraConfig};
use jira_rest_config::Config;
use jira_rest_output::OutputRenderer;
use serde_json::{json, Map, Value};
use tracing::warn;

pub struct JiraContext<'a> {
    pub client: JiraClient,
    pub renderer: &'a OutputRenderer,
}

/// Connection settings for the requested (or default) profile, with the
/// password read from the process environment when set there.
pub fn resolve_connection(config: &Config, requested: Option<&str>) -> Result<JiraConfig> {
    resolve_connection_with(config, requested, |key| std::env::var(key).ok())
}

fn resolve_connection_with<E>(config: &Config, requested: Option<&str>, env: E) -> Result<JiraConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let (name, profile) = config
        .resolve_profile(requested)
        .ok_or_else(|| match requested {
            Some(name) => anyhow!("Profile '{name}' not found in config."),
            None => anyhow!(
                "No profile configured. Add one with `jira-rest profile set` or edit {}",
                Config::default_path().display()
            ),
        })?;

    let base_url = profile
        .base_url
        .clone()
        .ok_or_else(|| anyhow!("Profile '{name}' is missing a base_url."))?;
    let username = profile.username.clone().unwrap_or_default();

    // Profile-specific env var, then generic env var, then the config file.
    let from_env = |key: &str| env(key).filter(|p| !p.trim().is_empty());
    let password = from_env(&format!("JIRA_REST_PASSWORD_{}", name.to_uppercase()))
        .or_else(|| from_env("JIRA_REST_PASSWORD"))
        .or_else(|| profile.password.clone())
        .unwrap_or_default();

    if username.is_empty() || password.is_empty() {
        warn!(profile = name, "No complete credentials, sending anonymous requests");
    }

    let mut connection = JiraConfig::new(base_url, username, password);
    connection.version = profile.api_version.clone();
    Ok(connection)
}

/// Parse inline JSON, or the contents of a file when `raw` starts with `@`.
/// The document must be an object.
pub fn parse_json_object(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Unable to read JSON body from {path}"))?,
        None => raw.to_string(),
    };

    let value: Value = serde_json::from_str(&text).context("Request body is not valid JSON")?;
    if !value.is_object() {
        bail!("Request body must be a JSON object");
    }
    Ok(value)
}

pub fn create_body(
    project: &str,
    issue_type: &str,
    summary: &str,
    description: Option<&str>,
) -> Value {
    let mut fields = json!({
        "project": { "key": project },
        "issuetype": { "name": issue_type },
        "summary": summary,
    });
    if let Some(description) = description {
        fields["description"] = json!(description);
    }
    json!({ "fields": fields })
}

pub fn edit_body(summary: Option<&str>, description: Option<&str>) -> Result<Value> {
    let mut fields = Map::new();
    if let Some(summary) = summary {
        fields.insert("summary".into(), json!(summary));
    }
    if let Some(description) = description {
        fields.insert("description".into(), json!(description));
    }
    if fields.is_empty() {
        bail!("Nothing to update. Pass --summary, --description or --json");
    }
    Ok(json!({ "fields": fields }))
}
