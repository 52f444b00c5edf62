use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use jira_rest_config::{Config, Profile};
use jira_rest_output::OutputRenderer;
use serde_json::{json, Value};
use url::Url;

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Add or update a connection profile
    Set(SetArgs),
    /// Show one profile (defaults to the active one)
    Show {
        /// Profile name
        name: Option<String>,
    },
    /// List configured profiles
    List,
    /// Remove a profile from the config file
    Remove {
        /// Profile name
        name: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Profile name to create or update.
    pub name: String,
    /// Jira base URL (e.g. https://jira.example.com). Required for new profiles.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Username for basic authentication.
    #[arg(long)]
    pub username: Option<String>,
    /// REST API version (defaults to 2 when unset).
    #[arg(long)]
    pub api_version: Option<String>,
    /// Mark this profile as the default one.
    #[arg(long)]
    pub default: bool,
}

pub fn handle(
    command: ProfileCommand,
    config: &mut Config,
    config_path: Option<&Path>,
    renderer: &OutputRenderer,
) -> Result<()> {
    match command {
        ProfileCommand::Set(args) => set_profile(args, config, config_path),
        ProfileCommand::Show { name } => show_profile(name.as_deref(), config, renderer),
        ProfileCommand::List => list_profiles(config, renderer),
        ProfileCommand::Remove { name } => remove_profile(&name, config, config_path),
    }
}

fn set_profile(args: SetArgs, config: &mut Config, config_path: Option<&Path>) -> Result<()> {
    if args.name.trim().is_empty() {
        bail!("Profile name cannot be empty");
    }

    let base_url = match args.base_url.as_deref() {
        Some(raw) => Some(
            Url::parse(raw)
                .with_context(|| format!("Invalid Jira base URL: {raw}"))?
                .to_string(),
        ),
        None if config.profile(&args.name).is_some() => None,
        None => bail!("New profile '{}' needs --base-url", args.name),
    };

    let entry = config.profiles.entry(args.name.clone()).or_default();
    if base_url.is_some() {
        entry.base_url = base_url;
    }
    if args.username.is_some() {
        entry.username = args.username;
    }
    if args.api_version.is_some() {
        entry.api_version = args.api_version;
    }

    if args.default || config.default_profile.is_none() {
        config.default_profile = Some(args.name.clone());
    }

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %args.name, "Profile saved");
    Ok(())
}

fn show_profile(name: Option<&str>, config: &Config, renderer: &OutputRenderer) -> Result<()> {
    let (name, profile) = match name {
        Some(name) => config
            .profile(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| anyhow!("Profile '{name}' does not exist"))?,
        None => config
            .resolve_profile(None)
            .context("No profile configured. Use `jira-rest profile set` to add one.")?,
    };
    renderer.render(&profile_row(config, name, profile))
}

fn list_profiles(config: &Config, renderer: &OutputRenderer) -> Result<()> {
    let rows: Vec<Value> = config
        .profiles
        .iter()
        .map(|(name, profile)| profile_row(config, name, profile))
        .collect();

    if rows.is_empty() {
        tracing::info!("No profiles configured yet. Use `jira-rest profile set` to add one.");
    }
    renderer.render_list(&rows)
}

fn remove_profile(name: &str, config: &mut Config, config_path: Option<&Path>) -> Result<()> {
    if config.profiles.remove(name).is_none() {
        bail!("Profile '{name}' does not exist");
    }
    if config.default_profile.as_deref() == Some(name) {
        config.default_profile = config.profiles.keys().next().cloned();
    }

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %name, "Profile removed");
    Ok(())
}

/// Stored passwords are never printed, only whether one is present.
fn profile_row(config: &Config, name: &str, profile: &Profile) -> Value {
    json!({
        "id": name,
        "base_url": profile.base_url,
        "username": profile.username,
        "api_version": profile.api_version,
        "has_password": profile.password.is_some(),
        "is_default": config.default_profile.as_deref() == Some(name),
    })
}
