use anyhow::{bail, Context, Result};
use jira_rest_api::{collect_items, Assignee, EditIssueConfig, SearchIssuesConfig};
use serde_json::{json, Value};
use tracing::info;

use super::utils::JiraContext;

pub async fn get_issue(ctx: &JiraContext<'_>, key: &str) -> Result<()> {
    let issue = ctx
        .client
        .get_issue(key)
        .await
        .with_context(|| format!("Failed to fetch issue {key}"))?;

    match issue {
        Some(issue) => ctx.renderer.render(&issue),
        None => bail!("Issue {key} was not found or is not visible to you"),
    }
}

pub async fn create_issue(ctx: &JiraContext<'_>, body: &Value, update_history: bool) -> Result<()> {
    let created = ctx
        .client
        .create_issue(body, update_history)
        .await
        .context("Failed to create issue")?;

    match created {
        Some(issue) => {
            info!(key = %issue["key"], "Issue created");
            ctx.renderer.render(&issue)
        }
        None => bail!("The server did not create the issue; check the fields for this project"),
    }
}

pub async fn edit_issue(
    ctx: &JiraContext<'_>,
    key: &str,
    body: &Value,
    options: &EditIssueConfig,
) -> Result<()> {
    let issue = ctx
        .client
        .edit_issue(key, body, options)
        .await
        .with_context(|| format!("Failed to update issue {key}"))?;

    match issue {
        Some(issue) => {
            info!(%key, "Issue updated");
            ctx.renderer.render(&issue)
        }
        None => bail!("Issue {key} was not updated"),
    }
}

pub async fn delete_issue(
    ctx: &JiraContext<'_>,
    key: &str,
    delete_subtasks: bool,
    force: bool,
) -> Result<()> {
    if !force {
        println!("About to delete issue: {key}");
        println!("Use --force to confirm deletion");
        return Ok(());
    }

    let deleted = ctx
        .client
        .delete_issue(key, delete_subtasks)
        .await
        .with_context(|| format!("Failed to delete issue {key}"))?;

    if !deleted {
        bail!("Issue {key} was not deleted");
    }
    info!(%key, "Issue deleted");
    println!("Deleted issue: {key}");
    Ok(())
}

pub async fn assign_issue(ctx: &JiraContext<'_>, key: &str, assignee: &Assignee) -> Result<()> {
    let assigned = ctx
        .client
        .assign_issue(key, assignee)
        .await
        .with_context(|| format!("Failed to assign issue {key}"))?;

    if !assigned {
        bail!("Issue {key} was not assigned");
    }
    let who = assignee
        .name
        .as_deref()
        .or(assignee.account_id.as_deref())
        .unwrap_or_default();
    println!("Assigned {key} to {who}");
    Ok(())
}

pub async fn add_comment(ctx: &JiraContext<'_>, key: &str, text: &str) -> Result<()> {
    let comment = ctx
        .client
        .add_comment(key, &json!({ "body": text }))
        .await
        .with_context(|| format!("Failed to comment on issue {key}"))?;

    match comment {
        Some(comment) => ctx.renderer.render(&comment),
        None => bail!("Comment was not added to {key}"),
    }
}

pub async fn list_comments(ctx: &JiraContext<'_>, key: &str, limit: Option<usize>) -> Result<()> {
    let comments = collect_items(ctx.client.issue_comments(key), limit)
        .await
        .with_context(|| format!("Failed to list comments on {key}"))?;

    if comments.is_empty() {
        info!(%key, "No comments found");
        return Ok(());
    }
    ctx.renderer.render_list(&comments)
}

pub async fn list_changelog(ctx: &JiraContext<'_>, key: &str, limit: Option<usize>) -> Result<()> {
    let entries = collect_items(ctx.client.issue_changelog(key), limit)
        .await
        .with_context(|| format!("Failed to read changelog of {key}"))?;

    if entries.is_empty() {
        info!(%key, "No changelog entries found");
        return Ok(());
    }
    ctx.renderer.render_list(&entries)
}

pub async fn search_issues(
    ctx: &JiraContext<'_>,
    jql: &str,
    config: &SearchIssuesConfig,
    limit: usize,
) -> Result<()> {
    let issues = collect_items(ctx.client.search_issues(jql, config), Some(limit))
        .await
        .context("Failed to execute search")?;

    if issues.is_empty() {
        info!("No issues matched the provided JQL.");
        return Ok(());
    }
    ctx.renderer.render_list(&issues)
}
