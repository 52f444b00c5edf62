use futures::Stream;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::pagination::{paginate, DEFAULT_PAGE_SIZE};
use crate::types::{Assignee, EditIssueConfig, Issue, Page, RequestMethod, SearchIssuesConfig};
use crate::JiraClient;

const NO_BODY: Option<&()> = None;

/// `issue/{key_or_id}{suffix}` with the key sent as a single path segment.
fn issue_path(key_or_id: &str, suffix: &str) -> Result<String> {
    if matches!(key_or_id, "" | "." | "..") {
        return Err(ApiError::InvalidParams(format!(
            "'{key_or_id}' is not an issue key or id"
        )));
    }
    Ok(format!("issue/{}{suffix}", urlencoding::encode(key_or_id)))
}

/// `{maxResults: 100, startAt: 0}` overlaid with whatever `page` sets.
fn page_params(page: &Page) -> Result<Map<String, Value>> {
    let mut params = Map::new();
    params.insert("maxResults".into(), json!(DEFAULT_PAGE_SIZE));
    params.insert("startAt".into(), json!(0));
    if let Value::Object(overrides) = serde_json::to_value(page)? {
        params.extend(overrides);
    }
    Ok(params)
}

// Each operation folds the response status into `Some`/`true` for the
// expected status and `None`/`false` otherwise. Only failed round trips are
// errors.
impl JiraClient {
    pub async fn create_issue<B: Serialize + ?Sized>(
        &self,
        body: &B,
        update_history: bool,
    ) -> Result<Option<Issue>> {
        let res = self
            .request(
                RequestMethod::Post,
                "issue",
                &json!({ "updateHistory": update_history }),
                Some(body),
            )
            .await?;
        Ok(res.data_if(201))
    }

    pub async fn get_issue(&self, key_or_id: &str) -> Result<Option<Issue>> {
        let res = self
            .request(RequestMethod::Get, &issue_path(key_or_id, "")?, &(), NO_BODY)
            .await?;
        Ok(res.data_if(200))
    }

    pub async fn update_issue<B: Serialize + ?Sized>(
        &self,
        key_or_id: &str,
        body: &B,
        config: &EditIssueConfig,
    ) -> Result<bool> {
        let res = self
            .request(RequestMethod::Put, &issue_path(key_or_id, "")?, config, Some(body))
            .await?;
        Ok(res.status.is(204))
    }

    /// Update, then refetch. A failed update short-circuits without a fetch.
    pub async fn edit_issue<B: Serialize + ?Sized>(
        &self,
        key_or_id: &str,
        body: &B,
        config: &EditIssueConfig,
    ) -> Result<Option<Issue>> {
        if !self.update_issue(key_or_id, body, config).await? {
            debug!(issue = key_or_id, "Update rejected, skipping refetch");
            return Ok(None);
        }
        self.get_issue(key_or_id).await
    }

    pub async fn delete_issue(&self, key_or_id: &str, delete_subtasks: bool) -> Result<bool> {
        let res = self
            .request(
                RequestMethod::Delete,
                &issue_path(key_or_id, "")?,
                &json!({ "deleteSubtasks": delete_subtasks }),
                NO_BODY,
            )
            .await?;
        Ok(res.status.is(204))
    }

    pub async fn assign_issue(&self, key_or_id: &str, assignee: &Assignee) -> Result<bool> {
        let res = self
            .request(
                RequestMethod::Put,
                &issue_path(key_or_id, "/assignee")?,
                &(),
                Some(assignee),
            )
            .await?;
        Ok(res.status.is(204))
    }

    pub async fn get_issue_changelog_page(
        &self,
        key_or_id: &str,
        page: &Page,
    ) -> Result<Option<Value>> {
        let res = self
            .request(
                RequestMethod::Get,
                &issue_path(key_or_id, "/changelog")?,
                &page_params(page)?,
                NO_BODY,
            )
            .await?;
        Ok(res.data_if(200))
    }

    pub async fn get_issue_comment_page(
        &self,
        key_or_id: &str,
        page: &Page,
    ) -> Result<Option<Value>> {
        let res = self
            .request(
                RequestMethod::Get,
                &issue_path(key_or_id, "/comment")?,
                &page_params(page)?,
                NO_BODY,
            )
            .await?;
        Ok(res.data_if(200))
    }

    pub async fn add_comment<B: Serialize + ?Sized>(
        &self,
        key_or_id: &str,
        body: &B,
    ) -> Result<Option<Value>> {
        let res = self
            .request(
                RequestMethod::Post,
                &issue_path(key_or_id, "/comment")?,
                &(),
                Some(body),
            )
            .await?;
        Ok(res.data_if(201))
    }

    /// One page of a JQL search. Anything but 200 yields an empty object.
    pub async fn search_issues_page(
        &self,
        jql: &str,
        config: &SearchIssuesConfig,
        page: &Page,
    ) -> Result<Value> {
        let mut body = page_params(page)?;
        body.insert("jql".into(), json!(jql));
        if let Value::Object(options) = serde_json::to_value(config)? {
            body.extend(options);
        }
        if !config.expand.is_empty() {
            body.insert("expand".into(), json!(config.expand.join(",")));
        }

        let res = self
            .request(RequestMethod::Post, "search", &(), Some(&body))
            .await?;
        Ok(res.data_if(200).unwrap_or_else(|| json!({})))
    }

    /// Every issue matching `jql`, fetched a page at a time as the stream
    /// is polled.
    pub fn search_issues<'a>(
        &'a self,
        jql: &'a str,
        config: &'a SearchIssuesConfig,
    ) -> impl Stream<Item = Result<Issue>> + 'a {
        paginate("issues", DEFAULT_PAGE_SIZE, move |page| async move {
            self.search_issues_page(jql, config, &page).await
        })
    }

    pub fn issue_changelog<'a>(
        &'a self,
        key_or_id: &'a str,
    ) -> impl Stream<Item = Result<Value>> + 'a {
        paginate("values", DEFAULT_PAGE_SIZE, move |page| async move {
            let page = self.get_issue_changelog_page(key_or_id, &page).await?;
            Ok(page.unwrap_or_else(|| json!({})))
        })
    }

    pub fn issue_comments<'a>(
        &'a self,
        key_or_id: &'a str,
    ) -> impl Stream<Item = Result<Value>> + 'a {
        paginate("comments", DEFAULT_PAGE_SIZE, move |page| async move {
            let page = self.get_issue_comment_page(key_or_id, &page).await?;
            Ok(page.unwrap_or_else(|| json!({})))
        })
    }
}
