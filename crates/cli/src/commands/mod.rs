use anyhow::Result;
use clap::Subcommand;

mod issues;
pub mod profile;
pub mod utils;

pub use profile::ProfileCommand;
pub use utils::{resolve_connection, JiraContext};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage connection profiles
    #[command(subcommand)]
    Profile(ProfileCommand),

    #[command(flatten)]
    Issue(IssueCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum IssueCommand {
    /// Fetch a single issue
    Get {
        /// Issue key or id (e.g. JIRA-123)
        key: String,
    },

    /// Create a new issue
    Create {
        /// Project key
        #[arg(long, required_unless_present = "json")]
        project: Option<String>,
        /// Issue type (e.g. Task, Bug, Story)
        #[arg(long, required_unless_present = "json")]
        issue_type: Option<String>,
        /// Issue summary
        #[arg(long, required_unless_present = "json")]
        summary: Option<String>,
        /// Issue description
        #[arg(long)]
        description: Option<String>,
        /// Full request body as JSON, or @path to a JSON file
        #[arg(long, conflicts_with_all = ["project", "issue_type", "summary", "description"])]
        json: Option<String>,
        /// Record the created issue in the user's issue history
        #[arg(long)]
        update_history: bool,
    },

    /// Update an issue and print the refreshed version
    Edit {
        /// Issue key or id
        key: String,
        /// New summary
        #[arg(long)]
        summary: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Full request body as JSON, or @path to a JSON file
        #[arg(long, conflicts_with_all = ["summary", "description"])]
        json: Option<String>,
        /// Whether watchers get notified (server default when omitted)
        #[arg(long)]
        notify_users: Option<bool>,
        /// Edit fields that are not editable on the screen
        #[arg(long)]
        override_editable_flag: Option<bool>,
        /// Edit fields hidden from the screen
        #[arg(long)]
        override_screen_security: Option<bool>,
    },

    /// Delete an issue
    Delete {
        /// Issue key or id
        key: String,
        /// Refuse deletion when the issue has subtasks instead of removing them
        #[arg(long)]
        keep_subtasks: bool,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },

    /// Assign an issue to a user
    Assign {
        /// Issue key or id
        key: String,
        /// Username (server/data center)
        #[arg(long, required_unless_present = "account_id", conflicts_with = "account_id")]
        name: Option<String>,
        /// Account id (cloud)
        #[arg(long)]
        account_id: Option<String>,
    },

    /// Add a comment to an issue
    Comment {
        /// Issue key or id
        key: String,
        /// Comment text
        #[arg(long)]
        body: String,
    },

    /// List the comments on an issue
    Comments {
        /// Issue key or id
        key: String,
        /// Maximum number of comments to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the change history of an issue
    Changelog {
        /// Issue key or id
        key: String,
        /// Maximum number of entries to return
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search issues using JQL or filter flags
    Search {
        /// Raw JQL query (conflicts with filter flags)
        #[arg(long, conflicts_with_all = ["project", "status", "assignee", "text"])]
        jql: Option<String>,
        /// Filter by project
        #[arg(short = 'p', long)]
        project: Option<String>,
        /// Filter by status (repeatable)
        #[arg(short = 's', long)]
        status: Vec<String>,
        /// Filter by assignee (use @me for the current user)
        #[arg(short = 'a', long)]
        assignee: Option<String>,
        /// Free text search in summary
        #[arg(long)]
        text: Option<String>,
        /// Fields to return (repeatable)
        #[arg(long)]
        fields: Vec<String>,
        /// Entities to expand (repeatable)
        #[arg(long)]
        expand: Vec<String>,
        /// Maximum number of issues to return
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
}

pub async fn execute(command: IssueCommand, ctx: JiraContext<'_>) -> Result<()> {
    match command {
        IssueCommand::Get { key } => issues::get_issue(&ctx, &key).await,
        IssueCommand::Create {
            project,
            issue_type,
            summary,
            description,
            json,
            update_history,
        } => {
            let body = match json {
                Some(raw) => utils::parse_json_object(&raw)?,
                None => utils::create_body(
                    project.as_deref().unwrap_or_default(),
                    issue_type.as_deref().unwrap_or_default(),
                    summary.as_deref().unwrap_or_default(),
                    description.as_deref(),
                ),
            };
            issues::create_issue(&ctx, &body, update_history).await
        }
        IssueCommand::Edit {
            key,
            summary,
            description,
            json,
            notify_users,
            override_editable_flag,
            override_screen_security,
        } => {
            let body = match json {
                Some(raw) => utils::parse_json_object(&raw)?,
                None => utils::edit_body(summary.as_deref(), description.as_deref())?,
            };
            let options = jira_rest_api::EditIssueConfig {
                notify_users,
                override_editable_flag,
                override_screen_security,
            };
            issues::edit_issue(&ctx, &key, &body, &options).await
        }
        IssueCommand::Delete {
            key,
            keep_subtasks,
            force,
        } => issues::delete_issue(&ctx, &key, !keep_subtasks, force).await,
        IssueCommand::Assign {
            key,
            name,
            account_id,
        } => {
            let assignee = jira_rest_api::Assignee { name, account_id };
            issues::assign_issue(&ctx, &key, &assignee).await
        }
        IssueCommand::Comment { key, body } => issues::add_comment(&ctx, &key, &body).await,
        IssueCommand::Comments { key, limit } => issues::list_comments(&ctx, &key, limit).await,
        IssueCommand::Changelog { key, limit } => issues::list_changelog(&ctx, &key, limit).await,
        IssueCommand::Search {
            jql,
            project,
            status,
            assignee,
            text,
            fields,
            expand,
            limit,
        } => {
            let jql = jql.unwrap_or_else(|| {
                crate::jql::JqlBuilder::new()
                    .eq("project", project.as_deref())
                    .any_of("status", &status)
                    .eq("assignee", assignee.as_deref())
                    .contains("summary", text.as_deref())
                    .finish()
            });
            let config = jira_rest_api::SearchIssuesConfig {
                expand,
                fields: (!fields.is_empty()).then_some(fields),
                ..Default::default()
            };
            issues::search_issues(&ctx, &jql, &config, limit).await
        }
    }
}
