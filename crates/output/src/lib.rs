use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    /// Issue keys (or comment ids) only, one per line
    Quiet,
}

const ISSUE_COLUMNS: [&str; 5] = ["key", "summary", "status", "assignee", "type"];

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a single record (an issue, a comment, a changelog entry).
    pub fn render(&self, value: &Value) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_one(&mut stdout, value)
    }

    /// Print a list of records gathered from a paginated listing.
    pub fn render_list(&self, values: &[Value]) -> Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_list(&mut stdout, values)
    }

    pub fn write_one<W: Write>(&self, out: &mut W, value: &Value) -> Result<()> {
        match self.format {
            OutputFormat::Table if is_issue(value) => self.write_list(out, std::slice::from_ref(value)),
            OutputFormat::Table | OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
                Ok(())
            }
            OutputFormat::Yaml => {
                write!(out, "{}", serde_yaml::to_string(value)?)?;
                Ok(())
            }
            OutputFormat::Quiet => {
                if let Some(id) = identifier(value) {
                    writeln!(out, "{id}")?;
                }
                Ok(())
            }
        }
    }

    pub fn write_list<W: Write>(&self, out: &mut W, values: &[Value]) -> Result<()> {
        match self.format {
            OutputFormat::Table if values.iter().all(is_issue) && !values.is_empty() => {
                let mut builder = Builder::default();
                builder.push_record(ISSUE_COLUMNS);
                for issue in values {
                    builder.push_record(issue_row(issue));
                }
                writeln!(out, "{}", builder.build().with(Style::rounded()))?;
                Ok(())
            }
            OutputFormat::Table | OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(values)?)?;
                Ok(())
            }
            OutputFormat::Yaml => {
                write!(out, "{}", serde_yaml::to_string(values)?)?;
                Ok(())
            }
            OutputFormat::Quiet => {
                for id in values.iter().filter_map(identifier) {
                    writeln!(out, "{id}")?;
                }
                Ok(())
            }
        }
    }
}

fn is_issue(value: &Value) -> bool {
    value.get("key").is_some_and(Value::is_string) && value.get("fields").is_some()
}

fn identifier(value: &Value) -> Option<String> {
    value
        .get("key")
        .or_else(|| value.get("id"))
        .map(value_to_string)
}

fn issue_row(issue: &Value) -> Vec<String> {
    let fields = &issue["fields"];
    vec![
        value_to_string(&issue["key"]),
        value_to_string(&fields["summary"]),
        value_to_string(&fields["status"]["name"]),
        fields["assignee"]
            .get("displayName")
            .or_else(|| fields["assignee"].get("name"))
            .map(value_to_string)
            .unwrap_or_default(),
        value_to_string(&fields["issuetype"]["name"]),
    ]
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
