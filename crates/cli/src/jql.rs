/// Assembles a JQL query out of the `search` filter flags.
#[derive(Debug, Default)]
pub struct JqlBuilder {
    clauses: Vec<String>,
}

impl JqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field = value`, skipped when `value` is `None`.
    pub fn eq(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            let rhs = match (field, value) {
                ("assignee" | "reporter", "@me") => "currentUser()".to_string(),
                (_, "unassigned" | "empty") => "EMPTY".to_string(),
                _ => quote(value),
            };
            self.clauses.push(format!("{field} = {rhs}"));
        }
        self
    }

    /// `field IN (..)`, skipped when `values` is empty.
    pub fn any_of(mut self, field: &str, values: &[String]) -> Self {
        if !values.is_empty() {
            let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
            self.clauses
                .push(format!("{field} IN ({})", quoted.join(", ")));
        }
        self
    }

    /// `field ~ value`, skipped when `value` is `None`.
    pub fn contains(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.clauses.push(format!("{field} ~ {}", quote(value)));
        }
        self
    }

    pub fn finish(self) -> String {
        self.clauses.join(" AND ")
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
