//! SQL text for the result store
//!
//! Table and column names are spliced into the SQL and must pass
//! [`identifier`]; values are always bound as `?` parameters.

use crate::error::{ResultsError, Result};

/// Accept `[A-Za-z0-9_]+`
pub fn identifier(name: &str) -> Result<&str> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name)
    } else {
        Err(ResultsError::InvalidIdentifier(name.to_owned()))
    }
}

/// Parameterised INSERT of `columns` into `table`
pub fn insert_sql<'a>(table: &str, columns: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let columns = columns
        .into_iter()
        .map(identifier)
        .collect::<Result<Vec<_>>>()?;
    if columns.is_empty() {
        return Err(ResultsError::InvalidRecord("no columns to insert".into()));
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        identifier(table)?,
        columns.join(", ")
    ))
}

/// Names of instances an agent already has results for
pub fn completed_instances_sql(agent_table: &str, results_table: &str) -> Result<String> {
    let agents = identifier(agent_table)?;
    let results = identifier(results_table)?;
    Ok(format!(
        "SELECT instances.instancename FROM instances \
         INNER JOIN {results} ON instances.instanceid = {results}.instanceid \
         INNER JOIN {agents} ON {results}.agentid = {agents}.agentid \
         WHERE {agents}.agentid = ?"
    ))
}

/// Single-column id lookup by one or two equality predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdQuery {
    /// Column to return
    pub id_column: String,
    /// Table to search
    pub table: String,
    /// First `column = value` predicate
    pub filter: (String, String),
    /// Optional second predicate, joined with AND
    pub and_filter: Option<(String, String)>,
    /// Use SELECT DISTINCT
    pub distinct: bool,
}

impl IdQuery {
    /// Look up `id_column` in `table` where `column = value`
    pub fn new(
        id_column: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id_column: id_column.into(),
            table: table.into(),
            filter: (column.into(), value.into()),
            and_filter: None,
            distinct: true,
        }
    }

    /// Add a second predicate
    #[must_use]
    pub fn and(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.and_filter = Some((column.into(), value.into()));
        self
    }

    /// Toggle DISTINCT
    #[must_use]
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// SQL text with `?` placeholders
    pub fn sql(&self) -> Result<String> {
        let mut sql = format!(
            "SELECT {}{} FROM {} WHERE {} = ?",
            if self.distinct { "DISTINCT " } else { "" },
            identifier(&self.id_column)?,
            identifier(&self.table)?,
            identifier(&self.filter.0)?,
        );
        if let Some((column, _)) = &self.and_filter {
            sql.push_str(&format!(" AND {} = ?", identifier(column)?));
        }
        Ok(sql)
    }

    /// Values bound to the placeholders, in order
    pub fn params(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.filter.1.as_str())
            .chain(self.and_filter.iter().map(|(_, value)| value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier() {
        assert!(identifier("agent_instance_results").is_ok());
        assert!(identifier("Agents2").is_ok());
        for bad in ["", "agents;", "a b", "agents--", "`agents`", "ägents"] {
            assert!(identifier(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_insert_sql() {
        assert_eq!(
            insert_sql("agents", ["agent_tag", "max_step_length"]).unwrap(),
            "INSERT INTO agents (agent_tag, max_step_length) VALUES (?, ?)"
        );
        assert!(insert_sql("agents", std::iter::empty::<&str>()).is_err());
        assert!(insert_sql("agents; DROP", ["a"]).is_err());
    }

    #[test]
    fn test_completed_instances_sql() {
        assert_eq!(
            completed_instances_sql("agents", "results").unwrap(),
            "SELECT instances.instancename FROM instances \
             INNER JOIN results ON instances.instanceid = results.instanceid \
             INNER JOIN agents ON results.agentid = agents.agentid \
             WHERE agents.agentid = ?"
        );
    }

    #[test]
    fn test_id_query() {
        let query = IdQuery::new("agentid", "agents", "agent_tag", "walker");
        assert_eq!(
            query.sql().unwrap(),
            "SELECT DISTINCT agentid FROM agents WHERE agent_tag = ?"
        );
        assert_eq!(query.params().collect::<Vec<_>>(), vec!["walker"]);

        let query = query.and("seed", "1234").distinct(false);
        assert_eq!(
            query.sql().unwrap(),
            "SELECT agentid FROM agents WHERE agent_tag = ? AND seed = ?"
        );
        assert_eq!(query.params().collect::<Vec<_>>(), vec!["walker", "1234"]);

        let bad = IdQuery::new("id", "agents", "tag = 1 OR 1", "x");
        assert!(matches!(bad.sql(), Err(ResultsError::InvalidIdentifier(_))));
    }
}
