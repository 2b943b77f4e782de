//! Agent records and their column values

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ResultsError, Result};
use crate::query::identifier;

/// A single bound column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL
    Null,
    /// Boolean, stored as 0/1
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
}

impl SqlValue {
    /// Convert a scalar JSON value
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| ResultsError::InvalidRecord(format!("unrepresentable number {n}"))),
            Value::String(s) => Ok(Self::Text(s.clone())),
            other => Err(ResultsError::InvalidRecord(format!(
                "nested values cannot be stored in a column: {other}"
            ))),
        }
    }
}

/// One row describing an agent, as ordered column/value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRecord {
    columns: Vec<(String, SqlValue)>,
}

impl AgentRecord {
    /// Empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, validating its name
    pub fn with(mut self, column: &str, value: SqlValue) -> Result<Self> {
        identifier(column)?;
        self.columns.push((column.to_owned(), value));
        Ok(self)
    }

    /// Build from a flat JSON object
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            ResultsError::InvalidRecord("agent record must be a JSON object".into())
        })?;
        object
            .iter()
            .try_fold(Self::new(), |record, (column, value)| {
                record.with(column, SqlValue::from_json(value)?)
            })
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.columns.iter().map(|(_, value)| value)
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The `agent_tag` column, used to name the agent in logs
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.columns.iter().find_map(|(name, value)| match value {
            SqlValue::Text(tag) if name == "agent_tag" => Some(tag.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let record = AgentRecord::from_json(&json!({
            "agent_tag": "random_walker_fixed",
            "max_step_length": 10,
            "prev_step_bias": 0.25,
            "forward_only": true,
            "notes": null,
        }))
        .unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.tag(), Some("random_walker_fixed"));
        let values: Vec<&SqlValue> = record.values().collect();
        assert!(values.contains(&&SqlValue::Int(10)));
        assert!(values.contains(&&SqlValue::Float(0.25)));
        assert!(values.contains(&&SqlValue::Bool(true)));
        assert!(values.contains(&&SqlValue::Null));
    }

    #[test]
    fn test_rejects_bad_records() {
        assert!(AgentRecord::from_json(&json!([1, 2])).is_err());
        assert!(AgentRecord::from_json(&json!({"nested": {"a": 1}})).is_err());
        assert!(matches!(
            AgentRecord::from_json(&json!({"drop table": 1})),
            Err(ResultsError::InvalidIdentifier(_))
        ));
    }
}
