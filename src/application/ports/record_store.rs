use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Eq(String, String),
    IsNull(String),
}

/// Conjunction of row conditions for an update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordFilter {
    conditions: Vec<FilterCondition>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions
            .push(FilterCondition::Eq(column.into(), value.into()));
        self
    }

    pub fn is_null(mut self, column: impl Into<String>) -> Self {
        self.conditions.push(FilterCondition::IsNull(column.into()));
        self
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, table: &str, record: Value) -> Result<(), AppError>;
    async fn update(&self, table: &str, filter: RecordFilter, patch: Value)
    -> Result<(), AppError>;
}
