use super::backend_client::{BackendClient, RemoteArea};
use crate::application::ports::{FilterCondition, RecordFilter, RecordStore};
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Table rows over the backend's `/rest/v1` API.
pub struct HttpRecordStore {
    client: BackendClient,
}

impl HttpRecordStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

/// `col=eq.value` / `col=is.null` query pairs.
pub fn filter_query(filter: &RecordFilter) -> Vec<(String, String)> {
    filter
        .conditions()
        .iter()
        .map(|condition| match condition {
            FilterCondition::Eq(column, value) => (column.clone(), format!("eq.{value}")),
            FilterCondition::IsNull(column) => (column.clone(), "is.null".to_string()),
        })
        .collect()
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn insert(&self, table: &str, record: Value) -> Result<(), AppError> {
        let builder = self
            .client
            .request(Method::POST, &format!("/rest/v1/{table}"))
            .header("Prefer", "return=minimal")
            .json(&record);

        self.client.send(builder, RemoteArea::Records).await?;
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        filter: RecordFilter,
        patch: Value,
    ) -> Result<(), AppError> {
        // 条件なしの PATCH はテーブル全体を書き換えてしまう
        if filter.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Refusing to update every row of {table}"
            )));
        }

        let builder = self
            .client
            .request(Method::PATCH, &format!("/rest/v1/{table}"))
            .query(&filter_query(&filter))
            .header("Prefer", "return=minimal")
            .json(&patch);

        self.client.send(builder, RemoteArea::Records).await?;
        Ok(())
    }
}
