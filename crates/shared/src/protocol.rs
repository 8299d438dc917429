use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    columns::{find_column, ColumnDescriptor},
    domain::RequestId,
    query::TableQuery,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParam {
    pub id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParam {
    pub id: String,
    pub desc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequestBody {
    pub fetch_id: u64,
    pub limit: u64,
    pub offset: u64,
    pub filters: Vec<FilterParam>,
    pub orders: Vec<OrderParam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponseBody {
    pub fetch_id: u64,
    pub data: Vec<Value>,
    pub records_filtered: u64,
    pub records_total: u64,
}

/// One issued fetch: the wire body plus the id the controller compares
/// settlements against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub request_id: RequestId,
    pub page_size: u64,
    pub body: FetchRequestBody,
}

impl FetchRequest {
    pub fn build(request_id: RequestId, query: &TableQuery, columns: &[ColumnDescriptor]) -> Self {
        let filters = query
            .filters
            .iter()
            .map(|(id, value)| FilterParam {
                id: id.clone(),
                value: value.clone(),
                filter: find_column(columns, id).and_then(|column| column.filter.clone()),
            })
            .collect();

        let orders = query
            .sort_keys
            .iter()
            .map(|key| OrderParam {
                id: key.column_id.clone(),
                desc: key.direction.is_desc(),
                sort_type: find_column(columns, &key.column_id)
                    .and_then(|column| column.sort_type.clone()),
            })
            .collect();

        Self {
            request_id,
            page_size: query.page_size,
            body: FetchRequestBody {
                fetch_id: request_id.0,
                limit: query.page_size,
                offset: query.offset(),
                filters,
                orders,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablePage {
    /// Id echoed by the server, when the source echoes one.
    pub fetch_id: Option<RequestId>,
    pub rows: Vec<Value>,
    pub total_count: u64,
    pub filtered_count: u64,
}

impl From<FetchResponseBody> for TablePage {
    fn from(value: FetchResponseBody) -> Self {
        Self {
            fetch_id: Some(RequestId(value.fetch_id)),
            rows: value.data,
            total_count: value.records_total,
            filtered_count: value.records_filtered,
        }
    }
}

/// What the view displays. Replaced wholesale by every committed settlement.
#[derive(Debug, Clone, PartialEq)]
pub enum TableResult {
    Loaded(TablePage),
    Failed { error: String },
}

impl Default for TableResult {
    fn default() -> Self {
        Self::Loaded(TablePage::default())
    }
}

impl TableResult {
    pub fn rows(&self) -> &[Value] {
        match self {
            TableResult::Loaded(page) => &page.rows,
            TableResult::Failed { .. } => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TableResult::Loaded(_) => None,
            TableResult::Failed { error } => Some(error),
        }
    }

    pub fn filtered_count(&self) -> u64 {
        match self {
            TableResult::Loaded(page) => page.filtered_count,
            TableResult::Failed { .. } => 0,
        }
    }

    pub fn total_count(&self) -> u64 {
        match self {
            TableResult::Loaded(page) => page.total_count,
            TableResult::Failed { .. } => 0,
        }
    }
}
