//! Column descriptors: how a column reads its cell out of a record and which
//! sort/filter metadata the server expects for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SORT_TYPE: &str = "alphanumeric";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessor {
    /// Dot separated path into the record, e.g. `address.city.city`.
    Path { path: String },
    /// Non-empty string values at `paths`, joined by `separator`.
    JoinNonEmpty {
        paths: Vec<String>,
        separator: String,
    },
    /// Boolean field rendered as one of two labels.
    Flag {
        path: String,
        on: String,
        off: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: Option<String>,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            label: label.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FilterInput {
    Text,
    Select(Vec<FilterOption>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub id: String,
    pub header: String,
    pub accessor: Accessor,
    pub sort_type: Option<String>,
    pub filter: Option<String>,
    pub filter_input: FilterInput,
    pub can_sort: bool,
    pub can_filter: bool,
}

impl ColumnDescriptor {
    /// Column whose id doubles as the record path.
    pub fn path(id: impl Into<String>, header: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::Path { path: id.clone() },
            id,
            header: header.into(),
            sort_type: Some(DEFAULT_SORT_TYPE.to_string()),
            filter: None,
            filter_input: FilterInput::Text,
            can_sort: true,
            can_filter: true,
        }
    }

    pub fn with_accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_select(mut self, options: Vec<FilterOption>) -> Self {
        self.filter_input = FilterInput::Select(options);
        self
    }

    pub fn placeholder(&self) -> String {
        format!("Search {}", self.header)
    }

    pub fn cell_text(&self, record: &Value) -> String {
        match &self.accessor {
            Accessor::Path { path } => lookup(record, path).map(scalar_text).unwrap_or_default(),
            Accessor::JoinNonEmpty { paths, separator } => paths
                .iter()
                .filter_map(|path| lookup(record, path))
                .map(scalar_text)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(separator),
            Accessor::Flag { path, on, off } => {
                let set = match lookup(record, path) {
                    Some(Value::Bool(flag)) => *flag,
                    Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
                    Some(Value::String(s)) => !s.is_empty(),
                    _ => false,
                };
                if set { on.clone() } else { off.clone() }
            }
        }
    }
}

pub fn find_column<'a>(columns: &'a [ColumnDescriptor], id: &str) -> Option<&'a ColumnDescriptor> {
    columns.iter().find(|column| column.id == id)
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |value, segment| value.get(segment))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn customer() -> Value {
        json!({
            "firstName": "Mary",
            "activebool": true,
            "address": {
                "address": "1913 Hanoi Way",
                "address2": "",
                "postalCode": null,
                "city": { "city": "Sasebo", "country": { "country": "Japan" } }
            }
        })
    }

    #[test]
    fn path_accessor_walks_nested_objects() {
        let column = ColumnDescriptor::path("address.city.country.country", "Country");
        assert_eq!(column.cell_text(&customer()), "Japan");
    }

    #[test]
    fn missing_and_null_values_render_empty() {
        let record = customer();
        assert_eq!(ColumnDescriptor::path("address.postalCode", "Zip").cell_text(&record), "");
        assert_eq!(ColumnDescriptor::path("lastName", "Last").cell_text(&record), "");
    }

    #[test]
    fn join_skips_empty_parts() {
        let column = ColumnDescriptor::path("address.address", "Address").with_accessor(
            Accessor::JoinNonEmpty {
                paths: vec!["address.address".into(), "address.address2".into()],
                separator: " ".into(),
            },
        );
        assert_eq!(column.cell_text(&customer()), "1913 Hanoi Way");
    }

    #[test]
    fn flag_renders_labels() {
        let column = ColumnDescriptor::path("activebool", "Active").with_accessor(Accessor::Flag {
            path: "activebool".into(),
            on: "active".into(),
            off: "non-active".into(),
        });
        assert_eq!(column.cell_text(&customer()), "active");
        assert_eq!(column.cell_text(&json!({ "activebool": false })), "non-active");
    }

    #[test]
    fn numbers_render_verbatim() {
        let column = ColumnDescriptor::path("rentalRate", "Rental Rate");
        assert_eq!(column.cell_text(&json!({ "rentalRate": 4.99 })), "4.99");
    }
}
