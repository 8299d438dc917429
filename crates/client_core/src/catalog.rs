//! The two remote tables the app knows about: their endpoints and columns.

use anyhow::Context;
use shared::{
    columns::{Accessor, ColumnDescriptor, FilterOption},
    domain::TableKind,
};
use url::Url;

pub const CUSTOMERS_PATH: &str = "/api/datatable/customers";
pub const FILMS_PATH: &str = "/api/datatable/films";

pub fn endpoint_path(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Customers => CUSTOMERS_PATH,
        TableKind::Films => FILMS_PATH,
    }
}

pub fn endpoint_url(base: &Url, kind: TableKind) -> anyhow::Result<Url> {
    let raw = format!(
        "{}{}",
        base.as_str().trim_end_matches('/'),
        endpoint_path(kind)
    );
    Url::parse(&raw).with_context(|| format!("invalid endpoint url '{raw}'"))
}

pub fn columns_for(kind: TableKind) -> Vec<ColumnDescriptor> {
    match kind {
        TableKind::Customers => customer_columns(),
        TableKind::Films => film_columns(),
    }
}

pub fn customer_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::path("firstName", "First Name"),
        ColumnDescriptor::path("lastName", "Last Name"),
        ColumnDescriptor::path("address.address", "Address").with_accessor(
            Accessor::JoinNonEmpty {
                paths: vec!["address.address".into(), "address.address2".into()],
                separator: " ".into(),
            },
        ),
        ColumnDescriptor::path("address.city.city", "City"),
        ColumnDescriptor::path("address.postalCode", "Zip Code"),
        ColumnDescriptor::path("address.city.country.country", "Country"),
        ColumnDescriptor::path("address.phone", "Phone"),
        ColumnDescriptor::path("activebool", "Active")
            .with_accessor(Accessor::Flag {
                path: "activebool".into(),
                on: "active".into(),
                off: "non-active".into(),
            })
            .with_filter("includes")
            .with_select(vec![
                FilterOption::new("*", None),
                FilterOption::new("active", Some("1")),
                FilterOption::new("Non active", Some("0")),
            ]),
    ]
}

pub fn film_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::path("title", "Title"),
        ColumnDescriptor::path("description", "Description"),
        ColumnDescriptor::path("releaseYear", "Release Year"),
        ColumnDescriptor::path("language.name", "Language"),
        ColumnDescriptor::path("length", "Length"),
        ColumnDescriptor::path("rating", "Rating"),
        ColumnDescriptor::path("rentalRate", "Rental Rate"),
    ]
}
