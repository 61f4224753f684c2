use sea_orm::Order;

use crate::api::request_result::RequestError;

/// A parsed `?ordering=` value: a field name, optionally prefixed with `-` for
/// descending order.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey<'a> {
    pub field: &'a str,
    pub order: Order,
}

impl<'a> SortKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self {
                field,
                order: Order::Desc,
            },
            None => Self {
                field: raw,
                order: Order::Asc,
            },
        }
    }

    pub fn unsupported(&self) -> RequestError {
        RequestError::business_rule(format!("Cannot order by '{}'.", self.field))
    }
}
