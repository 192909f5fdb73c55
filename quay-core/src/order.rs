use crate::{Column, Error, Result, invalid_argument};
use std::{str::FromStr, sync::Arc};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    ASC,
    DESC,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::ASC => "ASC",
            Order::DESC => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        if value.eq_ignore_ascii_case("ASC") {
            Ok(Order::ASC)
        } else if value.eq_ignore_ascii_case("DESC") {
            Ok(Order::DESC)
        } else {
            invalid_argument!("`{}` is not a sort order, expected ASC or DESC", value)
        }
    }
}

/// `ORDER BY column ASC|DESC`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: Arc<Column>,
    pub order: Order,
}

impl OrderBy {
    pub fn new(column: &Arc<Column>) -> Self {
        Self::with_order(column, Order::ASC)
    }
    pub fn desc(column: &Arc<Column>) -> Self {
        Self::with_order(column, Order::DESC)
    }
    pub fn with_order(column: &Arc<Column>, order: Order) -> Self {
        Self {
            column: column.clone(),
            order,
        }
    }
}
