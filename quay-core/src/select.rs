use crate::{Column, Filter, Join, Limit, OrderBy, Result, Table, Value, invalid_argument};
use std::sync::Arc;

/// What a `SELECT` returns.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    /// Explicit column list. Columns get qualified by their table when the select has a join.
    List(Vec<Arc<Column>>),
    /// Raw expression written as is, for example `COUNT(*)` or `SUM(amount) AS total`.
    Expression(String),
}

impl From<&str> for Columns {
    fn from(value: &str) -> Self {
        if value.trim() == "*" {
            Columns::All
        } else {
            Columns::Expression(value.to_owned())
        }
    }
}

impl From<String> for Columns {
    fn from(value: String) -> Self {
        if value.trim() == "*" {
            Columns::All
        } else {
            Columns::Expression(value)
        }
    }
}

impl From<Vec<Arc<Column>>> for Columns {
    fn from(value: Vec<Arc<Column>>) -> Self {
        Columns::List(value)
    }
}

impl From<&[Arc<Column>]> for Columns {
    fn from(value: &[Arc<Column>]) -> Self {
        Columns::List(value.to_vec())
    }
}

impl<const N: usize> From<[&Arc<Column>; N]> for Columns {
    fn from(value: [&Arc<Column>; N]) -> Self {
        Columns::List(value.into_iter().cloned().collect())
    }
}

/// A `SELECT` statement under construction.
///
/// ```rust,ignore
/// let select = Select::from(&users)
///     .columns([users.try_column("id")?, users.try_column("name")?])
///     .filter(Filter::compare(users.try_column("age")?, ">", 18)?)
///     .order_by(OrderBy::new(users.try_column("name")?))
///     .limit(Limit::new(10));
/// ```
#[derive(Debug, Clone)]
pub struct Select<'t> {
    pub table: &'t Table,
    pub columns: Columns,
    pub join: Option<Join>,
    pub filter: Option<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<Limit>,
}

impl<'t> Select<'t> {
    pub fn from(table: &'t Table) -> Self {
        Self {
            table,
            columns: Columns::All,
            join: None,
            filter: None,
            order: None,
            limit: None,
        }
    }
    pub fn columns(mut self, columns: impl Into<Columns>) -> Self {
        self.columns = columns.into();
        self
    }
    pub fn join(mut self, join: impl Into<Join>) -> Self {
        self.join = Some(join.into());
        self
    }
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }
    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Column assignment used by `INSERT`, `REPLACE` and `UPDATE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub column: Arc<Column>,
    pub value: Value,
}

impl ColumnValue {
    pub fn new(column: &Arc<Column>, value: impl Into<Value>) -> Self {
        Self {
            column: column.clone(),
            value: value.into(),
        }
    }
}

pub(crate) fn check_column_values(
    statement: &str,
    table: &Table,
    values: &[ColumnValue],
) -> Result<()> {
    if values.is_empty() {
        invalid_argument!("{} on `{}` needs at least one column value", statement, table.name());
    }
    if let Some(v) = values
        .iter()
        .find(|v| !v.column.table().is_empty() && v.column.table() != table.name())
    {
        invalid_argument!(
            "{} on `{}` cannot assign column `{}` of table `{}`",
            statement,
            table.name(),
            v.column.name(),
            v.column.table()
        );
    }
    Ok(())
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockType {
    Read,
    #[default]
    Write,
}

impl LockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Read => "READ",
            LockType::Write => "WRITE",
        }
    }
}
