use crate::{Column, Error, InvalidArgumentError, Result, Value, invalid_argument};
use std::{fmt, str::FromStr, sync::Arc};

/// Comparison operator of a [`FilterClause::Comparison`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    #[default]
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    NotLike,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => "!=",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
            Comparison::Like => "LIKE",
            Comparison::NotLike => "NOT LIKE",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        Ok(match value.trim().to_ascii_uppercase().as_str() {
            "=" => Comparison::Equal,
            "!=" | "<>" => Comparison::NotEqual,
            "<" => Comparison::Less,
            "<=" => Comparison::LessEqual,
            ">" => Comparison::Greater,
            ">=" => Comparison::GreaterEqual,
            "LIKE" => Comparison::Like,
            "NOT LIKE" => Comparison::NotLike,
            _ => invalid_argument!("`{}` is not a comparison operator", value),
        })
    }
}

/// One condition of a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// `column = value`
    Equals { column: Arc<Column>, value: Value },
    /// `column IN (values...)`
    In {
        column: Arc<Column>,
        values: Vec<Value>,
    },
    /// `column <op> value`
    Comparison {
        column: Arc<Column>,
        op: Comparison,
        value: Value,
    },
    /// `` `a`.`column` = `b`.`other` ``, each side qualified by its own table.
    ColumnsEqual {
        column: Arc<Column>,
        other: Arc<Column>,
    },
}

impl FilterClause {
    pub fn equals(column: &Arc<Column>, value: impl Into<Value>) -> Self {
        FilterClause::Equals {
            column: column.clone(),
            value: value.into(),
        }
    }

    pub fn is_in<V: Into<Value>>(
        column: &Arc<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            invalid_argument!(
                "Membership filter on `{}` needs at least one value",
                column.name()
            );
        }
        Ok(FilterClause::In {
            column: column.clone(),
            values,
        })
    }

    /// Comparison with an operator given as text, for example `">"` or `"LIKE"`.
    pub fn compare(column: &Arc<Column>, op: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::compare_with(column, op.parse()?, value))
    }

    pub fn compare_with(column: &Arc<Column>, op: Comparison, value: impl Into<Value>) -> Self {
        FilterClause::Comparison {
            column: column.clone(),
            op,
            value: value.into(),
        }
    }

    pub fn columns_equal(column: &Arc<Column>, other: &Arc<Column>) -> Result<Self> {
        if column.table().is_empty() || other.table().is_empty() {
            invalid_argument!(
                "Column equality between `{}` and `{}` requires both columns to belong to a table",
                column.name(),
                other.name()
            );
        }
        Ok(FilterClause::ColumnsEqual {
            column: column.clone(),
            other: other.clone(),
        })
    }

    pub fn column(&self) -> &Arc<Column> {
        match self {
            FilterClause::Equals { column, .. }
            | FilterClause::In { column, .. }
            | FilterClause::Comparison { column, .. }
            | FilterClause::ColumnsEqual { column, .. } => column,
        }
    }
}

/// Non empty sequence of [`FilterClause`] combined with `AND`, rendered as a `WHERE` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    clauses: Vec<FilterClause>,
}

impl Filter {
    pub fn new(clause: FilterClause) -> Self {
        Self {
            clauses: vec![clause],
        }
    }

    pub fn all(clauses: impl IntoIterator<Item = FilterClause>) -> Result<Self> {
        let clauses: Vec<_> = clauses.into_iter().collect();
        if clauses.is_empty() {
            return Err(InvalidArgumentError::new("Filter needs at least one clause").into());
        }
        Ok(Self { clauses })
    }

    pub fn equals(column: &Arc<Column>, value: impl Into<Value>) -> Self {
        Self::new(FilterClause::equals(column, value))
    }

    pub fn is_in<V: Into<Value>>(
        column: &Arc<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        Ok(Self::new(FilterClause::is_in(column, values)?))
    }

    pub fn compare(column: &Arc<Column>, op: &str, value: impl Into<Value>) -> Result<Self> {
        Ok(Self::new(FilterClause::compare(column, op, value)?))
    }

    pub fn columns_equal(column: &Arc<Column>, other: &Arc<Column>) -> Result<Self> {
        Ok(Self::new(FilterClause::columns_equal(column, other)?))
    }

    /// Append one more condition.
    pub fn and(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }
}

impl From<FilterClause> for Filter {
    fn from(value: FilterClause) -> Self {
        Filter::new(value)
    }
}
