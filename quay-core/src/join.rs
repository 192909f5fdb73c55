use crate::{Column, InvalidArgumentError, Result, Table, invalid_argument};
use std::sync::Arc;

/// One `INNER JOIN`.
///
/// Renders `` INNER JOIN `joined` ON `joined`.`match_column` = `owner`.`column` `` where the owner is
/// the table the statement selects from. When no match column is given, the joined table is matched
/// on a column with the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub table: String,
    pub column: Arc<Column>,
    pub match_column: Arc<Column>,
}

impl JoinClause {
    pub fn on(table: &Table, column: &Arc<Column>) -> Self {
        Self {
            table: table.name().to_owned(),
            column: column.clone(),
            match_column: column.clone(),
        }
    }

    pub fn on_columns(
        table: &Table,
        column: &Arc<Column>,
        match_column: &Arc<Column>,
    ) -> Result<Self> {
        if !match_column.table().is_empty() && match_column.table() != table.name() {
            invalid_argument!(
                "Join on `{}` cannot match column `{}` of table `{}`",
                table.name(),
                match_column.name(),
                match_column.table()
            );
        }
        Ok(Self {
            table: table.name().to_owned(),
            column: column.clone(),
            match_column: match_column.clone(),
        })
    }
}

/// Non empty sequence of [`JoinClause`], rendered separated by a single space.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    clauses: Vec<JoinClause>,
}

impl Join {
    pub fn new(clause: JoinClause) -> Self {
        Self {
            clauses: vec![clause],
        }
    }

    pub fn all(clauses: impl IntoIterator<Item = JoinClause>) -> Result<Self> {
        let clauses: Vec<_> = clauses.into_iter().collect();
        if clauses.is_empty() {
            return Err(InvalidArgumentError::new("Join needs at least one clause").into());
        }
        Ok(Self { clauses })
    }

    pub fn on(table: &Table, column: &Arc<Column>) -> Self {
        Self::new(JoinClause::on(table, column))
    }

    pub fn on_columns(
        table: &Table,
        column: &Arc<Column>,
        match_column: &Arc<Column>,
    ) -> Result<Self> {
        Ok(Self::new(JoinClause::on_columns(table, column, match_column)?))
    }

    pub fn and(mut self, clause: JoinClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[JoinClause] {
        &self.clauses
    }
}

impl From<JoinClause> for Join {
    fn from(value: JoinClause) -> Self {
        Join::new(value)
    }
}
