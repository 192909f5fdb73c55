use crate::{Column, GenericSqlWriter, InvalidArgumentError, Result, SqlWriter, invalid_argument};
use std::{collections::HashMap, sync::Arc};

/// Named, ordered collection of columns.
///
/// Columns are shared through `Arc` so that clauses can hold on to them independently of the table.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<Arc<Column>>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = Column>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            invalid_argument!("Table name must not be empty");
        }
        let mut result = Self {
            name,
            columns: Vec::new(),
            index: HashMap::new(),
        };
        for mut column in columns {
            if result.index.contains_key(column.name()) {
                invalid_argument!(
                    "Table `{}` declares column `{}` more than once",
                    result.name,
                    column.name()
                );
            }
            if column.attributes().is_primary_key() && result.primary_key().is_some() {
                invalid_argument!(
                    "Table `{}` declares more than one primary key column",
                    result.name
                );
            }
            column.table = result.name.clone();
            result
                .index
                .insert(column.name().to_owned(), result.columns.len());
            result.columns.push(Arc::new(column));
        }
        if result.columns.is_empty() {
            invalid_argument!("Table `{}` must have at least one column", result.name);
        }
        Ok(result)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    /// `` `name` ``
    pub fn sql_name(&self) -> String {
        let mut out = String::new();
        GenericSqlWriter::new().write_table(&mut out, self);
        out
    }
    pub fn columns(&self) -> &[Arc<Column>] {
        &self.columns
    }
    pub fn column(&self, name: &str) -> Option<&Arc<Column>> {
        self.index.get(name).map(|i| &self.columns[*i])
    }
    /// Like [`Table::column`] but fails with an [`InvalidArgumentError`] for unknown names.
    pub fn try_column(&self, name: &str) -> Result<&Arc<Column>> {
        self.column(name).ok_or_else(|| {
            InvalidArgumentError::new(format!(
                "Table `{}` has no column `{}`",
                self.name, name
            ))
            .into()
        })
    }
    pub fn primary_key(&self) -> Option<&Arc<Column>> {
        self.columns.iter().find(|c| c.attributes().is_primary_key())
    }
    pub fn unique_columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter().filter(|c| c.attributes().is_unique())
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.columns == other.columns
    }
}
