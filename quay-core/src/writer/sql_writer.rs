use crate::{
    Column, ColumnType, ColumnValue, Columns, Filter, FilterClause, Join, Limit, LockType, OrderBy,
    Select, Table, Value, separated_by,
};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Dialect printer converting tables, clauses and values into MySQL statements.
///
/// Every method appends to `out`. Statement level methods (`write_select`, `write_insert_into`, ...)
/// emit one complete statement terminated by `;` so that several of them can be concatenated into a
/// single multi statement request. Drivers override single methods when their server disagrees.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers (`name`) doubling inner backticks.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(out, value, '`', "``");
        out.push('`');
    }

    fn write_table(&self, out: &mut String, table: &Table) {
        self.write_identifier_quoted(out, table.name());
    }

    fn write_column(&self, out: &mut String, column: &Column, qualify: bool) {
        if qualify && !column.table().is_empty() {
            self.write_identifier_quoted(out, column.table());
            out.push('.');
        }
        self.write_identifier_quoted(out, column.name());
    }

    fn write_column_type(&self, out: &mut String, column_type: &ColumnType) {
        match column_type {
            ColumnType::Char(width) => drop(write!(out, "CHAR({})", width)),
            ColumnType::TinyInt => out.push_str("INT(4)"),
            ColumnType::SmallInt => out.push_str("INT(6)"),
            ColumnType::MediumInt => out.push_str("INT(8)"),
            ColumnType::Int => out.push_str("INT(11)"),
            ColumnType::BigInt => out.push_str("INT(20)"),
            ColumnType::LongBlob => out.push_str("LONGBLOB"),
            ColumnType::Varchar(width) => drop(write!(out, "VARCHAR({})", width)),
        }
    }

    /// The value transformer: every value placed in a statement goes through here.
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => self.write_value_none(out),
            Value::Boolean(v) => self.write_value_bool(out, *v),
            Value::Int64(v) => write_integer!(out, *v),
            Value::UInt64(v) => write_integer!(out, *v),
            Value::Float64(v) => self.write_value_float(out, *v),
            Value::Varchar(v) => self.write_value_string(out, v),
            Value::Blob(v) => self.write_value_blob(out, v),
            Value::Json(v) => self.write_value_json(out, v),
            Value::LastInsertId => out.push_str("LAST_INSERT_ID()"),
            Value::Variable(v) => out.push_str(v.as_str()),
        }
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_float(&self, out: &mut String, value: f64) {
        if value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            out.push_str(buffer.format_finite(value));
        } else {
            log::warn!("Non finite float {} cannot be represented, writing NULL", value);
            self.write_value_none(out);
        }
    }

    /// Single quoted string with backslash escapes for the characters the server treats specially.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            let escaped = match c {
                '\0' => "\\0",
                '\x08' => "\\b",
                '\t' => "\\t",
                '\n' => "\\n",
                '\r' => "\\r",
                '\x1a' => "\\Z",
                '"' => "\\\"",
                '\'' => "\\'",
                '\\' => "\\\\",
                _ => continue,
            };
            out.push_str(&value[position..i]);
            out.push_str(escaped);
            position = i + 1;
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    /// Hexadecimal literal `0x...`.
    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        if value.is_empty() {
            out.push_str("X''");
        } else {
            out.push_str("0x");
            out.push_str(&hex::encode(value));
        }
    }

    fn write_value_json(&self, out: &mut String, value: &serde_json::Value) {
        self.write_value_string(out, &value.to_string());
    }

    /// `WHERE a AND b ...`
    fn write_filter(&self, out: &mut String, filter: &Filter) {
        out.push_str("WHERE ");
        separated_by(
            out,
            filter.clauses(),
            |out, v| self.write_filter_clause(out, v),
            " AND ",
        );
    }

    fn write_filter_clause(&self, out: &mut String, clause: &FilterClause) {
        match clause {
            FilterClause::Equals { column, value } => {
                self.write_column(out, column, false);
                out.push_str(" = ");
                self.write_value(out, value);
            }
            FilterClause::In { column, values } => {
                self.write_column(out, column, false);
                out.push_str(" IN (");
                separated_by(out, values, |out, v| self.write_value(out, v), ", ");
                out.push(')');
            }
            FilterClause::Comparison { column, op, value } => {
                self.write_column(out, column, false);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                self.write_value(out, value);
            }
            FilterClause::ColumnsEqual { column, other } => {
                self.write_column(out, column, true);
                out.push_str(" = ");
                self.write_column(out, other, true);
            }
        }
    }

    /// One `INNER JOIN` per clause, `owner` is the table being selected from.
    fn write_join(&self, out: &mut String, join: &Join, owner: &Table) {
        separated_by(
            out,
            join.clauses(),
            |out, v| {
                out.push_str("INNER JOIN ");
                self.write_identifier_quoted(out, &v.table);
                out.push_str(" ON ");
                self.write_identifier_quoted(out, &v.table);
                out.push('.');
                self.write_identifier_quoted(out, v.match_column.name());
                out.push_str(" = ");
                self.write_table(out, owner);
                out.push('.');
                self.write_identifier_quoted(out, v.column.name());
            },
            " ",
        );
    }

    fn write_order_by(&self, out: &mut String, order: &OrderBy) {
        out.push_str("ORDER BY ");
        self.write_column(out, &order.column, false);
        out.push(' ');
        out.push_str(order.order.as_str());
    }

    fn write_limit(&self, out: &mut String, limit: &Limit) {
        out.push_str("LIMIT ");
        match limit {
            Limit::Count(count) => write_integer!(out, *count),
            Limit::Range { offset, count } => {
                write_integer!(out, *offset);
                out.push(',');
                write_integer!(out, *count);
            }
        }
    }

    fn write_columns(&self, out: &mut String, columns: &Columns, qualify: bool) {
        match columns {
            Columns::All => out.push('*'),
            Columns::List(columns) => separated_by(
                out,
                columns,
                |out, v| self.write_column(out, v, qualify),
                ",",
            ),
            Columns::Expression(expression) => out.push_str(expression),
        }
    }

    /// `SELECT <cols> FROM <table> [join] [WHERE ...] [ORDER BY ...] [LIMIT ...];`
    fn write_select(&self, out: &mut String, select: &Select) {
        out.push_str("SELECT ");
        self.write_columns(out, &select.columns, select.join.is_some());
        out.push_str(" FROM ");
        self.write_table(out, select.table);
        if let Some(join) = &select.join {
            out.push(' ');
            self.write_join(out, join, select.table);
        }
        if let Some(filter) = &select.filter {
            out.push(' ');
            self.write_filter(out, filter);
        }
        if let Some(order) = &select.order {
            out.push(' ');
            self.write_order_by(out, order);
        }
        if let Some(limit) = &select.limit {
            out.push(' ');
            self.write_limit(out, limit);
        }
        out.push(';');
    }

    /// One `SELECT count(*),<cols> ...` per filter, combined with `UNION ALL` into a single statement.
    fn write_multi_select(
        &self,
        out: &mut String,
        table: &Table,
        filters: &[Filter],
        columns: &Columns,
        join: Option<&Join>,
    ) {
        separated_by(
            out,
            filters,
            |out, filter| {
                out.push_str("SELECT count(*),");
                if *columns == Columns::All {
                    // A bare `*` is only accepted first in the list
                    self.write_table(out, table);
                    out.push_str(".*");
                } else {
                    self.write_columns(out, columns, join.is_some());
                }
                out.push_str(" FROM ");
                self.write_table(out, table);
                if let Some(join) = join {
                    out.push(' ');
                    self.write_join(out, join, table);
                }
                out.push(' ');
                self.write_filter(out, filter);
            },
            " UNION ALL ",
        );
        out.push(';');
    }

    fn write_column_values(&self, out: &mut String, values: &[ColumnValue]) {
        out.push_str(" (");
        separated_by(
            out,
            values,
            |out, v| self.write_column(out, &v.column, false),
            ",",
        );
        out.push_str(") VALUES (");
        separated_by(out, values, |out, v| self.write_value(out, &v.value), ",");
        out.push(')');
    }

    /// `INSERT INTO <table> (<cols>) VALUES (<vals>);`
    fn write_insert_into(&self, out: &mut String, table: &Table, values: &[ColumnValue]) {
        out.push_str("INSERT INTO ");
        self.write_table(out, table);
        self.write_column_values(out, values);
        out.push(';');
    }

    /// `REPLACE <table> (<cols>) VALUES (<vals>);`
    fn write_replace(&self, out: &mut String, table: &Table, values: &[ColumnValue]) {
        out.push_str("REPLACE ");
        self.write_table(out, table);
        self.write_column_values(out, values);
        out.push(';');
    }

    /// `UPDATE <table> SET <col>=<val>[,...] WHERE ...;`
    fn write_update(
        &self,
        out: &mut String,
        table: &Table,
        values: &[ColumnValue],
        filter: &Filter,
    ) {
        out.push_str("UPDATE ");
        self.write_table(out, table);
        out.push_str(" SET ");
        separated_by(
            out,
            values,
            |out, v| {
                self.write_column(out, &v.column, false);
                out.push('=');
                self.write_value(out, &v.value);
            },
            ",",
        );
        out.push(' ');
        self.write_filter(out, filter);
        out.push(';');
    }

    /// `DELETE FROM <table> WHERE ...;`
    fn write_delete(&self, out: &mut String, table: &Table, filter: &Filter) {
        out.push_str("DELETE FROM ");
        self.write_table(out, table);
        out.push(' ');
        self.write_filter(out, filter);
        out.push(';');
    }

    fn write_truncate_table(&self, out: &mut String, table: &Table) {
        out.push_str("TRUNCATE TABLE ");
        self.write_table(out, table);
        out.push(';');
    }

    /// `SET <name> = <value>;`
    fn write_set(&self, out: &mut String, name: &str, value: &Value) {
        out.push_str("SET ");
        out.push_str(name);
        out.push_str(" = ");
        self.write_value(out, value);
        out.push(';');
    }

    fn write_lock_tables(&self, out: &mut String, tables: &[(&Table, LockType)]) {
        out.push_str("LOCK TABLES ");
        separated_by(
            out,
            tables,
            |out, (table, lock)| {
                self.write_table(out, table);
                out.push(' ');
                out.push_str(lock.as_str());
            },
            ", ",
        );
        out.push(';');
    }

    fn write_unlock_tables(&self, out: &mut String) {
        out.push_str("UNLOCK TABLES;");
    }

    fn write_create_database(&self, out: &mut String, name: &str) {
        out.push_str("CREATE DATABASE ");
        self.write_identifier_quoted(out, name);
        out.push(';');
    }

    fn write_use(&self, out: &mut String, database: &str) {
        out.push_str("USE ");
        self.write_identifier_quoted(out, database);
        out.push(';');
    }

    /// `CREATE TABLE IF NOT EXISTS <table> (<col defs>, PRIMARY KEY (<col>), UNIQUE KEY ...);`
    fn write_create_table(&self, out: &mut String, table: &Table) {
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_table(out, table);
        out.push_str(" (");
        separated_by(
            out,
            table.columns(),
            |out, v| self.write_create_table_column_fragment(out, v),
            ", ",
        );
        if let Some(primary_key) = table.primary_key() {
            out.push_str(", PRIMARY KEY (");
            self.write_column(out, primary_key, false);
            out.push(')');
        }
        for column in table.unique_columns() {
            out.push_str(", UNIQUE KEY ");
            self.write_identifier_quoted(out, &format!("{}_UNIQUE", column.name()));
            out.push_str(" (");
            self.write_column(out, column, false);
            out.push(')');
        }
        out.push_str(");");
    }

    fn write_create_table_column_fragment(&self, out: &mut String, column: &Column) {
        self.write_column(out, column, false);
        out.push(' ');
        self.write_column_type(out, &column.column_type());
        let attributes = column.attributes();
        if attributes.is_unsigned() {
            out.push_str(" UNSIGNED");
        }
        if attributes.is_not_null() {
            out.push_str(" NOT NULL");
        }
        if attributes.is_auto_increment() {
            out.push_str(" AUTO_INCREMENT");
        }
    }
}

#[derive(Default, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
