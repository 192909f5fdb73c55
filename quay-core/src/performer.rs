use crate::{
    Column, ColumnValue, Columns, Connection, ConnectionConfig, Driver, Error, Filter, Join,
    LockType, Result, RowLabeled, RowsAffected, Select, SqlWriter, Table, Value, invalid_argument,
    select::check_column_values, shape_results, truncate_long,
};
use futures::TryStreamExt;

/// Outcome of a batch scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Batched<T> {
    /// Rows returned by the statements flushed when the scope exited, in order.
    pub rows: Vec<RowLabeled>,
    /// Metadata reported for the flushed statements that returned no rows.
    pub affected: RowsAffected,
    /// Whatever the operation produced.
    pub value: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flush {
    /// Only the outermost scope sends the queue.
    Outermost,
    /// The scope sends the queue when it exits, reads need their rows right away.
    OnExit,
}

/// Composes statements and sends them over a single physical connection.
///
/// Statements are appended to a pending queue by the `queue_*` methods and sent as one multi
/// statement request when a batch scope exits. The connection is opened lazily by the first scope
/// and destroyed when the last one exits, nested scopes share it:
///
/// ```rust,ignore
/// performer
///     .batch(true, async |performer| {
///         performer.queue_insert_into(&users, &[ColumnValue::new(name, "Ann")])?;
///         performer.queue_set("@id", Value::LastInsertId)?;
///         performer
///             .batch(false, async |p| Ok(p.queue_truncate_table(&log)))
///             .await?;
///         Ok(())
///     })
///     .await?;
/// ```
///
/// A failure inside a scope clears the queue and, when the scope asked for it (or it was the last
/// one), tears the connection down before the error reaches the caller.
pub struct StatementPerformer<D: Driver> {
    driver: D,
    config: ConnectionConfig,
    connection: Option<D::Connection>,
    nesting: usize,
    /// Enclosing scopes still running after a failed nested scope destroyed the connection.
    orphaned: usize,
    /// Bumped by every teardown, a scope that sees a different value on exit was orphaned.
    epoch: u64,
    need_use: bool,
    database: Option<String>,
    statements: Vec<String>,
}

impl<D: Driver> StatementPerformer<D> {
    pub fn new(driver: D, config: ConnectionConfig) -> Self {
        let database = config.database.clone();
        Self {
            driver,
            config,
            connection: None,
            nesting: 0,
            orphaned: 0,
            epoch: 0,
            need_use: true,
            database,
            statements: Vec::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
    /// Database selected on the connection (or that will be selected by the next one).
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
    /// Number of batch scopes currently sharing the connection.
    pub fn nesting(&self) -> usize {
        self.nesting
    }
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
    /// Statements queued and not flushed yet.
    pub fn pending(&self) -> &[String] {
        &self.statements
    }

    fn queue(&mut self, statement: String) {
        log::trace!("Queued: {}", truncate_long!(statement));
        self.statements.push(statement);
    }

    fn compose(&self, f: impl FnOnce(&D::SqlWriter, &mut String)) -> String {
        let mut out = String::new();
        f(&self.driver.sql_writer(), &mut out);
        out
    }

    /// Switch to `database`. A `USE` statement is queued only when the open connection already
    /// selected a different one, a fresh connection selects it anyway.
    pub fn use_database(&mut self, database: impl Into<String>) {
        let database = database.into();
        if self.connection.is_some()
            && !self.need_use
            && self.database.as_deref() != Some(database.as_str())
        {
            let statement = self.compose(|w, out| w.write_use(out, &database));
            self.queue(statement);
        }
        self.database = Some(database);
    }

    /// Run `operation` inside a batch scope.
    ///
    /// The first scope opens the connection, nested scopes (including the ones opened by `select`,
    /// `count` and the other helpers) share it. Statements queued by `operation` are sent when the
    /// outermost scope exits, as a single request prefixed by `USE <database>;` on a fresh connection.
    /// The connection is destroyed when the outermost scope exits, or as soon as this scope fails if
    /// `destroy_on_error` is set. Errors are returned only after that cleanup.
    ///
    /// After a nested scope destroyed the connection, the enclosing scopes keep running but cannot
    /// reach the server again: any scope (or read) they open fails immediately, and statements they
    /// queue make the outermost scope return an error. The next outermost scope connects afresh.
    pub async fn batch<T>(
        &mut self,
        destroy_on_error: bool,
        operation: impl AsyncFnOnce(&mut Self) -> Result<T>,
    ) -> Result<Batched<T>> {
        self.scope(destroy_on_error, Flush::Outermost, operation).await
    }

    /// Batch scope with `destroy_on_error` set that locks `tables` for writing around `operation`.
    ///
    /// `LOCK TABLES ... WRITE` is queued first and `UNLOCK TABLES` after `operation` succeeds, both in
    /// the same scope. If `operation` fails the connection is destroyed, which also releases the locks.
    ///
    /// Lock and unlock travel in the same request only when `operation` performs no reads. A read
    /// (`select`, `count`, ...) sends `LOCK TABLES` together with its own statement, and `UNLOCK
    /// TABLES` follows in a later request on the same connection.
    pub async fn batch_locked_for_write<T>(
        &mut self,
        tables: &[&Table],
        operation: impl AsyncFnOnce(&mut Self) -> Result<T>,
    ) -> Result<Batched<T>> {
        let locks: Vec<_> = tables.iter().map(|v| (*v, LockType::Write)).collect();
        let lock = self.compose_lock_tables(&locks)?;
        self.batch(true, async move |performer| {
            performer.queue(lock);
            let value = operation(&mut *performer).await?;
            performer.queue_unlock_tables();
            Ok(value)
        })
        .await
    }

    async fn scope<T>(
        &mut self,
        destroy_on_error: bool,
        flush: Flush,
        operation: impl AsyncFnOnce(&mut Self) -> Result<T>,
    ) -> Result<Batched<T>> {
        if self.orphaned > 0 {
            self.statements.clear();
            return Err(Error::msg(
                "Cannot open a batch scope, the connection was destroyed by a failed nested batch",
            ));
        }
        if self.connection.is_none() {
            log::trace!("Connecting to {}", truncate_long!(self.config.url));
            match self.driver.connect(&self.config).await {
                Ok(connection) => {
                    self.connection = Some(connection);
                    self.need_use = true;
                }
                Err(e) => {
                    self.statements.clear();
                    return Err(e);
                }
            }
        }
        self.nesting += 1;
        let epoch = self.epoch;
        log::trace!("Entered batch scope, nesting {}", self.nesting);

        let result = match operation(&mut *self).await {
            Ok(value) => {
                let send = self.nesting <= 1 || flush == Flush::OnExit;
                if send && !self.statements.is_empty() {
                    self.flush().await.map(|(rows, affected)| Batched {
                        rows,
                        affected,
                        value,
                    })
                } else {
                    Ok(Batched {
                        rows: Vec::new(),
                        affected: RowsAffected::default(),
                        value,
                    })
                }
            }
            Err(e) => Err(e),
        };

        if result.is_err() {
            self.statements.clear();
        }
        if epoch != self.epoch {
            // The connection is already gone, only the chain bookkeeping is left
            self.orphaned = self.orphaned.saturating_sub(1);
            log::trace!("Exited orphaned batch scope, {} left", self.orphaned);
            return result;
        }
        self.nesting = self.nesting.saturating_sub(1);
        log::trace!("Exited batch scope, nesting {}", self.nesting);
        if self.nesting == 0 || (result.is_err() && destroy_on_error) {
            self.teardown().await;
        }
        result
    }

    /// Send the whole queue as one request and shape the returned rows.
    async fn flush(&mut self) -> Result<(Vec<RowLabeled>, RowsAffected)> {
        let Some(connection) = self.connection.as_mut() else {
            self.statements.clear();
            return Err(Error::msg(
                "Cannot send the pending statements, the connection was destroyed by a failed nested batch",
            ));
        };
        let mut sql = String::new();
        if self.need_use
            && let Some(database) = &self.database
        {
            self.driver.sql_writer().write_use(&mut sql, database);
        }
        for statement in self.statements.drain(..) {
            sql.push_str(&statement);
        }
        self.need_use = false;
        log::debug!("{}", truncate_long!(sql));
        let results = connection.run(sql).try_collect::<Vec<_>>().await?;
        Ok(shape_results(results))
    }

    async fn teardown(&mut self) {
        self.orphaned = self.nesting;
        self.epoch = self.epoch.wrapping_add(1);
        self.nesting = 0;
        self.need_use = true;
        self.statements.clear();
        if let Some(connection) = self.connection.take() {
            log::trace!("Destroying the connection");
            if let Err(e) = connection.destroy().await {
                log::warn!("Error while destroying the connection: {:#}", e);
            }
        }
    }

    /// Read scope: queue `statement` and send it (with anything queued before) on exit.
    async fn read(&mut self, destroy_on_error: bool, statement: String) -> Result<Vec<RowLabeled>> {
        let batched = self
            .scope(destroy_on_error, Flush::OnExit, async move |performer| {
                performer.queue(statement);
                Ok(())
            })
            .await?;
        Ok(batched.rows)
    }

    /// `SELECT <cols> FROM <table> [join] [WHERE ...] [ORDER BY ...] [LIMIT ...];`
    pub async fn select(&mut self, select: &Select<'_>) -> Result<Vec<RowLabeled>> {
        let statement = self.compose(|w, out| w.write_select(out, select));
        self.read(false, statement).await
    }

    /// Fetch count and rows for several filters in a single round trip.
    ///
    /// Every filter produces a `SELECT count(*),<cols> FROM <table> [join] WHERE ...` block, the blocks
    /// are combined with `UNION ALL`.
    pub async fn multi_select(
        &mut self,
        destroy_on_error: bool,
        table: &Table,
        filters: &[Filter],
        columns: impl Into<Columns>,
        join: Option<&Join>,
    ) -> Result<Vec<RowLabeled>> {
        if filters.is_empty() {
            invalid_argument!("Multi select on `{}` needs at least one filter", table.name());
        }
        let columns = columns.into();
        let statement =
            self.compose(|w, out| w.write_multi_select(out, table, filters, &columns, join));
        self.read(destroy_on_error, statement).await
    }

    /// `SELECT COUNT(*) FROM <table> [WHERE ...]`
    pub async fn count(&mut self, table: &Table, filter: Option<Filter>) -> Result<u64> {
        let mut select = Select::from(table).columns("COUNT(*)");
        select.filter = filter;
        let rows = self.select(&select).await?;
        let value = first_value(&rows, "COUNT(*)");
        value.as_u64().ok_or_else(|| {
            Error::msg(format!(
                "Unexpected result {:?} while counting the rows of `{}`",
                value,
                table.name()
            ))
        })
    }

    /// `SELECT SUM(<column>) AS total FROM <table> [join] [WHERE ...]`, `Value::Null` when nothing matches.
    pub async fn sum(
        &mut self,
        table: &Table,
        column: &Column,
        join: Option<Join>,
        filter: Option<Filter>,
    ) -> Result<Value> {
        let expression = self.compose(|w, out| {
            out.push_str("SUM(");
            w.write_column(out, column, join.is_some());
            out.push_str(") AS total");
        });
        let mut select = Select::from(table).columns(expression);
        select.join = join;
        select.filter = filter;
        let rows = self.select(&select).await?;
        Ok(first_value(&rows, "total").clone())
    }

    pub fn queue_create_table(&mut self, table: &Table) {
        let statement = self.compose(|w, out| w.write_create_table(out, table));
        self.queue(statement);
    }

    pub fn queue_insert_into(&mut self, table: &Table, values: &[ColumnValue]) -> Result<()> {
        check_column_values("INSERT", table, values)?;
        let statement = self.compose(|w, out| w.write_insert_into(out, table, values));
        self.queue(statement);
        Ok(())
    }

    pub fn queue_replace(&mut self, table: &Table, values: &[ColumnValue]) -> Result<()> {
        check_column_values("REPLACE", table, values)?;
        let statement = self.compose(|w, out| w.write_replace(out, table, values));
        self.queue(statement);
        Ok(())
    }

    pub fn queue_update(
        &mut self,
        table: &Table,
        values: &[ColumnValue],
        filter: &Filter,
    ) -> Result<()> {
        check_column_values("UPDATE", table, values)?;
        let statement = self.compose(|w, out| w.write_update(out, table, values, filter));
        self.queue(statement);
        Ok(())
    }

    pub fn queue_delete(&mut self, table: &Table, filter: &Filter) {
        let statement = self.compose(|w, out| w.write_delete(out, table, filter));
        self.queue(statement);
    }

    pub fn queue_truncate_table(&mut self, table: &Table) {
        let statement = self.compose(|w, out| w.write_truncate_table(out, table));
        self.queue(statement);
    }

    /// `SET <name> = <value>;`, for example `queue_set("@id", Value::LastInsertId)`.
    pub fn queue_set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if name.trim().is_empty() || name.contains(';') {
            invalid_argument!("`{}` cannot be the target of SET", name);
        }
        let value = value.into();
        let statement = self.compose(|w, out| w.write_set(out, name, &value));
        self.queue(statement);
        Ok(())
    }

    pub fn queue_lock_tables(&mut self, tables: &[(&Table, LockType)]) -> Result<()> {
        let statement = self.compose_lock_tables(tables)?;
        self.queue(statement);
        Ok(())
    }

    pub fn queue_unlock_tables(&mut self) {
        let statement = self.compose(|w, out| w.write_unlock_tables(out));
        self.queue(statement);
    }

    pub fn queue_create_database(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            invalid_argument!("Database name must not be empty");
        }
        let statement = self.compose(|w, out| w.write_create_database(out, name));
        self.queue(statement);
        Ok(())
    }

    fn compose_lock_tables(&self, tables: &[(&Table, LockType)]) -> Result<String> {
        if tables.is_empty() {
            invalid_argument!("LOCK TABLES needs at least one table");
        }
        Ok(self.compose(|w, out| w.write_lock_tables(out, tables)))
    }
}

fn first_value<'r>(rows: &'r [RowLabeled], label: &str) -> &'r Value {
    static NULL: Value = Value::Null;
    rows.first()
        .and_then(|row| row.get_column(label).or_else(|| row.values().first()))
        .unwrap_or(&NULL)
}
