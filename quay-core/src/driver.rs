use crate::{Connection, ConnectionConfig, Result, SqlWriter};
use std::future::Future;

/// Entry point of a database backend: opens connections and provides the dialect printer.
pub trait Driver: Send + Sync {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    /// Open one physical connection.
    fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<Self::Connection>> + Send;
}
