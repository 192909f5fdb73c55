use crate::{QueryResult, Result};
use futures::Stream;
use std::future::Future;

/// One physical connection owned by a [`crate::StatementPerformer`].
pub trait Connection: Send + Sized {
    /// Execute one or more `;` terminated statements sent as a single request.
    ///
    /// Rows and per statement metadata are yielded in execution order, the first failing statement
    /// ends the stream with its error.
    fn run(&mut self, sql: String) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Close the connection, releasing every server side resource (including table locks).
    fn destroy(self) -> impl Future<Output = Result<()>> + Send;
}
