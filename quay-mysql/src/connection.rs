use crate::{MySQLDriver, RowWrap};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, prelude::Queryable};
use quay_core::{
    Connection, Driver, Error, ErrorContext, QueryResult, Result, RowsAffected,
    stream::{Stream, TryStreamExt},
    truncate_long,
};
use std::{borrow::Cow, future::Future, sync::Arc};
use url::Url;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

impl MySQLConnection {
    pub async fn connect(url: Cow<'static, str>) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", MySQLDriver::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url).with_context(context)?;
        let config = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(config).await.with_context(context)?;
        Ok(MySQLConnection { connection })
    }
}

impl Connection for MySQLConnection {
    fn run(&mut self, sql: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", truncate_long!(sql)));
        try_stream! {
            let mut result = self.connection.query_iter(sql).await?;
            let mut rows = 0;
            while !result.is_empty() {
                for row in result.collect::<RowWrap>().await? {
                    rows += 1;
                    yield QueryResult::Row(row.0);
                }
            }
            let affected = result.affected_rows();
            if rows == 0 && affected > 0 {
                yield QueryResult::Affected(RowsAffected {
                    rows_affected: affected,
                    last_insert_id: result.last_insert_id(),
                });
            }
        }
        .map_err(move |e: Error| {
            let error = e.context(context.clone());
            log::error!("{:#}", error);
            error
        })
    }

    fn destroy(self) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.connection
                .disconnect()
                .await
                .context("While closing the MySQL connection")
        }
    }
}
