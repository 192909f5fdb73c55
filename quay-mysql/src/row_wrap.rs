use crate::ValueWrap;
use mysql_async::FromRowError;
use quay_core::{Row, RowLabeled, RowNames};

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl mysql_async::prelude::FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let names: RowNames = row
            .columns_ref()
            .iter()
            .map(|v| v.name_str().into_owned())
            .collect();
        let values: Option<Row> = (0..row.len())
            .map(|i| match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => Some(v.0),
                _ => None,
            })
            .collect();
        match values {
            Some(values) => Ok(RowWrap(RowLabeled::new(names, values))),
            None => Err(FromRowError(row)),
        }
    }
}
