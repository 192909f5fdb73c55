use quay::{
    Column, ColumnAttributes, ColumnType, ColumnValue, Columns, Driver, Filter, Limit, OrderBy,
    Select, StatementPerformer, Table, Value,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub async fn counters<D: Driver>(performer: &mut StatementPerformer<D>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    let table = Table::new(
        "quay_counters",
        [
            Column::new(
                "name",
                ColumnType::Varchar(64),
                ColumnAttributes::PRIMARY_KEY | ColumnAttributes::NOT_NULL,
            )
            .unwrap(),
            Column::new("amount", ColumnType::BigInt, ColumnAttributes::NOT_NULL).unwrap(),
            Column::new("note", ColumnType::Varchar(255), ColumnAttributes::NONE).unwrap(),
        ],
    )
    .expect("Failed to define the quay_counters table");
    let name = table.try_column("name").unwrap();
    let amount = table.try_column("amount").unwrap();
    let note = table.try_column("note").unwrap();

    // Setup
    performer
        .batch(true, async |p| {
            p.queue_create_table(&table);
            p.queue_truncate_table(&table);
            Ok(())
        })
        .await
        .expect("Failed to create the quay_counters table");

    // Insert
    performer
        .batch(true, async |p| {
            for (n, v) in [("alpha", 1), ("bravo", 2), ("charlie", 3)] {
                p.queue_insert_into(
                    &table,
                    &[ColumnValue::new(name, n), ColumnValue::new(amount, v)],
                )?;
            }
            p.queue_replace(
                &table,
                &[
                    ColumnValue::new(name, "charlie"),
                    ColumnValue::new(amount, 3),
                    ColumnValue::new(note, "it's \"quoted\"\n\\ and \u{1F980}"),
                ],
            )?;
            Ok(())
        })
        .await
        .expect("Failed to insert the counters");
    assert_eq!(performer.count(&table, None).await.expect("Failed to count"), 3);

    // Select
    let select = Select::from(&table)
        .columns([name, note])
        .filter(Filter::compare(amount, ">", 1).unwrap())
        .order_by(OrderBy::desc(amount))
        .limit(Limit::new(1));
    let rows = performer
        .select(&select)
        .await
        .expect("Failed to select the largest counter");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_column("name").and_then(Value::as_str), Some("charlie"));
    assert_eq!(
        rows[0].get_column("note").and_then(Value::as_str),
        Some("it's \"quoted\"\n\\ and \u{1F980}")
    );
    let rows = performer
        .select(&Select::from(&table).order_by(OrderBy::new(name)).limit(Limit::offset(1)))
        .await
        .expect("Failed to select with an offset");
    assert_eq!(rows.len(), 2);
    let rows = performer
        .select(&Select::from(&table).filter(Filter::is_in(name, ["alpha", "charlie"]).unwrap()))
        .await
        .expect("Failed to select the listed counters");
    assert_eq!(rows.len(), 2);

    // Sum
    let total = performer
        .sum(&table, amount, None, None)
        .await
        .expect("Failed to sum the counters");
    assert_eq!(total.as_i64(), Some(6));

    // Update and delete
    performer
        .batch(false, async |p| {
            p.queue_update(
                &table,
                &[ColumnValue::new(amount, 20)],
                &Filter::equals(name, "bravo"),
            )?;
            p.queue_delete(&table, &Filter::equals(name, "alpha"));
            Ok(())
        })
        .await
        .expect("Failed to update the counters");
    let total = performer
        .sum(&table, amount, None, None)
        .await
        .expect("Failed to sum the counters");
    assert_eq!(total.as_i64(), Some(23));
    assert_eq!(
        performer
            .count(&table, Some(Filter::compare(name, "LIKE", "%a%").unwrap()))
            .await
            .expect("Failed to count"),
        2
    );
    let total = performer
        .sum(&table, amount, None, Some(Filter::equals(name, "nobody")))
        .await
        .expect("Failed to sum nothing");
    assert!(total.is_null());

    // Multi select
    let rows = performer
        .multi_select(
            false,
            &table,
            &[Filter::equals(name, "bravo"), Filter::equals(name, "nobody")],
            Columns::from("MAX(`amount`) AS amount"),
            None,
        )
        .await
        .expect("Failed to run the multi select");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].values()[0].as_u64(), Some(1));
    assert_eq!(rows[0].get_column("amount").and_then(Value::as_i64), Some(20));
    assert_eq!(rows[1].values()[0].as_u64(), Some(0));
    assert!(rows[1].get_column("amount").unwrap().is_null());
}
