use quay::{
    Column, ColumnAttributes, ColumnType, ColumnValue, Driver, Filter, FilterClause, Join, OrderBy,
    Select, StatementPerformer, Table, Value,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub(crate) fn accounts() -> Table {
    Table::new(
        "quay_accounts",
        [
            Column::new(
                "id",
                ColumnType::Int,
                ColumnAttributes::PRIMARY_KEY
                    | ColumnAttributes::NOT_NULL
                    | ColumnAttributes::UNSIGNED
                    | ColumnAttributes::AUTO_INCREMENT,
            )
            .unwrap(),
            Column::new(
                "owner",
                ColumnType::Varchar(64),
                ColumnAttributes::NOT_NULL | ColumnAttributes::UNIQUE,
            )
            .unwrap(),
            Column::new("balance", ColumnType::BigInt, ColumnAttributes::NONE).unwrap(),
        ],
    )
    .expect("Failed to define the quay_accounts table")
}

pub(crate) fn entries() -> Table {
    Table::new(
        "quay_entries",
        [
            Column::new(
                "entry_id",
                ColumnType::Int,
                ColumnAttributes::PRIMARY_KEY
                    | ColumnAttributes::NOT_NULL
                    | ColumnAttributes::UNSIGNED
                    | ColumnAttributes::AUTO_INCREMENT,
            )
            .unwrap(),
            Column::new(
                "account_id",
                ColumnType::Int,
                ColumnAttributes::NOT_NULL | ColumnAttributes::UNSIGNED,
            )
            .unwrap(),
            Column::new("amount", ColumnType::Int, ColumnAttributes::NOT_NULL).unwrap(),
            Column::new("payload", ColumnType::LongBlob, ColumnAttributes::NONE).unwrap(),
        ],
    )
    .expect("Failed to define the quay_entries table")
}

pub async fn ledger<D: Driver>(performer: &mut StatementPerformer<D>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    let accounts = accounts();
    let entries = entries();
    let id = accounts.try_column("id").unwrap();
    let owner = accounts.try_column("owner").unwrap();
    let account_id = entries.try_column("account_id").unwrap();
    let amount = entries.try_column("amount").unwrap();
    let payload = entries.try_column("payload").unwrap();

    // Setup
    performer
        .batch(true, async |p| {
            p.queue_create_table(&accounts);
            p.queue_create_table(&entries);
            p.queue_truncate_table(&accounts);
            p.queue_truncate_table(&entries);
            Ok(())
        })
        .await
        .expect("Failed to create the ledger tables");

    // The generated account id travels through a session variable
    let batched = performer
        .batch(true, async |p| {
            let account = Value::variable("@quay_account")?;
            for (who, amounts) in [("ann", &[10, 15][..]), ("bob", &[7][..])] {
                p.queue_insert_into(&accounts, &[ColumnValue::new(owner, who)])?;
                p.queue_set("@quay_account", Value::LastInsertId)?;
                for value in amounts {
                    p.queue_insert_into(
                        &entries,
                        &[
                            ColumnValue::new(account_id, account.clone()),
                            ColumnValue::new(amount, *value),
                            ColumnValue::new(payload, vec![0u8, 0xff, b'\'']),
                        ],
                    )?;
                }
            }
            Ok(())
        })
        .await
        .expect("Failed to fill the ledger");
    assert!(batched.rows.is_empty());

    let join = Join::on_columns(&accounts, account_id, id).unwrap();
    let total = performer
        .sum(
            &entries,
            amount,
            Some(join.clone()),
            Some(Filter::equals(owner, "ann")),
        )
        .await
        .expect("Failed to sum the entries of ann");
    assert_eq!(total.as_i64(), Some(25));

    let rows = performer
        .select(
            &Select::from(&entries)
                .columns([amount, owner, payload])
                .join(join)
                .order_by(OrderBy::new(amount)),
        )
        .await
        .expect("Failed to select the joined entries");
    assert_eq!(rows.len(), 3);
    let owners: Vec<_> = rows
        .iter()
        .map(|r| r.get_column("owner").and_then(Value::as_str).unwrap_or_default())
        .collect();
    assert_eq!(owners, ["bob", "ann", "ann"]);
    assert_eq!(
        rows[0].get_column("payload"),
        Some(&Value::Blob([0u8, 0xff, b'\''].as_slice().into()))
    );

    let rows = performer
        .select(
            &Select::from(&accounts).filter(
                Filter::columns_equal(owner, owner)
                    .unwrap()
                    .and(FilterClause::equals(owner, "bob")),
            ),
        )
        .await
        .expect("Failed to select bob");
    assert_eq!(rows.len(), 1);
}
