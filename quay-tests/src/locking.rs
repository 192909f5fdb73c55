use crate::{ledger::accounts, silent_logs};
use quay::{ColumnValue, Driver, Error, Filter, Select, StatementPerformer, Value};
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub async fn locking<D: Driver>(performer: &mut StatementPerformer<D>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    let accounts = accounts();
    let owner = accounts.try_column("owner").unwrap();
    let balance = accounts.try_column("balance").unwrap();

    // Reads inside the locked scope share its connection, the count sends LOCK TABLES on its own
    // and UNLOCK TABLES follows with the update
    let batched = performer
        .batch_locked_for_write(&[&accounts], async |p| {
            let before = p.count(&accounts, None).await?;
            p.queue_update(
                &accounts,
                &[ColumnValue::new(balance, 100)],
                &Filter::equals(owner, "ann"),
            )?;
            Ok(before)
        })
        .await
        .expect("Failed to update the accounts while locked");
    assert_eq!(batched.value, 2);
    assert!(!performer.is_connected());

    // A failing locked scope sends nothing
    let result = performer
        .batch_locked_for_write(&[&accounts], async |p| {
            p.queue_update(
                &accounts,
                &[ColumnValue::new(balance, 0)],
                &Filter::equals(owner, "ann"),
            )?;
            Err::<(), _>(Error::msg("Rolled back on purpose"))
        })
        .await;
    assert!(result.is_err());
    assert_eq!(performer.nesting(), 0);
    assert!(!performer.is_connected());
    let rows = performer
        .select(&Select::from(&accounts).filter(Filter::equals(owner, "ann")))
        .await
        .expect("Failed to read ann");
    assert_eq!(
        rows[0].get_column("balance").and_then(Value::as_i64),
        Some(100)
    );

    // A server error inside a nested scope tears everything down
    performer
        .batch(false, async |p| {
            let result;
            silent_logs! {
                result = p
                    .batch(true, async |p| {
                        p.queue_insert_into(&accounts, &[ColumnValue::new(owner, "ann")])?;
                        p.select(&Select::from(&accounts)).await?;
                        Ok(())
                    })
                    .await;
            }
            assert!(result.is_err());
            assert!(!p.is_connected());
            Ok(())
        })
        .await
        .expect("The outer scope should survive the nested failure");
    assert_eq!(
        performer.count(&accounts, None).await.expect("Failed to count"),
        2
    );
}
