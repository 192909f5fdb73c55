#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quay::{
        Column, ColumnAttributes, ColumnType, ColumnValue, Filter, GenericSqlWriter, Join, Limit,
        LockType, OrderBy, Select, SqlWriter, Table, Value,
    };

    #[test]
    fn compose_a_shop() -> quay::Result<()> {
        let customers = Table::new(
            "customers",
            [
                Column::new(
                    "id",
                    ColumnType::Int,
                    ColumnAttributes::PRIMARY_KEY
                        | ColumnAttributes::NOT_NULL
                        | ColumnAttributes::AUTO_INCREMENT,
                )?,
                Column::new("email", ColumnType::Varchar(320), ColumnAttributes::UNIQUE)?,
                Column::new("profile", ColumnType::LongBlob, ColumnAttributes::NONE)?,
            ],
        )?;
        let orders = Table::new(
            "orders",
            [
                Column::new(
                    "order_id",
                    ColumnType::BigInt,
                    ColumnAttributes::PRIMARY_KEY | ColumnAttributes::NOT_NULL,
                )?,
                Column::new("customer_id", ColumnType::Int, ColumnAttributes::NOT_NULL)?,
                Column::new("total", ColumnType::Int, ColumnAttributes::NONE)?,
            ],
        )?;
        let id = customers.try_column("id")?;
        let email = customers.try_column("email")?;
        let profile = customers.try_column("profile")?;
        let customer_id = orders.try_column("customer_id")?;
        let total = orders.try_column("total")?;

        let writer = GenericSqlWriter::new();
        let mut out = String::new();
        writer.write_create_table(&mut out, &customers);
        writer.write_lock_tables(
            &mut out,
            &[(&customers, LockType::Write), (&orders, LockType::Write)],
        );
        writer.write_insert_into(
            &mut out,
            &customers,
            &[
                ColumnValue::new(email, "ann@example.com"),
                ColumnValue::new(profile, serde_json::json!({"vip": true})),
            ],
        );
        writer.write_set(&mut out, "@customer", &Value::LastInsertId);
        writer.write_insert_into(
            &mut out,
            &orders,
            &[
                ColumnValue::new(customer_id, Value::variable("@customer")?),
                ColumnValue::new(total, 99),
            ],
        );
        writer.write_unlock_tables(&mut out);
        writer.write_select(
            &mut out,
            &Select::from(&orders)
                .columns([total, email])
                .join(Join::on_columns(&customers, customer_id, id)?)
                .filter(Filter::compare(total, ">=", 50)?)
                .order_by(OrderBy::desc(total))
                .limit(Limit::range(0, 5)),
        );
        assert_eq!(
            out,
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS `customers` (`id` INT(11) NOT NULL AUTO_INCREMENT, `email` VARCHAR(320), `profile` LONGBLOB, PRIMARY KEY (`id`), UNIQUE KEY `email_UNIQUE` (`email`));
                LOCK TABLES `customers` WRITE, `orders` WRITE;
                INSERT INTO `customers` (`email`,`profile`) VALUES ('ann@example.com','{\"vip\":true}');
                SET @customer = LAST_INSERT_ID();
                INSERT INTO `orders` (`customer_id`,`total`) VALUES (@customer,99);
                UNLOCK TABLES;
                SELECT `orders`.`total`,`customers`.`email` FROM `orders` INNER JOIN `customers` ON `customers`.`id` = `orders`.`customer_id` WHERE `total` >= 50 ORDER BY `total` DESC LIMIT 0,5;
            "#}
            .replace('\n', "")
        );
        Ok(())
    }
}
