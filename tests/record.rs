#[cfg(test)]
mod tests {
    use quickread::{Condition, Entity, Record, RecordState, Value};
    use quickread_memory::MemoryConnection;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[quickread(name = "accounts", primary_key = ("bank", Self::number))]
    struct Account {
        bank: String,
        number: i64,
        owner: String,
        balance: Decimal,
        frozen: bool,
    }

    fn account() -> Account {
        Account {
            bank: "NW".into(),
            number: 1001,
            owner: "Ada".into(),
            balance: Decimal::from_str("10.00").unwrap(),
            frozen: false,
        }
    }

    fn connection() -> MemoryConnection {
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Account>()
            .expect("Failed to create the accounts table");
        connection
    }

    #[tokio::test]
    async fn lifecycle() {
        let mut connection = connection();
        let mut record = Record::new(account());
        assert_eq!(record.state(), RecordState::New);
        assert!(record.is_changed());
        assert_eq!(record.changed_columns().len(), 5);

        // Insert
        record.save(&mut connection).await.expect("Failed to insert");
        assert!(record.is_persisted());
        assert!(!record.is_changed());
        assert_eq!(connection.history().len(), 1);
        assert!(record.save(&mut connection).await.is_ok());
        assert_eq!(connection.history().len(), 1);

        // Update of the changed columns only
        record.balance += Decimal::from(5);
        record.frozen = true;
        assert_eq!(
            record.changes(),
            [
                (
                    "balance",
                    Value::Decimal(Some(Decimal::from_str("10.00").unwrap()), 0, 0),
                    Value::Decimal(Some(Decimal::from(15)), 0, 0),
                ),
                (
                    "frozen",
                    Value::Boolean(Some(false)),
                    Value::Boolean(Some(true))
                ),
            ]
        );
        record.save(&mut connection).await.expect("Failed to update");
        assert_eq!(
            connection.last_query(),
            Some(
                "UPDATE \"accounts\" SET \"balance\" = 15.00, \"frozen\" = true\nWHERE \"bank\" = 'NW' AND \"number\" = 1001;"
            )
        );

        // Key change is keyed by the stored row
        record.number = 2002;
        record.save(&mut connection).await.expect("Failed to update the key");
        assert!(
            Account::find_one(&mut connection, Condition::eq("number", 1001))
                .await
                .expect("Failed to query")
                .is_none()
        );
        let stored = Account::find_one(&mut connection, Condition::eq("number", 2002))
            .await
            .expect("Failed to query")
            .expect("Account 2002 is missing");
        assert_eq!(stored.balance, Decimal::from(15));
        assert!(stored.frozen);

        // Reload
        let mut other = Record::<Account>::from_row(stored.row_labeled()).expect("Failed to build");
        other.owner = "Grace".into();
        other.save(&mut connection).await.expect("Failed to update");
        assert!(record.reload(&mut connection).await.expect("Failed to reload"));
        assert_eq!(record.owner, "Grace");
        assert!(!record.is_changed());

        // Delete
        record.delete(&mut connection).await.expect("Failed to delete");
        assert!(record.is_deleted());
        assert!(record.save(&mut connection).await.is_err());
        assert!(record.delete(&mut connection).await.is_err());
        let history = connection.history().len();
        assert!(
            !record
                .reload(&mut connection)
                .await
                .expect("Failed to reload the deleted record")
        );
        assert_eq!(connection.history().len(), history);
        assert!(!other.reload(&mut connection).await.expect("Failed to reload"));
        assert!(other.delete(&mut connection).await.is_err());
        assert!(other.is_persisted());
    }

    #[tokio::test]
    async fn new_records() {
        let mut connection = connection();
        let mut record: Record<Account> = account().into();
        assert!(record.delete(&mut connection).await.is_err());
        assert!(record.reload(&mut connection).await.is_err());
        assert!(connection.history().is_empty());
        record.save(&mut connection).await.expect("Failed to insert");
        let mut duplicate = Record::new(account());
        assert!(duplicate.save(&mut connection).await.is_err());
        assert!(duplicate.is_new());
    }

    #[test]
    fn primary_key() {
        assert_eq!(
            Account::primary_key_def()
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>(),
            ["bank", "number"]
        );
        assert_eq!(
            account().primary_key().as_ref(),
            [Value::Varchar(Some("NW".into())), Value::Int64(Some(1001))]
        );
        assert_eq!(
            Account::primary_key_condition(account().primary_key()),
            Condition::eq("bank", "NW").and(Condition::eq("number", 1001i64))
        );
    }
}
