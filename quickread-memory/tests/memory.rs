#[cfg(test)]
mod tests {
    use quickread_core::Entity;
    use quickread_memory::MemoryConnection;
    use quickread_tests::{Customer, Widget, execute_tests, init_logs};

    #[tokio::test]
    async fn memory() {
        init_logs();
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Widget>()
            .expect("Could not create the widgets table");
        connection
            .create_table::<Customer>()
            .expect("Could not create the customer table");
        execute_tests(connection).await;
    }

    #[tokio::test]
    async fn memory_history() {
        init_logs();
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Widget>()
            .expect("Could not create the widgets table");
        Widget::insert_one(
            &mut connection,
            &Widget {
                id: 5,
                name: "It's".into(),
                price: 0.5,
            },
        )
        .await
        .expect("Failed to insert a widget");
        assert_eq!(
            connection.last_query(),
            Some("INSERT INTO \"widgets\" (\"id\", \"name\", \"price\") VALUES\n(5, 'It''s', 0.5);")
        );
        assert_eq!(connection.history().len(), 1);
        connection.clear_history();
        assert!(connection.history().is_empty());
    }
}
