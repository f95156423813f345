#[cfg(test)]
mod tests {
    use quickread::{
        AsValue, ColumnDef, ColumnRef, Condition, Entity, PrimaryKeyType, ProjectionRegistry,
        QuickRead, Result, Row, RowLabeled, TableRef, Value,
    };
    use quickread_memory::MemoryConnection;
    use std::{cell::Cell, sync::LazyLock};

    thread_local! {
        // Counted per test thread
        static BUILT: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts how many times it gets built from a row.
    #[derive(Debug, Clone, PartialEq)]
    struct Counted {
        id: i32,
        label: Option<String>,
    }

    impl Entity for Counted {
        fn table() -> &'static TableRef {
            static TABLE: TableRef = TableRef::new("counted");
            &TABLE
        }
        fn columns() -> &'static [ColumnDef] {
            static COLUMNS: LazyLock<[ColumnDef; 2]> = LazyLock::new(|| {
                [
                    ColumnDef {
                        column_ref: ColumnRef {
                            name: "id",
                            table: "counted",
                            schema: "",
                        },
                        value: Value::Int32(None),
                        primary_key: PrimaryKeyType::PrimaryKey,
                        ..Default::default()
                    },
                    ColumnDef {
                        column_ref: ColumnRef {
                            name: "label",
                            table: "counted",
                            schema: "",
                        },
                        value: Value::Varchar(None),
                        nullable: true,
                        ..Default::default()
                    },
                ]
            });
            &*COLUMNS
        }
        fn primary_key_def() -> &'static [&'static ColumnDef] {
            static PRIMARY_KEY: LazyLock<[&ColumnDef; 1]> =
                LazyLock::new(|| [&Counted::columns()[0]]);
            &*PRIMARY_KEY
        }
        fn from_row(row: RowLabeled) -> Result<Self> {
            BUILT.set(BUILT.get() + 1);
            Ok(Self {
                id: i32::try_from_value(row.get_column("id").cloned().unwrap_or_default())?,
                label: Option::<String>::try_from_value(
                    row.get_column("label").cloned().unwrap_or_default(),
                )?,
            })
        }
        fn row_full(&self) -> Row {
            vec![self.id.as_value(), self.label.clone().as_value()].into_boxed_slice()
        }
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    struct Note {
        text: String,
    }

    #[test]
    fn fields_follow_columns() {
        let mut registry = ProjectionRegistry::new();
        let projection_type = registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        assert_eq!(projection_type.len(), Counted::columns().len());
        assert_eq!(projection_type.labels().as_ref(), ["id", "label"]);
        assert_eq!(projection_type.table(), Counted::table());
        assert!(projection_type.entity().ends_with("Counted"));
        assert!(std::sync::Arc::ptr_eq(
            &projection_type,
            &registry
                .define_projection_type::<Counted>()
                .expect("Failed to get the projection type")
        ));
    }

    #[test]
    fn build_ignores_unknown_and_fills_missing() {
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        let projection = Counted::build_projection(&registry, [("id", 7), ("size", 3)])
            .expect("Failed to build the projection");
        assert_eq!(projection.get("id"), Some(&Value::Int32(Some(7))));
        assert_eq!(projection.get("label"), Some(&Value::Varchar(None)));
        assert_eq!(projection.get("size"), None);
        assert_eq!(projection.get_index(0), Some(&Value::Int32(Some(7))));
        assert_eq!(projection.get_index(2), None);
        assert!(projection.get_as::<i64>("size").is_err());
        assert_eq!(projection.get_as::<i64>("id").unwrap(), 7);
        assert_eq!(projection.get_as::<Option<String>>("label").unwrap(), None);

        let column = &Counted::columns()[1].column_ref;
        let projection = Counted::build_projection(&registry, [(*column, "seven")])
            .expect("Failed to build the projection");
        assert_eq!(projection.get("id"), Some(&Value::Int32(None)));
        assert_eq!(projection.get_as::<String>("label").unwrap(), "seven");
    }

    #[test]
    fn lazy_upgrade() {
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        let before = BUILT.get();
        let mut projection = Counted::build_projection(
            &registry,
            [("id", Value::from(1)), ("label", "one".into())],
        )
        .expect("Failed to build the projection");

        // Reads never build the entity
        let _ = projection.get("id");
        let _ = projection.get_index(1);
        let _ = projection.get_as::<String>("label");
        let _ = projection.values();
        let _ = projection.fields().count();
        let _ = projection.labels();
        let _ = projection.len();
        let _ = format!("{:?}", projection);
        assert_eq!(BUILT.get(), before);
        assert!(!projection.is_materialized());

        // Built once, then reused
        let first: *const _ = projection.as_entity().expect("Failed to upgrade");
        assert_eq!(BUILT.get(), before + 1);
        let second: *const _ = projection.as_entity().expect("Failed to upgrade");
        let third: *const _ = projection.as_entity_mut().expect("Failed to upgrade");
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, third));
        assert_eq!(BUILT.get(), before + 1);
        assert!(projection.is_materialized());

        let record = projection.into_entity().expect("Failed to take the record");
        assert_eq!(BUILT.get(), before + 1);
        assert!(record.is_persisted());
        assert!(!record.is_changed());
        assert_eq!(
            record.into_inner(),
            Counted {
                id: 1,
                label: Some("one".into())
            }
        );
    }

    #[test]
    fn coercion_errors_surface_from_upgrade() {
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        let projection = Counted::build_projection(&registry, [("id", "not a number")])
            .expect("Failed to build the projection");
        assert!(projection.as_entity().is_err());
        assert!(!projection.is_materialized());

        let projection = Counted::build_projection(&registry, [("id", "12")])
            .expect("Failed to build the projection");
        assert_eq!(projection.as_entity().expect("Failed to upgrade").id, 12);
    }

    #[test]
    fn undefined_type() {
        let registry = ProjectionRegistry::new();
        assert!(Counted::build_projection(&registry, [("id", 1)]).is_err());
    }

    #[tokio::test]
    async fn reload() {
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Counted>()
            .expect("Failed to create the table");
        for (id, label) in [(1, "one"), (2, "two")] {
            Counted::insert_one(
                &mut connection,
                &Counted {
                    id,
                    label: Some(label.into()),
                },
            )
            .await
            .expect("Failed to insert");
        }
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        let mut one = Counted::query_projection(
            &mut connection,
            &registry,
            Condition::eq("id", 1).into(),
        )
        .await
        .expect("Failed to query")
        .expect("Row 1 is missing");

        // Changed row
        let mut record = Counted::from_persisted([("id", Value::from(1)), ("label", "one".into())])
            .expect("Failed to build the record");
        record.label = None;
        record
            .save(&mut connection)
            .await
            .expect("Failed to update row 1");
        assert_eq!(
            connection.last_query(),
            Some("UPDATE \"counted\" SET \"label\" = NULL\nWHERE \"id\" = 1;")
        );
        assert!(
            one.reload(&mut connection)
                .await
                .expect("Failed to reload row 1")
        );
        assert_eq!(one.get("label"), Some(&Value::Varchar(None)));
        assert!(!one.is_materialized());

        // Reload through the record
        one.as_entity().expect("Failed to upgrade");
        Counted::delete_many(&mut connection, &Condition::eq("id", 1))
            .await
            .expect("Failed to delete row 1");
        let values = one.values().to_vec();
        assert!(
            !one.reload(&mut connection)
                .await
                .expect("Failed to reload row 1")
        );
        assert_eq!(one.values(), values);

        // Deleted row without record
        let mut two = Counted::query_projection(
            &mut connection,
            &registry,
            Condition::eq("id", 2).into(),
        )
        .await
        .expect("Failed to query")
        .expect("Row 2 is missing");
        Counted::delete_many(&mut connection, &Condition::True)
            .await
            .expect("Failed to clear the table");
        assert!(
            !two.reload(&mut connection)
                .await
                .expect("Failed to reload row 2")
        );
        assert_eq!(two.get_as::<String>("label").unwrap(), "two");
    }

    #[tokio::test]
    async fn reload_after_deleting_through_record() {
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Counted>()
            .expect("Failed to create the table");
        Counted::insert_one(
            &mut connection,
            &Counted {
                id: 7,
                label: Some("seven".into()),
            },
        )
        .await
        .expect("Failed to insert");
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Counted>()
            .expect("Failed to define the projection type");
        let mut seven = Counted::query_projection(
            &mut connection,
            &registry,
            Condition::eq("id", 7).into(),
        )
        .await
        .expect("Failed to query")
        .expect("Row 7 is missing");
        seven
            .as_entity_mut()
            .expect("Failed to upgrade")
            .delete(&mut connection)
            .await
            .expect("Failed to delete row 7");
        assert!(seven.as_entity().expect("The record is cached").is_deleted());
        let values = seven.values().to_vec();
        assert!(
            !seven
                .reload(&mut connection)
                .await
                .expect("Failed to reload row 7")
        );
        assert_eq!(seven.values(), values);
        assert_eq!(seven.get_as::<String>("label").unwrap(), "seven");
    }

    #[tokio::test]
    async fn reload_without_primary_key() {
        let mut connection = MemoryConnection::new();
        connection
            .create_table::<Note>()
            .expect("Failed to create the table");
        let mut registry = ProjectionRegistry::new();
        registry
            .define_projection_type::<Note>()
            .expect("Failed to define the projection type");
        let mut note = Note::build_projection(&registry, [("text", "hello")])
            .expect("Failed to build the projection");
        assert!(note.reload(&mut connection).await.is_err());
        assert!(connection.history().is_empty());
    }
}
