use indoc::indoc;
use quickread_core::{
    Condition, Entity, Executor, FieldDef, Insert, PrimaryKeyType, ProjectionRegistry, QuickRead,
    RegistryConfig, ReloadColumns, Scope, Update, Value, stream::TryStreamExt,
};
use std::borrow::Cow;
use quickread_memory::MemoryConnection;
use quickread_tests::{Widget, init_logs};

fn drifted() -> Vec<FieldDef> {
    vec![
        FieldDef::new("name", Value::Varchar(None)),
        FieldDef {
            nullable: false,
            ..FieldDef::new("id", Value::Int64(None))
        },
        FieldDef::new("color", Value::Varchar(None)),
    ]
}

#[tokio::test]
async fn live_columns_win() {
    init_logs();
    let mut connection = MemoryConnection::new();
    connection
        .create_table_with(Widget::table().clone(), drifted())
        .expect("Could not create the widgets table");
    connection
        .execute(
            Insert {
                table: Widget::table().clone(),
                columns: ["id", "name", "color"].map(String::from).into(),
                rows: vec![
                    vec![
                        Value::Int64(Some(3)),
                        Value::Varchar(Some("Gear".into())),
                        Value::Varchar(Some("red".into())),
                    ]
                    .into_boxed_slice(),
                ],
            }
            .into(),
        )
        .await
        .expect("Failed to insert the widget");

    let mut registry = ProjectionRegistry::new();
    registry.register_pending::<Widget>();
    let report = registry
        .materialize_all(&mut connection)
        .await
        .expect("Failed to materialize");
    assert!(report.is_success());
    let projection_type = registry.require::<Widget>().expect("Widget is not defined");
    assert_eq!(
        projection_type
            .fields()
            .iter()
            .map(|f| (f.name.as_ref(), f.primary_key))
            .collect::<Vec<_>>(),
        [
            ("name", PrimaryKeyType::None),
            ("id", PrimaryKeyType::PrimaryKey),
            ("color", PrimaryKeyType::None),
        ]
    );

    let mut projection = Widget::query_projection(
        &mut connection,
        &registry,
        Condition::eq("id", 3).into(),
    )
    .await
    .expect("Failed to query the widget")
    .expect("The widget was not found");
    assert_eq!(
        connection.last_query(),
        Some(indoc! {r#"
            SELECT "name", "id", "color"
            FROM "widgets"
            WHERE "id" = 3
            LIMIT 1;"#})
    );
    assert_eq!(projection.get_as::<String>("color").unwrap(), "red");
    assert_eq!(projection.get("price"), None);

    // `price` is required by the entity but not projected
    assert!(projection.as_entity().is_err());
    assert!(!projection.is_materialized());

    connection.clear_history();
    assert!(
        projection
            .reload(&mut connection)
            .await
            .expect("Failed to reload the widget")
    );
    assert_eq!(
        connection.history(),
        [indoc! {r#"
            SELECT "name", "id", "color"
            FROM "widgets"
            WHERE "id" = 3
            LIMIT 1;"#}]
    );
}

#[tokio::test]
async fn dropped_columns() {
    init_logs();
    let mut connection = MemoryConnection::new();
    connection
        .create_table::<Widget>()
        .expect("Could not create the widgets table");
    Widget::insert_one(
        &mut connection,
        &Widget {
            id: 1,
            name: "Bolt".into(),
            price: 0.25,
        },
    )
    .await
    .expect("Failed to insert the widget");
    connection
        .drop_column(Widget::table(), "name")
        .expect("Failed to drop the name column");
    connection
        .add_column(
            Widget::table(),
            FieldDef::new("weight", Value::Float32(None)),
        )
        .expect("Failed to add the weight column");
    assert_eq!(
        connection
            .table(Widget::table())
            .expect("The widgets table is gone")
            .rows()[0]
            .as_ref(),
        [Value::Int64(Some(1)), Value::Float64(Some(0.25)), Value::Float32(None)]
    );

    let mut registry = ProjectionRegistry::new();
    registry.register_pending::<Widget>();
    registry
        .materialize_all(&mut connection)
        .await
        .expect("Failed to materialize");
    let projection = Widget::query_projection(&mut connection, &registry, Default::default())
        .await
        .expect("Failed to query the widget")
        .expect("The widget was not found");
    assert_eq!(projection.len(), 3);
    assert_eq!(projection.get("weight"), Some(&Value::Float32(None)));
    assert_eq!(projection.get("name"), None);
}

#[tokio::test]
async fn reload_all_after_dropped_column() {
    init_logs();
    let mut connection = MemoryConnection::new();
    connection
        .create_table::<Widget>()
        .expect("Could not create the widgets table");
    Widget::insert_one(
        &mut connection,
        &Widget {
            id: 5,
            name: "Nut".into(),
            price: 0.1,
        },
    )
    .await
    .expect("Failed to insert the widget");
    connection
        .drop_column(Widget::table(), "name")
        .expect("Failed to drop the name column");
    connection
        .add_column(
            Widget::table(),
            FieldDef::new("weight", Value::Float32(None)),
        )
        .expect("Failed to add the weight column");

    let mut registry = ProjectionRegistry::with_config(RegistryConfig {
        reload_columns: ReloadColumns::All,
        ..Default::default()
    });
    registry.register_pending::<Widget>();
    registry
        .materialize_all(&mut connection)
        .await
        .expect("Failed to materialize");
    let mut projection =
        Widget::query_projection(&mut connection, &registry, Condition::eq("id", 5).into())
            .await
            .expect("Failed to query the widget")
            .expect("The widget was not found");
    connection
        .execute(
            Update {
                table: Widget::table().clone(),
                values: vec![(Cow::Borrowed("weight"), Value::Float32(Some(1.5)))],
                condition: Condition::eq("id", 5),
            }
            .into(),
        )
        .await
        .expect("Failed to update the widget");

    connection.clear_history();
    assert!(
        projection
            .reload(&mut connection)
            .await
            .expect("Failed to reload the widget")
    );
    assert_eq!(
        connection.history(),
        [indoc! {r#"
            SELECT "id", "price", "weight"
            FROM "widgets"
            WHERE "id" = 5
            LIMIT 1;"#}]
    );
    assert_eq!(projection.get("weight"), Some(&Value::Float32(Some(1.5))));
    assert_eq!(projection.get("name"), None);
}

#[tokio::test]
async fn select_star_labels() {
    init_logs();
    let mut connection = MemoryConnection::new();
    connection
        .create_table::<Widget>()
        .expect("Could not create the widgets table");
    Widget::insert_one(
        &mut connection,
        &Widget {
            id: 9,
            name: "Pin".into(),
            price: 0.5,
        },
    )
    .await
    .expect("Failed to insert the widget");
    connection
        .drop_column(Widget::table(), "price")
        .expect("Failed to drop the price column");
    connection
        .add_column(Widget::table(), FieldDef::new("stock", Value::Int32(None)))
        .expect("Failed to add the stock column");
    let select = Scope::all().select(Widget::table().clone(), Vec::<Cow<'static, str>>::new());
    let rows = connection
        .fetch(select.into())
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to select the widgets");
    assert_eq!(
        connection.last_query(),
        Some(indoc! {r#"
            SELECT *
            FROM "widgets";"#})
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].names(), ["id", "name", "stock"]);
    assert_eq!(
        rows[0].values(),
        [
            Value::Int64(Some(9)),
            Value::Varchar(Some("Pin".into())),
            Value::Int32(None)
        ]
    );
}
