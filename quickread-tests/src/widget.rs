use quickread::{
    Condition, Entity, Executor, ProjectionRegistry, QuickRead, SchemaIntrospector, Scope, Value,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

#[derive(Entity, Debug, Clone, PartialEq)]
#[quickread(name = "widgets")]
pub struct Widget {
    #[quickread(primary_key)]
    pub id: i64,
    pub name: String,
    pub price: f64,
}

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn widget<E: Executor + SchemaIntrospector>(executor: &mut E) {
    let _lock = MUTEX.lock().await;

    // Setup
    Widget::delete_many(executor, &Condition::True)
        .await
        .expect("Failed to clear the widgets table");
    Widget::insert_one(
        executor,
        &Widget {
            id: 1,
            name: "A".into(),
            price: 9.99,
        },
    )
    .await
    .expect("Failed to insert widget 1");
    let mut registry = ProjectionRegistry::new();
    assert!(registry.register_pending::<Widget>());
    assert!(!registry.register_pending::<Widget>());
    let report = registry
        .materialize_all(executor)
        .await
        .expect("Failed to materialize the projection types");
    assert!(report.is_success());
    assert_eq!(report.defined.len(), 1);
    assert!(registry.is_defined::<Widget>());
    assert_eq!(registry.pending().count(), 0);

    // Read
    let mut projection = Widget::query_projection(executor, &registry, Condition::eq("id", 1).into())
        .await
        .expect("Failed to query widget 1")
        .expect("Widget 1 was not found");
    assert_eq!(
        projection.fields().map(|(name, _)| name).collect::<Vec<_>>(),
        ["id", "name", "price"]
    );
    assert_eq!(projection.get("id"), Some(&Value::Int64(Some(1))));
    assert_eq!(projection.get_as::<String>("name").unwrap(), "A");
    assert_eq!(projection.get_as::<f64>("price").unwrap(), 9.99);
    assert_eq!(projection.get("color"), None);
    assert!(!projection.is_materialized());

    // Upgrade
    let record = projection
        .as_entity_mut()
        .expect("Failed to upgrade widget 1");
    assert!(record.is_persisted());
    assert!(!record.is_changed());
    assert_eq!(
        *record.entity(),
        Widget {
            id: 1,
            name: "A".into(),
            price: 9.99,
        }
    );
    record
        .save(executor)
        .await
        .expect("Failed to save the unchanged widget 1");
    record.name = "B".into();
    assert_eq!(record.changed_columns(), ["name"]);
    record
        .save(executor)
        .await
        .expect("Failed to save the changed widget 1");
    assert!(record.is_persisted());
    assert!(!record.is_changed());

    // The projection keeps the row it was read with
    assert_eq!(projection.get_as::<String>("name").unwrap(), "A");
    assert!(
        projection
            .reload(executor)
            .await
            .expect("Failed to reload widget 1")
    );
    assert_eq!(projection.get_as::<String>("name").unwrap(), "B");

    let stored = Widget::find_one(executor, Condition::eq("id", 1))
        .await
        .expect("Failed to find widget 1")
        .expect("Widget 1 is gone");
    assert_eq!(stored.name, "B");
    assert_eq!(stored.price, 9.99);
}

pub async fn widget_reload<E: Executor + SchemaIntrospector>(executor: &mut E) {
    let _lock = MUTEX.lock().await;

    Widget::delete_many(executor, &Condition::True)
        .await
        .expect("Failed to clear the widgets table");
    for (id, name, price) in [(1, "A", 1.5), (2, "B", 2.5)] {
        Widget::insert_one(
            executor,
            &Widget {
                id,
                name: name.into(),
                price,
            },
        )
        .await
        .expect("Failed to insert a widget");
    }
    let mut registry = ProjectionRegistry::new();
    registry
        .define_projection_type::<Widget>()
        .expect("Failed to define the widget projection type");
    let mut first = Widget::query_projection(
        executor,
        &registry,
        Scope::from(Condition::eq("id", 1)),
    )
    .await
    .expect("Failed to query widget 1")
    .expect("Widget 1 was not found");
    let mut second = Widget::query_projection(
        executor,
        &registry,
        Scope::from(Condition::eq("id", 2)),
    )
    .await
    .expect("Failed to query widget 2")
    .expect("Widget 2 was not found");

    // Changed row
    let mut other = Widget::from_persisted([
        ("id", Value::from(1i64)),
        ("name", "A".into()),
        ("price", 1.5f64.into()),
    ])
    .expect("Failed to build a persisted widget");
    assert!(other.is_persisted());
    other.name = "Z".into();
    other.price = 3.0;
    other.save(executor).await.expect("Failed to update widget 1");
    assert!(first.reload(executor).await.expect("Failed to reload widget 1"));
    assert_eq!(first.get_as::<String>("name").unwrap(), "Z");
    assert_eq!(first.get_as::<f64>("price").unwrap(), 3.0);
    assert!(!first.is_materialized());

    // Deleted row
    let record = Widget::query_projection(executor, &registry, Condition::eq("id", 2).into())
        .await
        .expect("Failed to query widget 2")
        .expect("Widget 2 was not found");
    let mut record = record.into_entity().expect("Failed to upgrade widget 2");
    record.delete(executor).await.expect("Failed to delete widget 2");
    assert!(record.is_deleted());
    assert!(record.save(executor).await.is_err());
    let before = second.values().to_vec();
    assert!(!second.reload(executor).await.expect("Failed to reload widget 2"));
    assert_eq!(second.values(), before);
    assert!(
        Widget::find_one(executor, Condition::eq("id", 2))
            .await
            .expect("Failed to query widget 2")
            .is_none()
    );
}
