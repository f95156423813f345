use futures::TryStreamExt;
use quickread::{
    Condition, Entity, Executor, Order, ProjectionRegistry, QuickRead, RegistryConfig,
    ReloadColumns, SchemaIntrospector, Scope, Value,
};
use rust_decimal::Decimal;
use std::{str::FromStr, sync::LazyLock};
use time::{Date, Month, PrimitiveDateTime, Time};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Entity, Debug, Clone, PartialEq)]
#[quickread(schema = "crm")]
pub struct Customer {
    #[quickread(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub born: Date,
    #[quickread(name = "balance_eur")]
    pub balance: Decimal,
    pub registered: PrimitiveDateTime,
    #[quickread(ignore)]
    pub notes: Vec<String>,
}

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn customers() -> Vec<Customer> {
    let registered = PrimitiveDateTime::new(
        Date::from_calendar_date(2024, Month::March, 1).unwrap(),
        Time::from_hms(9, 30, 0).unwrap(),
    );
    vec![
        Customer {
            id: Uuid::from_str("9b4e0e3c-7f8a-4c4b-9f59-1f0c7a3d2e11").unwrap(),
            name: "Ada".into(),
            email: Some("ada@example.com".into()),
            born: Date::from_calendar_date(1990, Month::December, 10).unwrap(),
            balance: Decimal::from_str("120.50").unwrap(),
            registered,
            notes: vec![],
        },
        Customer {
            id: Uuid::from_str("2c1f6f4e-51a9-4d2b-8d0e-6a7b9c3e4f22").unwrap(),
            name: "Grace".into(),
            email: None,
            born: Date::from_calendar_date(1985, Month::June, 2).unwrap(),
            balance: Decimal::from_str("980.00").unwrap(),
            registered,
            notes: vec![],
        },
        Customer {
            id: Uuid::from_str("f0e1d2c3-b4a5-4968-8776-655443322133").unwrap(),
            name: "Linus".into(),
            email: Some("linus@example.com".into()),
            born: Date::from_calendar_date(1969, Month::December, 28).unwrap(),
            balance: Decimal::from_str("45.25").unwrap(),
            registered,
            notes: vec![],
        },
    ]
}

async fn setup<E: Executor>(executor: &mut E) {
    Customer::delete_many(executor, &Condition::True)
        .await
        .expect("Failed to clear the customer table");
    for customer in customers() {
        Customer::insert_one(executor, &customer)
            .await
            .expect("Failed to insert a customer");
    }
}

pub async fn customer<E: Executor + SchemaIntrospector>(executor: &mut E) {
    let _lock = MUTEX.lock().await;
    setup(executor).await;

    assert_eq!(Customer::table().full_name(), "crm.customer");
    assert_eq!(
        Customer::columns()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>(),
        ["id", "name", "email", "born", "balance_eur", "registered"]
    );

    let mut registry = ProjectionRegistry::new();
    registry.register_pending::<Customer>();
    registry
        .materialize_all(executor)
        .await
        .expect("Failed to materialize the customer projection type");
    let projection_type = registry
        .projection_type::<Customer>()
        .expect("The customer projection type is not defined");
    assert_eq!(projection_type.len(), 6);
    assert_eq!(
        projection_type.primary_key_positions().collect::<Vec<_>>(),
        [0]
    );

    // Scoped query
    let rich = Customer::query_projections(
        executor,
        &registry,
        Scope::all()
            .filter(Condition::gt("balance_eur", 100))
            .order_by("balance_eur", Order::Desc),
    )
    .try_collect::<Vec<_>>()
    .await
    .expect("Failed to query the customers");
    assert_eq!(
        rich.iter()
            .map(|v| v.get_as::<String>("name").unwrap())
            .collect::<Vec<_>>(),
        ["Grace", "Ada"]
    );
    let grace = &rich[0];
    assert_eq!(grace.get("email"), Some(&Value::Varchar(None)));
    assert_eq!(grace.get_as::<Option<String>>("email").unwrap(), None);
    assert_eq!(
        grace.get_as::<Decimal>("balance_eur").unwrap(),
        Decimal::from_str("980").unwrap()
    );

    let youngest = Customer::query_projection(
        executor,
        &registry,
        Scope::all().order_by("born", Order::Desc).limit(5),
    )
    .await
    .expect("Failed to query the youngest customer")
    .expect("There are no customers");
    assert_eq!(youngest.get_as::<String>("name").unwrap(), "Ada");

    let nobody = Customer::query_projection(
        executor,
        &registry,
        Condition::is_null("email")
            .and(Condition::ne("name", "Grace"))
            .into(),
    )
    .await
    .expect("Failed to query customers without email");
    assert!(nobody.is_none());

    // Upgrade and change
    let mut linus = Customer::query_projection(
        executor,
        &registry,
        Condition::eq("name", "Linus").into(),
    )
    .await
    .expect("Failed to query Linus")
    .expect("Linus was not found");
    let record = linus.as_entity().expect("Failed to upgrade Linus");
    let first = record as *const _;
    assert_eq!(record.notes, Vec::<String>::new());
    assert_eq!(record.balance, Decimal::from_str("45.25").unwrap());
    assert!(std::ptr::eq(
        first,
        linus.as_entity().expect("Failed to upgrade Linus again")
    ));
    let record = linus.as_entity_mut().expect("Failed to upgrade Linus");
    record.email = None;
    record.balance += Decimal::ONE;
    let changes = record.changes();
    assert_eq!(
        changes.iter().map(|(name, ..)| *name).collect::<Vec<_>>(),
        ["email", "balance_eur"]
    );
    assert_eq!(changes[0].1, Value::Varchar(Some("linus@example.com".into())));
    assert_eq!(changes[0].2, Value::Varchar(None));
    record.save(executor).await.expect("Failed to save Linus");
    let record = linus.into_entity().expect("Failed to take the record of Linus");
    assert_eq!(record.balance, Decimal::from_str("46.25").unwrap());

    let stored = Customer::find_one(executor, Condition::eq("name", "Linus"))
        .await
        .expect("Failed to find Linus")
        .expect("Linus is gone");
    assert_eq!(stored.email, None);
    assert_eq!(stored.balance, Decimal::from_str("46.25").unwrap());
}

pub async fn customer_reload_all<E: Executor + SchemaIntrospector>(executor: &mut E) {
    let _lock = MUTEX.lock().await;
    setup(executor).await;

    let mut registry = ProjectionRegistry::with_config(RegistryConfig {
        reload_columns: ReloadColumns::All,
        ..Default::default()
    });
    let projection_type = registry
        .define_projection_type::<Customer>()
        .expect("Failed to define the customer projection type");
    assert_eq!(projection_type.reload_columns(), ReloadColumns::All);
    assert!(!registry.register_pending::<Customer>());

    let mut ada = Customer::build_projection(
        &registry,
        [
            ("id", Value::from(Uuid::from_str("9b4e0e3c-7f8a-4c4b-9f59-1f0c7a3d2e11").unwrap())),
            ("name", "Someone else".into()),
            ("favorite_color", "green".into()),
        ],
    )
    .expect("Failed to build the projection of Ada");
    assert_eq!(ada.get("born"), Some(&Value::Date(None)));
    assert!(ada.reload(executor).await.expect("Failed to reload Ada"));
    assert_eq!(ada.get_as::<String>("name").unwrap(), "Ada");
    assert_eq!(
        ada.get_as::<Date>("born").unwrap(),
        Date::from_calendar_date(1990, Month::December, 10).unwrap()
    );
    let record = ada.as_entity().expect("Failed to upgrade Ada");
    assert!(!record.is_changed());
    assert_eq!(record.entity(), &customers()[0]);
}
