use crate::{Customer, Widget, silent_logs};
use quickread::{
    Entity, Executor, FailurePolicy, ProjectionRegistry, QuickRead, RegistryConfig,
    SchemaIntrospector, Scope,
};

/// Entity whose table is never created.
#[derive(Entity, Debug)]
#[quickread(name = "unmapped_things")]
pub struct Unmapped {
    #[quickread(primary_key)]
    pub code: String,
    pub amount: Option<i32>,
}

pub async fn registry<E: Executor + SchemaIntrospector>(executor: &mut E) {
    // Failures are collected and the batch goes on
    let mut registry = ProjectionRegistry::new();
    assert!(registry.register_pending::<Widget>());
    assert!(registry.register_pending::<Unmapped>());
    assert!(registry.register_pending::<Customer>());
    assert_eq!(registry.pending().count(), 3);
    let report;
    silent_logs! {
        report = registry
            .materialize_all(executor)
            .await
            .expect("The default policy must not fail");
    }
    assert_eq!(report.defined.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].0.ends_with("Unmapped"));
    assert!(registry.is_defined::<Widget>());
    assert!(registry.is_defined::<Customer>());
    assert!(!registry.is_defined::<Unmapped>());
    assert_eq!(registry.len(), 2);
    assert!(Unmapped::build_projection(&registry, [("code", "x")]).is_err());
    let result: Vec<_> = futures::StreamExt::collect(Unmapped::query_projections(
        executor,
        &registry,
        Scope::all(),
    ))
    .await;
    assert_eq!(result.len(), 1);
    assert!(result[0].is_err());

    // Running again does not redefine anything
    let report = registry
        .materialize_all(executor)
        .await
        .expect("Nothing is pending");
    assert!(report.defined.is_empty());

    // The first failure stops the batch
    let mut registry = ProjectionRegistry::with_config(RegistryConfig {
        failure_policy: FailurePolicy::Abort,
        ..Default::default()
    });
    registry.register_pending::<Unmapped>();
    registry.register_pending::<Widget>();
    assert!(registry.materialize_all(executor).await.is_err());
    assert!(!registry.is_defined::<Widget>());
    assert_eq!(registry.pending().count(), 2);

    // Declared columns are enough to define a type
    let projection_type = registry
        .define_projection_type::<Unmapped>()
        .expect("Declared columns do not need the live table");
    assert_eq!(projection_type.len(), 2);
    assert_eq!(registry.pending().count(), 1);
}
