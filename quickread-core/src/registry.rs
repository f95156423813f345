use crate::{Context, Entity, Error, FieldDef, ProjectionType, Result, SchemaIntrospector, TableRef};
use std::{
    any::{TypeId, type_name},
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::Instant,
};

/// What `materialize_all` does when an entity cannot be resolved.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log a warning, record the failure in the report and move on.
    #[default]
    LogAndContinue,
    /// Stop at the first failure and return it.
    Abort,
}

/// Columns selected when a projection reloads without a record.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadColumns {
    /// The fields of the projection.
    #[default]
    Selected,
    /// Every column of the entity the table still has, plus the fields only
    /// found in the live table.
    All,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    pub failure_policy: FailurePolicy,
    pub reload_columns: ReloadColumns,
}

/// Outcome of a [`ProjectionRegistry::materialize_all`] run.
#[derive(Default, Debug)]
pub struct MaterializeReport {
    /// Entities defined by this run, in order.
    pub defined: Vec<&'static str>,
    /// Entities that could not be defined.
    pub failed: Vec<(&'static str, Error)>,
}

impl MaterializeReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Copy)]
struct Pending {
    type_id: TypeId,
    name: &'static str,
    table: &'static TableRef,
    build: fn(Vec<FieldDef>, ReloadColumns) -> Result<ProjectionType>,
}

/// Owns the projection type of every registered entity.
///
/// Entities are either defined straight from their declared columns or queued
/// and resolved later against the live schema, once it is reachable.
#[derive(Default)]
pub struct ProjectionRegistry {
    config: RegistryConfig,
    pending: VecDeque<Pending>,
    types: HashMap<TypeId, Arc<ProjectionType>>,
}

impl ProjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Queues `E` for [`materialize_all`](Self::materialize_all).
    ///
    /// Returns `false` when `E` is already defined or queued.
    pub fn register_pending<E: Entity>(&mut self) -> bool {
        let type_id = TypeId::of::<E>();
        if self.types.contains_key(&type_id) || self.pending.iter().any(|v| v.type_id == type_id) {
            return false;
        }
        self.pending.push_back(Pending {
            type_id,
            name: type_name::<E>(),
            table: E::table(),
            build: ProjectionType::from_live::<E>,
        });
        true
    }

    /// Resolves every queued entity against the live schema, in registration order.
    pub async fn materialize_all<S: SchemaIntrospector>(
        &mut self,
        schema: &mut S,
    ) -> Result<MaterializeReport> {
        let start = Instant::now();
        let mut report = MaterializeReport::default();
        while let Some(entry) = self.pending.pop_front() {
            if self.types.contains_key(&entry.type_id) {
                continue;
            }
            let result = schema
                .table_columns(entry.table)
                .await
                .and_then(|live| (entry.build)(live, self.config.reload_columns))
                .with_context(|| {
                    format!("Could not materialize the projection type of `{}`", entry.name)
                });
            match result {
                Ok(projection_type) => {
                    log::trace!(
                        "Projection type of `{}` has {} fields",
                        entry.name,
                        projection_type.len()
                    );
                    self.types.insert(entry.type_id, Arc::new(projection_type));
                    report.defined.push(entry.name);
                }
                Err(error) => match self.config.failure_policy {
                    FailurePolicy::LogAndContinue => {
                        log::warn!("{:#}", error);
                        report.failed.push((entry.name, error));
                    }
                    FailurePolicy::Abort => {
                        self.pending.push_front(entry);
                        return Err(error);
                    }
                },
            }
        }
        log::debug!(
            "Materialized {} projection types in {:?}",
            report.defined.len(),
            start.elapsed()
        );
        Ok(report)
    }

    /// Defines the projection type of `E` from its declared columns.
    ///
    /// An existing definition is returned as is.
    pub fn define_projection_type<E: Entity>(&mut self) -> Result<Arc<ProjectionType>> {
        let type_id = TypeId::of::<E>();
        if let Some(projection_type) = self.types.get(&type_id) {
            return Ok(projection_type.clone());
        }
        let projection_type = Arc::new(ProjectionType::from_columns::<E>(
            self.config.reload_columns,
        )?);
        self.types.insert(type_id, projection_type.clone());
        self.pending.retain(|v| v.type_id != type_id);
        Ok(projection_type)
    }

    pub fn projection_type<E: Entity>(&self) -> Option<Arc<ProjectionType>> {
        self.types.get(&TypeId::of::<E>()).cloned()
    }

    /// Like [`projection_type`](Self::projection_type), failing when `E` is not defined.
    pub fn require<E: Entity>(&self) -> Result<Arc<ProjectionType>> {
        self.projection_type::<E>().ok_or_else(|| {
            Error::msg(format!(
                "The projection type of `{}` is not defined",
                type_name::<E>()
            ))
        })
    }

    pub fn is_defined<E: Entity>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<E>())
    }

    /// Names of the entities waiting for materialization.
    pub fn pending(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pending.iter().map(|v| v.name)
    }

    /// Number of defined projection types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
