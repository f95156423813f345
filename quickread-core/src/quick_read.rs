use crate::{
    Entity, Executor, Projection, ProjectionRegistry, Record, Result, Scope, Value,
    stream::{self, Stream, StreamExt, TryStreamExt},
};
use std::{future::Future, pin::pin};

/// Projection entry points of an entity, available on every [`Entity`].
pub trait QuickRead: Entity {
    /// A projection holding `attributes`.
    fn build_projection<K, V>(
        registry: &ProjectionRegistry,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Projection<Self>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        Ok(Projection::build(registry.require::<Self>()?, attributes))
    }

    /// Projections of the rows in `scope`, selecting just the projected fields.
    fn query_projections<Exec: Executor>(
        executor: &mut Exec,
        registry: &ProjectionRegistry,
        scope: Scope,
    ) -> impl Stream<Item = Result<Projection<Self>>> + Send {
        match registry.require::<Self>() {
            Ok(projection_type) => {
                let select = scope.select(
                    projection_type.table().clone(),
                    projection_type.fields().iter().map(|f| f.name.clone()),
                );
                executor
                    .fetch(select.into())
                    .map(move |v| v.map(|row| Projection::from_row(projection_type.clone(), row)))
                    .left_stream()
            }
            Err(error) => stream::once(async move { Err(error) }).right_stream(),
        }
    }

    /// The first projection in `scope`.
    fn query_projection<Exec: Executor>(
        executor: &mut Exec,
        registry: &ProjectionRegistry,
        scope: Scope,
    ) -> impl Future<Output = Result<Option<Projection<Self>>>> + Send {
        let stream = Self::query_projections(executor, registry, scope.limit(1));
        async move { pin!(stream).try_next().await }
    }

    /// Record of an already stored row, persisted and unchanged.
    fn from_persisted<K, V>(attributes: impl IntoIterator<Item = (K, V)>) -> Result<Record<Self>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        Record::from_persisted(attributes)
    }
}

impl<E: Entity> QuickRead for E {}
