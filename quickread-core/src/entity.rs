use crate::{
    ColumnDef, Condition, Delete, Executor, Insert, Result, Row, RowLabeled, RowNames,
    RowsAffected, Scope, TableRef, Value,
    stream::{Stream, StreamExt},
};
use futures::FutureExt;
use std::{future::Future, pin::pin};

/// A struct mapped to a database table.
///
/// Usually implemented through `#[derive(Entity)]`. The column list is stable
/// and ordered: `row_full` returns one value per column in the same order.
pub trait Entity: Send + Sized + 'static {
    fn table() -> &'static TableRef;
    fn columns() -> &'static [ColumnDef];
    fn primary_key_def() -> &'static [&'static ColumnDef];

    fn from_row(row: RowLabeled) -> Result<Self>;
    fn row_full(&self) -> Row;

    fn labels() -> RowNames {
        Self::columns()
            .iter()
            .map(|c| c.name().to_owned())
            .collect()
    }

    fn row_labeled(&self) -> RowLabeled {
        RowLabeled::new(Self::labels(), self.row_full())
    }

    /// Values of the primary key columns, in key order.
    fn primary_key(&self) -> Row {
        let row = self.row_full();
        primary_key_of::<Self>(&row)
    }

    /// Equality on every primary key column.
    fn primary_key_condition(values: impl IntoIterator<Item = Value>) -> Condition {
        Condition::all_equal(Self::primary_key_def().iter().map(|c| c.name()).zip(values))
    }

    fn find_many<Exec: Executor>(
        executor: &mut Exec,
        scope: Scope,
    ) -> impl Stream<Item = Result<Self>> + Send {
        let select = scope.select(Self::table().clone(), Self::columns().iter().map(|c| c.name()));
        executor
            .fetch(select.into())
            .map(|v| v.and_then(Self::from_row))
    }

    fn find_one<Exec: Executor>(
        executor: &mut Exec,
        condition: Condition,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let stream = Self::find_many(executor, Scope::from(condition).limit(1));
        async move { pin!(stream).into_future().map(|(v, _)| v).await.transpose() }
    }

    fn insert_one<Exec: Executor>(
        executor: &mut Exec,
        entity: &Self,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let insert = Insert {
            table: Self::table().clone(),
            columns: Self::labels(),
            rows: vec![entity.row_full()],
        };
        executor.execute(insert.into())
    }

    fn delete_many<Exec: Executor>(
        executor: &mut Exec,
        condition: &Condition,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let delete = Delete {
            table: Self::table().clone(),
            condition: condition.clone(),
        };
        executor.execute(delete.into())
    }
}

/// Picks the primary key values out of a full row of `E`.
pub(crate) fn primary_key_of<E: Entity>(row: &[Value]) -> Row {
    let columns = E::columns();
    E::primary_key_def()
        .iter()
        .filter_map(|pk| columns.iter().position(|c| c.name() == pk.name()))
        .filter_map(|i| row.get(i).cloned())
        .collect()
}
