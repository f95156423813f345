use crate::{FieldDef, Result, TableRef};
use std::future::Future;

/// Reads the live column layout of a table.
///
/// Projection types registered as pending are resolved through this trait once
/// the backend is reachable.
pub trait SchemaIntrospector {
    /// Columns of `table` in their physical order.
    fn table_columns(
        &mut self,
        table: &TableRef,
    ) -> impl Future<Output = Result<Vec<FieldDef>>> + Send;
}
