use crate::{
    AsValue, ColumnDef, Condition, Entity, Error, Executor, PrimaryKeyType, Record, ReloadColumns,
    Result, Row, RowLabeled, RowNames, Scope, TableRef, Value, stream::TryStreamExt,
};
use std::{
    any::type_name,
    borrow::Cow,
    cell::OnceCell,
    fmt::{self, Debug, Formatter},
    pin::pin,
    sync::Arc,
};

/// Name, type prototype and key participation of a projected field.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: Cow<'static, str>,
    /// Typed empty value.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: PrimaryKeyType,
}

impl FieldDef {
    pub fn new(name: impl Into<Cow<'static, str>>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: value.as_null(),
            nullable: true,
            primary_key: PrimaryKeyType::None,
        }
    }
}

impl From<&ColumnDef> for FieldDef {
    fn from(value: &ColumnDef) -> Self {
        Self {
            name: Cow::Borrowed(value.name()),
            value: value.value.as_null(),
            nullable: value.nullable,
            primary_key: value.primary_key,
        }
    }
}

/// Read only shape of an entity: its fields in column order.
///
/// Built once per entity type by the [`ProjectionRegistry`](crate::ProjectionRegistry)
/// and shared by every projection of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionType {
    entity: &'static str,
    table: TableRef,
    fields: Box<[FieldDef]>,
    labels: RowNames,
    reload_columns: ReloadColumns,
}

impl ProjectionType {
    pub fn new(
        entity: &'static str,
        table: TableRef,
        fields: Vec<FieldDef>,
        reload_columns: ReloadColumns,
    ) -> Result<Self> {
        if table.name.is_empty() {
            return Err(Error::msg(format!(
                "Entity `{}` is not backed by a table",
                entity
            )));
        }
        if fields.is_empty() {
            return Err(Error::msg(format!(
                "Entity `{}` has no columns to project",
                entity
            )));
        }
        let labels = fields.iter().map(|f| f.name.to_string()).collect();
        Ok(Self {
            entity,
            table,
            fields: fields.into_boxed_slice(),
            labels,
            reload_columns,
        })
    }

    /// Shape taken from the columns `E` declares.
    pub fn from_columns<E: Entity>(reload_columns: ReloadColumns) -> Result<Self> {
        Self::new(
            type_name::<E>(),
            E::table().clone(),
            E::columns().iter().map(Into::into).collect(),
            reload_columns,
        )
    }

    /// Shape taken from the live columns of the table of `E`, in their order.
    ///
    /// Columns `E` declares keep its prototype and key flags, the others keep
    /// the live ones. Declared columns absent from the table are dropped.
    pub fn from_live<E: Entity>(live: Vec<FieldDef>, reload_columns: ReloadColumns) -> Result<Self> {
        let declared = E::columns();
        let fields: Vec<FieldDef> = live
            .into_iter()
            .map(|mut field| {
                if let Some(column) = declared.iter().find(|c| c.name() == field.name) {
                    field.value = column.value.as_null();
                    field.primary_key = column.primary_key;
                }
                field
            })
            .collect();
        for column in declared {
            if !fields.iter().any(|f| f.name == column.name()) {
                log::debug!(
                    "Column `{}` of `{}` is not in the live table, it will not be projected",
                    column.name(),
                    E::table()
                );
            }
        }
        Self::new(type_name::<E>(), E::table().clone(), fields, reload_columns)
    }

    /// Values in field order from `(name, value)` pairs.
    ///
    /// Unknown names are ignored, missing ones get the empty value of the field.
    pub fn build<K, V>(&self, attributes: impl IntoIterator<Item = (K, V)>) -> Row
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut values: Row = self.fields.iter().map(|f| f.value.clone()).collect();
        for (name, value) in attributes {
            let name = name.as_ref();
            match self.position(name) {
                Some(i) => values[i] = value.into(),
                None => log::trace!(
                    "Ignoring attribute `{}`, it is not a field of `{}`",
                    name,
                    self.entity
                ),
            }
        }
        values
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn primary_key_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key.is_key())
            .map(|(i, _)| i)
    }

    /// Rust type name of the entity.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
    pub fn table(&self) -> &TableRef {
        &self.table
    }
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
    pub fn labels(&self) -> &RowNames {
        &self.labels
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    pub fn reload_columns(&self) -> ReloadColumns {
        self.reload_columns
    }
}

/// Read only view over a row of `E`.
///
/// Field reads never touch the entity. The first call to one of the `as_entity`
/// family builds a [`Record`] from the field values and keeps it for the
/// lifetime of the projection.
pub struct Projection<E: Entity> {
    projection_type: Arc<ProjectionType>,
    values: Row,
    record: OnceCell<Record<E>>,
}

impl<E: Entity> Projection<E> {
    pub fn build<K, V>(
        projection_type: Arc<ProjectionType>,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let values = projection_type.build(attributes);
        Self {
            projection_type,
            values,
            record: OnceCell::new(),
        }
    }

    pub fn from_row(projection_type: Arc<ProjectionType>, row: RowLabeled) -> Self {
        let RowLabeled { labels, values } = row;
        if *labels == **projection_type.labels() {
            return Self {
                projection_type,
                values,
                record: OnceCell::new(),
            };
        }
        Self::build(projection_type, labels.iter().zip(values))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.projection_type
            .position(name)
            .map(|i| &self.values[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// The field converted into `T`.
    pub fn get_as<T: AsValue>(&self, name: &str) -> Result<T> {
        let Some(value) = self.get(name) else {
            return Err(Error::msg(format!(
                "`{}` is not a field of `{}`",
                name,
                self.projection_type.entity()
            )));
        };
        T::try_from_value(value.clone())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(name, value)` of every field.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.projection_type
            .fields()
            .iter()
            .map(|f| f.name.as_ref())
            .zip(self.values.iter())
    }

    pub fn labels(&self) -> &RowNames {
        self.projection_type.labels()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn projection_type(&self) -> &Arc<ProjectionType> {
        &self.projection_type
    }

    pub fn is_materialized(&self) -> bool {
        self.record.get().is_some()
    }

    pub fn as_entity(&self) -> Result<&Record<E>> {
        if let Some(record) = self.record.get() {
            return Ok(record);
        }
        let record = self.materialize()?;
        Ok(self.record.get_or_init(|| record))
    }

    pub fn as_entity_mut(&mut self) -> Result<&mut Record<E>> {
        if self.record.get().is_none() {
            self.record = OnceCell::from(self.materialize()?);
        }
        match self.record.get_mut() {
            Some(record) => Ok(record),
            None => unreachable!("The record is initialized by this point"),
        }
    }

    pub fn into_entity(self) -> Result<Record<E>> {
        let Self {
            projection_type,
            values,
            record,
        } = self;
        match record.into_inner() {
            Some(record) => Ok(record),
            None => Self::make_record(&projection_type, values),
        }
    }

    /// Reads the row again by primary key.
    ///
    /// Returns `false` when the row is gone, the values are left untouched in
    /// that case.
    pub async fn reload<Exec: Executor>(&mut self, executor: &mut Exec) -> Result<bool> {
        if let Some(record) = self.record.get_mut() {
            if !record.reload(executor).await? {
                return Ok(false);
            }
            let row = record.row_labeled();
            self.assign(row);
            return Ok(true);
        }
        let projection_type = self.projection_type.clone();
        let keys: Vec<usize> = projection_type.primary_key_positions().collect();
        if keys.is_empty() {
            return Err(Error::msg(format!(
                "The projection of `{}` has no primary key field, it cannot be reloaded",
                projection_type.entity()
            )));
        }
        let condition = Condition::all_equal(keys.into_iter().map(|i| {
            (
                projection_type.fields()[i].name.clone(),
                self.values[i].clone(),
            )
        }));
        let columns: Vec<Cow<'static, str>> = match projection_type.reload_columns() {
            ReloadColumns::Selected => projection_type
                .fields()
                .iter()
                .map(|f| f.name.clone())
                .collect(),
            // Declared columns the table still has, then the live only fields
            ReloadColumns::All => E::columns()
                .iter()
                .map(|c| Cow::Borrowed(c.name()))
                .filter(|name| projection_type.position(name).is_some())
                .chain(
                    projection_type
                        .fields()
                        .iter()
                        .filter(|f| !E::columns().iter().any(|c| c.name() == f.name))
                        .map(|f| f.name.clone()),
                )
                .collect(),
        };
        let select = Scope::from(condition)
            .limit(1)
            .select(projection_type.table().clone(), columns);
        let row = {
            let stream = executor.fetch(select.into());
            pin!(stream).try_next().await?
        };
        let Some(row) = row else {
            return Ok(false);
        };
        self.assign(row);
        Ok(true)
    }

    fn assign(&mut self, row: RowLabeled) {
        for (name, value) in row.labels.iter().zip(row.values) {
            if let Some(i) = self.projection_type.position(name) {
                self.values[i] = value;
            }
        }
    }

    fn materialize(&self) -> Result<Record<E>> {
        Self::make_record(&self.projection_type, self.values.clone())
    }

    fn make_record(projection_type: &ProjectionType, values: Row) -> Result<Record<E>> {
        log::trace!("Materializing a record of `{}`", projection_type.entity());
        Record::from_row(RowLabeled::new(projection_type.labels().clone(), values))
    }
}

impl<E: Entity> Debug for Projection<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("entity", &self.projection_type.entity())
            .field("values", &self.values)
            .field("materialized", &self.is_materialized())
            .finish()
    }
}
