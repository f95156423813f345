use crate::{
    Context, Entity, Error, Executor, Insert, Result, Row, RowLabeled, Scope, Update, Value,
    entity::primary_key_of, stream::TryStreamExt,
};
use log::Level;
use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
    pin::pin,
};

/// Lifecycle of a [`Record`] relative to its row.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Not stored yet.
    #[default]
    New,
    /// Loaded from or written to the store.
    Persisted,
    /// Its row was deleted.
    Deleted,
}

/// Change tracked entity.
///
/// Keeps the row last synchronized with the store, changes are computed by
/// comparing it against the current state of the entity.
#[derive(Debug)]
pub struct Record<E: Entity> {
    entity: E,
    state: RecordState,
    snapshot: Option<Row>,
}

impl<E: Entity> Record<E> {
    /// A record that was never saved.
    pub fn new(entity: E) -> Self {
        Self {
            entity,
            state: RecordState::New,
            snapshot: None,
        }
    }

    /// Record of a row read from the store, persisted and unchanged.
    pub fn from_row(row: RowLabeled) -> Result<Self> {
        let entity = E::from_row(row)
            .with_context(|| format!("Could not build an entity of `{}`", E::table()))?;
        let snapshot = entity.row_full();
        Ok(Self {
            entity,
            state: RecordState::Persisted,
            snapshot: Some(snapshot),
        })
    }

    /// Same as [`Record::from_row`] starting from `(column, value)` pairs.
    pub fn from_persisted<K, V>(attributes: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        Self::from_row(attributes.into_iter().collect())
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn into_inner(self) -> E {
        self.entity
    }

    pub fn state(&self) -> RecordState {
        self.state
    }
    pub fn is_new(&self) -> bool {
        self.state == RecordState::New
    }
    pub fn is_persisted(&self) -> bool {
        self.state == RecordState::Persisted
    }
    pub fn is_deleted(&self) -> bool {
        self.state == RecordState::Deleted
    }

    /// Columns whose value differs from the last synchronized row. Every column
    /// of a record without a snapshot counts as changed.
    pub fn changed_columns(&self) -> Vec<&'static str> {
        self.changes().into_iter().map(|(name, ..)| name).collect()
    }

    /// `(column, previous, current)` for every changed column.
    pub fn changes(&self) -> Vec<(&'static str, Value, Value)> {
        let current = self.entity.row_full();
        E::columns()
            .iter()
            .zip(current)
            .enumerate()
            .filter_map(|(i, (column, value))| {
                let previous = self
                    .snapshot
                    .as_ref()
                    .and_then(|v| v.get(i))
                    .cloned()
                    .unwrap_or_else(|| column.value.as_null());
                if self.snapshot.is_none() || previous != value {
                    Some((column.name(), previous, value))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn is_changed(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Writes the entity to the store.
    ///
    /// New records are inserted. Persisted records update only the changed
    /// columns and skip the round trip when nothing changed.
    pub async fn save<Exec: Executor>(&mut self, executor: &mut Exec) -> Result<()> {
        let table = E::table();
        match self.state {
            RecordState::Deleted => {
                return Err(Error::msg(format!(
                    "Cannot save a deleted record of `{}`",
                    table
                )));
            }
            RecordState::New => {
                let row = self.entity.row_full();
                let insert = Insert {
                    table: table.clone(),
                    columns: E::labels(),
                    rows: vec![row.clone()],
                };
                executor
                    .execute(insert.into())
                    .await
                    .with_context(|| format!("While inserting a record into `{}`", table))?;
                self.snapshot = Some(row);
            }
            RecordState::Persisted => {
                let changes = self.changes();
                if changes.is_empty() {
                    return Ok(());
                }
                let update = Update {
                    table: table.clone(),
                    values: changes
                        .into_iter()
                        .map(|(name, _, value)| (Cow::Borrowed(name), value))
                        .collect(),
                    condition: E::primary_key_condition(self.snapshot_key()?),
                };
                executor
                    .execute(update.into())
                    .await
                    .with_context(|| format!("While updating a record of `{}`", table))?;
                self.snapshot = Some(self.entity.row_full());
            }
        }
        self.state = RecordState::Persisted;
        Ok(())
    }

    /// Deletes the row of this record, exactly one row is expected to go.
    pub async fn delete<Exec: Executor>(&mut self, executor: &mut Exec) -> Result<()> {
        if !self.is_persisted() {
            return Err(Error::msg(format!(
                "Only persisted records of `{}` can be deleted",
                E::table()
            )));
        }
        let condition = E::primary_key_condition(self.snapshot_key()?);
        let result = E::delete_many(executor, &condition).await?;
        if result.rows_affected != 1 {
            let error = Error::msg(format!(
                "The query deleted {} rows instead of the expected 1",
                result.rows_affected
            ));
            log::log!(
                if result.rows_affected == 0 {
                    Level::Info
                } else {
                    Level::Error
                },
                "{}",
                error
            );
            return Err(error);
        }
        self.state = RecordState::Deleted;
        self.snapshot = None;
        Ok(())
    }

    /// Reads the row again. Returns `false` when it no longer exists, leaving
    /// the record untouched. A deleted record has no row to read.
    pub async fn reload<Exec: Executor>(&mut self, executor: &mut Exec) -> Result<bool> {
        if self.is_deleted() {
            return Ok(false);
        }
        if !self.is_persisted() {
            return Err(Error::msg(format!(
                "Only persisted records of `{}` can be reloaded",
                E::table()
            )));
        }
        let select = Scope::from(E::primary_key_condition(self.snapshot_key()?))
            .limit(1)
            .select(E::table().clone(), E::columns().iter().map(|c| c.name()));
        let row = {
            let stream = executor.fetch(select.into());
            pin!(stream).try_next().await?
        };
        let Some(row) = row else {
            return Ok(false);
        };
        self.entity = E::from_row(row)?;
        self.snapshot = Some(self.entity.row_full());
        Ok(true)
    }

    fn snapshot_key(&self) -> Result<Row> {
        if E::primary_key_def().is_empty() {
            return Err(Error::msg(format!(
                "Entity `{}` does not declare a primary key",
                E::table()
            )));
        }
        let row = match &self.snapshot {
            Some(v) => primary_key_of::<E>(v),
            None => self.entity.primary_key(),
        };
        Ok(row)
    }
}

impl<E: Entity> Deref for Record<E> {
    type Target = E;
    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

impl<E: Entity> DerefMut for Record<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entity
    }
}

impl<E: Entity> From<E> for Record<E> {
    fn from(value: E) -> Self {
        Self::new(value)
    }
}
