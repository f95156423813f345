use crate::{MemoryDriver, MemoryTable};
use quickread_core::{
    Context, Delete, Driver, Entity, Error, Executor, FieldDef, Insert, Query, QueryResult,
    Result, Row, RowLabeled, RowNames, RowsAffected, SchemaIntrospector, Select, SqlWriter,
    TableRef, Update, stream::{self, Stream}, truncate_long,
};
use std::collections::BTreeMap;

/// Connection to a set of tables living in the process.
///
/// Every statement run is rendered to SQL and appended to [`history`](Self::history).
#[derive(Default, Debug)]
pub struct MemoryConnection {
    tables: BTreeMap<String, MemoryTable>,
    history: Vec<String>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the table of `E` from its declared columns.
    pub fn create_table<E: Entity>(&mut self) -> Result<()> {
        self.create_table_with(
            E::table().clone(),
            E::columns().iter().map(Into::into).collect(),
        )
    }

    pub fn create_table_with(&mut self, table: TableRef, fields: Vec<FieldDef>) -> Result<()> {
        let name = table.full_name();
        if self.tables.contains_key(&name) {
            return Err(Error::msg(format!("Table `{}` already exists", name)));
        }
        self.tables.insert(name, MemoryTable::new(table, fields));
        Ok(())
    }

    pub fn drop_table(&mut self, table: &TableRef) -> Result<()> {
        self.tables
            .remove(&table.full_name())
            .map(|_| ())
            .ok_or_else(|| Error::msg(format!("Table `{}` does not exist", table)))
    }

    /// Appends a column, existing rows get its empty value.
    pub fn add_column(&mut self, table: &TableRef, field: FieldDef) -> Result<()> {
        let table = self.table_mut(table)?;
        if table.position(&field.name).is_ok() {
            return Err(Error::msg(format!(
                "Column `{}` already exists in table `{}`",
                field.name, table.table
            )));
        }
        for row in &mut table.rows {
            let mut values = std::mem::take(row).into_vec();
            values.push(field.value.clone());
            *row = values.into_boxed_slice();
        }
        table.fields.push(field);
        table.refresh_labels();
        Ok(())
    }

    pub fn drop_column(&mut self, table: &TableRef, column: &str) -> Result<()> {
        let table = self.table_mut(table)?;
        let position = table.position(column)?;
        for row in &mut table.rows {
            let mut values = std::mem::take(row).into_vec();
            values.remove(position);
            *row = values.into_boxed_slice();
        }
        table.fields.remove(position);
        table.refresh_labels();
        Ok(())
    }

    pub fn table(&self, table: &TableRef) -> Result<&MemoryTable> {
        self.tables
            .get(&table.full_name())
            .ok_or_else(|| Error::msg(format!("Table `{}` does not exist", table)))
    }

    fn table_mut(&mut self, table: &TableRef) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(&table.full_name())
            .ok_or_else(|| Error::msg(format!("Table `{}` does not exist", table)))
    }

    /// SQL of every statement run so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn last_query(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn evaluate(&mut self, query: Query) -> Result<Vec<QueryResult>> {
        match query {
            Query::Raw(..) => Err(Error::msg(
                "Raw queries are not supported by the memory driver",
            )),
            Query::Select(select) => self.select(select),
            Query::Insert(insert) => self.insert(insert).map(|v| vec![v.into()]),
            Query::Update(update) => self.update(update).map(|v| vec![v.into()]),
            Query::Delete(delete) => self.delete(delete).map(|v| vec![v.into()]),
        }
    }

    fn select(&self, select: Select) -> Result<Vec<QueryResult>> {
        let table = self.table(&select.table)?;
        let (positions, labels): (Vec<usize>, RowNames) = if select.columns.is_empty() {
            ((0..table.fields.len()).collect(), table.labels.clone())
        } else {
            let positions = select
                .columns
                .iter()
                .map(|c| table.position(c))
                .collect::<Result<Vec<_>>>()?;
            let labels = positions
                .iter()
                .map(|&i| table.fields[i].name.to_string())
                .collect();
            (positions, labels)
        };
        let mut indexes = table.filter(&select.condition)?;
        table.sort(&mut indexes, &select.order_by)?;
        if let Some(limit) = select.limit {
            indexes.truncate(limit as usize);
        }
        Ok(indexes
            .into_iter()
            .map(|i| {
                let row = &table.rows[i];
                RowLabeled::new(
                    labels.clone(),
                    positions.iter().map(|&p| row[p].clone()).collect(),
                )
                .into()
            })
            .collect())
    }

    fn insert(&mut self, insert: Insert) -> Result<RowsAffected> {
        let table = self.table_mut(&insert.table)?;
        let positions = insert
            .columns
            .iter()
            .map(|c| table.position(c))
            .collect::<Result<Vec<_>>>()?;
        let keys = table.primary_key_positions();
        let mut rows_affected = 0;
        for values in insert.rows {
            if values.len() != positions.len() {
                return Err(Error::msg(format!(
                    "Expected {} values but the row has {}",
                    positions.len(),
                    values.len()
                )));
            }
            let mut row: Row = table.fields.iter().map(|f| f.value.as_null()).collect();
            for (&position, value) in positions.iter().zip(values) {
                row[position] = value;
            }
            if !keys.is_empty()
                && table
                    .rows
                    .iter()
                    .any(|existing| keys.iter().all(|&k| existing[k] == row[k]))
            {
                return Err(Error::msg(format!(
                    "Duplicate primary key in table `{}`",
                    table.table
                )));
            }
            table.rows.push(row);
            rows_affected += 1;
        }
        Ok(RowsAffected {
            rows_affected,
            last_affected_id: None,
        })
    }

    fn update(&mut self, update: Update) -> Result<RowsAffected> {
        let table = self.table_mut(&update.table)?;
        let assignments = update
            .values
            .into_iter()
            .map(|(c, v)| Ok((table.position(&c)?, v)))
            .collect::<Result<Vec<_>>>()?;
        let indexes = table.filter(&update.condition)?;
        for &i in &indexes {
            for (position, value) in &assignments {
                table.rows[i][*position] = value.clone();
            }
        }
        Ok(RowsAffected {
            rows_affected: indexes.len() as u64,
            last_affected_id: None,
        })
    }

    fn delete(&mut self, delete: Delete) -> Result<RowsAffected> {
        let table = self.table_mut(&delete.table)?;
        let indexes = table.filter(&delete.condition)?;
        let mut i = 0;
        table.rows.retain(|_| {
            let keep = indexes.binary_search(&i).is_err();
            i += 1;
            keep
        });
        Ok(RowsAffected {
            rows_affected: indexes.len() as u64,
            last_affected_id: None,
        })
    }
}

impl Executor for MemoryConnection {
    type Driver = MemoryDriver;

    fn driver(&self) -> &Self::Driver {
        &MemoryDriver
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let mut sql = String::with_capacity(128);
        self.driver().sql_writer().write_query(&mut sql, &query);
        log::trace!("Running:\n{}", truncate_long!(sql));
        let context = format!("While running the query:\n{}", truncate_long!(sql));
        self.history.push(sql);
        let results = match self.evaluate(query).context(context) {
            Ok(results) => results.into_iter().map(Ok).collect(),
            Err(error) => {
                log::error!("{:#}", error);
                vec![Err(error)]
            }
        };
        stream::iter(results)
    }
}

impl SchemaIntrospector for MemoryConnection {
    async fn table_columns(&mut self, table: &TableRef) -> Result<Vec<FieldDef>> {
        self.table(table).map(|v| v.fields.clone())
    }
}
