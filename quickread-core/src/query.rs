use crate::{Delete, GenericSqlWriter, Insert, Select, SqlWriter, Update, Value, truncate_long};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// A statement ready to be handed to an [`Executor`](crate::Executor).
///
/// Statements stay structured until the driver decides how to run them: SQL
/// backends render them through their [`SqlWriter`], others can evaluate them
/// directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Unstructured SQL text.
    Raw(String),
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Query {
    /// Render this query with the generic SQL dialect.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(128);
        GenericSqlWriter::new().write_query(&mut out, self);
        out
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::Raw(Default::default())
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Query::Raw(value.into())
    }
}

impl From<String> for Query {
    fn from(value: String) -> Self {
        Query::Raw(value)
    }
}

impl From<Select> for Query {
    fn from(value: Select) -> Self {
        Query::Select(value)
    }
}

impl From<Insert> for Query {
    fn from(value: Insert) -> Self {
        Query::Insert(value)
    }
}

impl From<Update> for Query {
    fn from(value: Update) -> Self {
        Query::Update(value)
    }
}

impl From<Delete> for Query {
    fn from(value: Delete) -> Self {
        Query::Delete(value)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Raw(query) => write!(f, "{}", truncate_long!(query)),
            _ => {
                let query = self.to_sql();
                write!(f, "{}", truncate_long!(query))
            }
        }
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted / affected identifier when available.
    pub last_affected_id: Option<i64>,
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

/// Collects `(name, value)` pairs, keys given as `&str`, `String` or column
/// references.
impl<K, V> FromIterator<(K, V)> for RowLabeled
where
    K: AsRef<str>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let (labels, values): (Vec<String>, Vec<Value>) = iter
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.into()))
            .unzip();
        Self {
            labels: labels.into(),
            values: values.into_boxed_slice(),
        }
    }
}

/// Heterogeneous items emitted by `Executor::run` combining rows and modify results.
#[derive(Debug)]
pub enum QueryResult {
    /// A labeled row.
    Row(RowLabeled),
    /// A modify effect aggregation.
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
