use crate::{Condition, Row, RowNames, TableRef, Value};
use std::borrow::Cow;

/// Sort direction of an `ORDER BY` item.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// A column paired with its sort direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    pub column: Cow<'static, str>,
    pub order: Order,
}

/// `SELECT columns FROM table WHERE condition ORDER BY .. LIMIT ..`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: TableRef,
    pub columns: Vec<Cow<'static, str>>,
    pub condition: Condition,
    pub order_by: Vec<Ordered>,
    pub limit: Option<u32>,
}

/// `INSERT INTO table (columns) VALUES rows`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: RowNames,
    pub rows: Vec<Row>,
}

/// `UPDATE table SET column = value, .. WHERE condition`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: TableRef,
    pub values: Vec<(Cow<'static, str>, Value)>,
    pub condition: Condition,
}

/// `DELETE FROM table WHERE condition`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: TableRef,
    pub condition: Condition,
}
