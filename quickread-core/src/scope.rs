use crate::{Condition, Order, Ordered, Select, TableRef};
use std::borrow::Cow;

/// The filter, ordering and limit applied to an entity query.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Scope {
    pub condition: Condition,
    pub order_by: Vec<Ordered>,
    pub limit: Option<u32>,
}

impl Scope {
    /// Every row, unordered, unlimited.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.condition = self.condition.and(condition);
        self
    }

    pub fn order_by(mut self, column: impl Into<Cow<'static, str>>, order: Order) -> Self {
        self.order_by.push(Ordered {
            column: column.into(),
            order,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(self.limit.map_or(limit, |v| v.min(limit)));
        self
    }

    /// The select statement reading `columns` from `table` within this scope.
    pub fn select<C>(self, table: TableRef, columns: impl IntoIterator<Item = C>) -> Select
    where
        C: Into<Cow<'static, str>>,
    {
        Select {
            table,
            columns: columns.into_iter().map(Into::into).collect(),
            condition: self.condition,
            order_by: self.order_by,
            limit: self.limit,
        }
    }
}

impl From<Condition> for Scope {
    fn from(value: Condition) -> Self {
        Self {
            condition: value,
            ..Default::default()
        }
    }
}
