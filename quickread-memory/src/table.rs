use crate::compare::compare;
use quickread_core::{
    Comparison, Condition, Error, FieldDef, Order, Ordered, Result, Row, RowNames, TableRef,
    Value,
};
use std::cmp::Ordering;

/// Rows of a process local table.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    pub(crate) table: TableRef,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) labels: RowNames,
    pub(crate) rows: Vec<Row>,
}

impl MemoryTable {
    pub fn new(table: TableRef, fields: Vec<FieldDef>) -> Self {
        let labels = fields.iter().map(|f| f.name.to_string()).collect();
        Self {
            table,
            fields,
            labels,
            rows: Vec::new(),
        }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn position(&self, column: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name == column)
            .ok_or_else(|| {
                Error::msg(format!(
                    "Column `{}` does not exist in table `{}`",
                    column, self.table
                ))
            })
    }

    pub(crate) fn refresh_labels(&mut self) {
        self.labels = self.fields.iter().map(|f| f.name.to_string()).collect();
    }

    pub(crate) fn primary_key_positions(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key.is_key())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether `row` satisfies `condition`. Comparisons with null never do.
    pub(crate) fn matches(&self, condition: &Condition, row: &[Value]) -> Result<bool> {
        Ok(match condition {
            Condition::True => true,
            Condition::Compare(column, comparison, value) => {
                let current = &row[self.position(column)?];
                if current.is_null() || value.is_null() {
                    return Ok(false);
                }
                match compare(current, value) {
                    Some(ordering) => match comparison {
                        Comparison::Equal => ordering == Ordering::Equal,
                        Comparison::NotEqual => ordering != Ordering::Equal,
                        Comparison::Less => ordering == Ordering::Less,
                        Comparison::LessEqual => ordering != Ordering::Greater,
                        Comparison::Greater => ordering == Ordering::Greater,
                        Comparison::GreaterEqual => ordering != Ordering::Less,
                    },
                    None => {
                        return Err(Error::msg(format!(
                            "Cannot compare column `{}` holding {:?} with {:?}",
                            column, current, value
                        )));
                    }
                }
            }
            Condition::IsNull(column) => row[self.position(column)?].is_null(),
            Condition::Not(inner) => !self.matches(inner, row)?,
            Condition::And(items) => {
                for item in items {
                    if !self.matches(item, row)? {
                        return Ok(false);
                    }
                }
                true
            }
            Condition::Or(items) => {
                for item in items {
                    if self.matches(item, row)? {
                        return Ok(true);
                    }
                }
                false
            }
        })
    }

    /// Indexes of the rows satisfying `condition`, in storage order.
    pub(crate) fn filter(&self, condition: &Condition) -> Result<Vec<usize>> {
        let mut result = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            if self.matches(condition, row)? {
                result.push(i);
            }
        }
        Ok(result)
    }

    /// Sorts row indexes by `order_by`, nulls go last in ascending order.
    pub(crate) fn sort(&self, indexes: &mut [usize], order_by: &[Ordered]) -> Result<()> {
        let keys = order_by
            .iter()
            .map(|v| Ok((self.position(&v.column)?, v.order)))
            .collect::<Result<Vec<_>>>()?;
        indexes.sort_by(|&a, &b| {
            for &(position, order) in &keys {
                let (l, r) = (&self.rows[a][position], &self.rows[b][position]);
                let ordering = match (l.is_null(), r.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => compare(l, r).unwrap_or(Ordering::Equal),
                };
                let ordering = match order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }
}
