use crate::Value;
use std::{borrow::Cow, ops::Not};

/// Comparison operator between a column and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

/// Row filter of a scope or statement.
///
/// Comparisons involving a null value never match, like in SQL. Use
/// [`Condition::is_null`] to test for missing values.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Condition {
    /// Matches every row.
    #[default]
    True,
    Compare(Cow<'static, str>, Comparison, Value),
    IsNull(Cow<'static, str>),
    Not(Box<Condition>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn compare(
        column: impl Into<Cow<'static, str>>,
        comparison: Comparison,
        value: impl Into<Value>,
    ) -> Self {
        Condition::Compare(column.into(), comparison, value.into())
    }
    pub fn eq(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Equal, value)
    }
    pub fn ne(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::NotEqual, value)
    }
    pub fn lt(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Less, value)
    }
    pub fn le(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::LessEqual, value)
    }
    pub fn gt(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::Greater, value)
    }
    pub fn ge(column: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::compare(column, Comparison::GreaterEqual, value)
    }
    pub fn is_null(column: impl Into<Cow<'static, str>>) -> Self {
        Condition::IsNull(column.into())
    }

    /// Conjunction, flattening nested `And` and dropping `True`.
    pub fn and(self, other: Condition) -> Self {
        match (self, other) {
            (Condition::True, v) | (v, Condition::True) => v,
            (Condition::And(mut l), Condition::And(r)) => {
                l.extend(r);
                Condition::And(l)
            }
            (Condition::And(mut l), r) => {
                l.push(r);
                Condition::And(l)
            }
            (l, Condition::And(mut r)) => {
                r.insert(0, l);
                Condition::And(r)
            }
            (l, r) => Condition::And(vec![l, r]),
        }
    }

    /// Disjunction, flattening nested `Or`. Anything or `True` is `True`.
    pub fn or(self, other: Condition) -> Self {
        match (self, other) {
            (Condition::True, _) | (_, Condition::True) => Condition::True,
            (Condition::Or(mut l), Condition::Or(r)) => {
                l.extend(r);
                Condition::Or(l)
            }
            (Condition::Or(mut l), r) => {
                l.push(r);
                Condition::Or(l)
            }
            (l, Condition::Or(mut r)) => {
                r.insert(0, l);
                Condition::Or(r)
            }
            (l, r) => Condition::Or(vec![l, r]),
        }
    }

    /// Equality on every `(column, value)` pair.
    pub fn all_equal<C, V>(pairs: impl IntoIterator<Item = (C, V)>) -> Self
    where
        C: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        pairs
            .into_iter()
            .fold(Condition::True, |acc, (c, v)| acc.and(Condition::eq(c, v)))
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Condition::True)
    }
}

impl Not for Condition {
    type Output = Condition;
    fn not(self) -> Self::Output {
        match self {
            Condition::Not(v) => *v,
            v => Condition::Not(Box::new(v)),
        }
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        if value {
            Condition::True
        } else {
            Condition::Not(Box::new(Condition::True))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_flattens() {
        let condition = Condition::eq("a", 1)
            .and(Condition::True)
            .and(Condition::gt("b", 2).and(Condition::lt("c", 3)));
        let Condition::And(items) = condition else {
            panic!("Expected a conjunction");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Condition::eq("a", 1));
        assert_eq!(items[2], Condition::lt("c", 3));
    }

    #[test]
    fn or_absorbs_true() {
        assert_eq!(
            Condition::eq("a", 1).or(Condition::True),
            Condition::True
        );
        assert!(matches!(
            Condition::eq("a", 1).or(Condition::eq("a", 2)),
            Condition::Or(v) if v.len() == 2
        ));
    }

    #[test]
    fn double_negation() {
        let condition = !!Condition::is_null("name");
        assert_eq!(condition, Condition::is_null("name"));
    }

    #[test]
    fn all_equal_of_nothing_is_true() {
        assert!(Condition::all_equal(Vec::<(&'static str, i32)>::new()).is_true());
        assert_eq!(
            Condition::all_equal([("id", 1)]),
            Condition::eq("id", 1)
        );
    }
}
