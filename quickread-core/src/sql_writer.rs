use crate::{
    Comparison, Condition, Delete, Insert, Order, Query, Select, TableRef, Update, Value,
    possibly_parenthesized, separated_by,
};
use std::fmt::Write;
use time::{Date, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Dialect printer converting structured statements into SQL strings.
///
/// Every method has a generic implementation; drivers override the pieces
/// their dialect spells differently.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(out, value, '"', "\"\"");
        out.push('"');
    }

    fn write_table_ref(&self, out: &mut String, value: &TableRef) {
        if !value.schema.is_empty() {
            self.write_identifier_quoted(out, &value.schema);
            out.push('.');
        }
        self.write_identifier_quoted(out, &value.name);
    }

    fn write_value_none(&self, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(if value { "true" } else { "false" });
    }

    fn write_value_infinity(&self, out: &mut String, negative: bool) {
        out.push_str(if negative { "'-Infinity'" } else { "'Infinity'" });
    }

    fn write_value_nan(&self, out: &mut String) {
        out.push_str("'NaN'");
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        out.push_str(&hex::encode(value));
        out.push('\'');
    }

    /// `YYYY-MM-DD`
    fn write_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// `HH:MM:SS` followed by the fraction of second when not zero.
    fn write_time(&self, out: &mut String, value: &Time) {
        let _ = write!(
            out,
            "{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let nanoseconds = value.nanosecond();
        if nanoseconds != 0 {
            let fraction = format!("{:09}", nanoseconds);
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }
    }

    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(out),
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::Int128(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::UInt128(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, out, *v),
            Value::Float64(Some(v)) => write_float!(self, out, *v),
            Value::Decimal(Some(v), ..) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_date(out, &v.date());
                out.push(' ');
                self.write_time(out, &v.time());
                out.push('\'');
            }
            Value::TimestampWithTimezone(Some(v)) => {
                let (hours, minutes, _) = v.offset().as_hms();
                out.push('\'');
                self.write_date(out, &v.date());
                out.push(' ');
                self.write_time(out, &v.time());
                let _ = write!(
                    out,
                    "{}{:02}:{:02}",
                    if v.offset().is_negative() { '-' } else { '+' },
                    hours.unsigned_abs(),
                    minutes.unsigned_abs()
                );
                out.push('\'');
            }
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            _ => self.write_value_none(out),
        }
    }

    fn write_comparison(&self, out: &mut String, value: Comparison) {
        out.push_str(match value {
            Comparison::Equal => " = ",
            Comparison::NotEqual => " != ",
            Comparison::Less => " < ",
            Comparison::LessEqual => " <= ",
            Comparison::Greater => " > ",
            Comparison::GreaterEqual => " >= ",
        });
    }

    fn write_condition(&self, out: &mut String, value: &Condition) {
        let compound = |v: &Condition| matches!(v, Condition::And(..) | Condition::Or(..));
        match value {
            Condition::True => out.push_str("true"),
            Condition::Compare(column, comparison, value) => {
                self.write_identifier_quoted(out, column);
                self.write_comparison(out, *comparison);
                self.write_value(out, value);
            }
            Condition::IsNull(column) => {
                self.write_identifier_quoted(out, column);
                out.push_str(" IS NULL");
            }
            Condition::Not(inner) => {
                out.push_str("NOT ");
                possibly_parenthesized!(
                    out,
                    !matches!(**inner, Condition::True | Condition::IsNull(..)),
                    self.write_condition(out, inner)
                );
            }
            Condition::And(items) | Condition::Or(items) => {
                let separator = if matches!(value, Condition::And(..)) {
                    " AND "
                } else {
                    " OR "
                };
                separated_by(
                    out,
                    items,
                    |out, v| {
                        possibly_parenthesized!(out, compound(v), self.write_condition(out, v));
                    },
                    separator,
                );
            }
        }
    }

    fn write_select(&self, out: &mut String, value: &Select) {
        out.push_str("SELECT ");
        if value.columns.is_empty() {
            out.push('*');
        }
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_identifier_quoted(out, v),
            ", ",
        );
        out.push_str("\nFROM ");
        self.write_table_ref(out, &value.table);
        if !value.condition.is_true() {
            out.push_str("\nWHERE ");
            self.write_condition(out, &value.condition);
        }
        if !value.order_by.is_empty() {
            out.push_str("\nORDER BY ");
            separated_by(
                out,
                &value.order_by,
                |out, v| {
                    self.write_identifier_quoted(out, &v.column);
                    out.push_str(match v.order {
                        Order::Asc => " ASC",
                        Order::Desc => " DESC",
                    });
                },
                ", ",
            );
        }
        if let Some(limit) = value.limit {
            let _ = write!(out, "\nLIMIT {}", limit);
        }
        out.push(';');
    }

    fn write_insert(&self, out: &mut String, value: &Insert) {
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, &value.table);
        out.push_str(" (");
        separated_by(
            out,
            value.columns.iter(),
            |out, v| self.write_identifier_quoted(out, v),
            ", ",
        );
        out.push_str(") VALUES");
        let mut first = true;
        for row in &value.rows {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str("\n(");
            separated_by(out, row.iter(), |out, v| self.write_value(out, v), ", ");
            out.push(')');
        }
        out.push(';');
    }

    fn write_update(&self, out: &mut String, value: &Update) {
        out.push_str("UPDATE ");
        self.write_table_ref(out, &value.table);
        out.push_str(" SET ");
        separated_by(
            out,
            &value.values,
            |out, (column, v)| {
                self.write_identifier_quoted(out, column);
                out.push_str(" = ");
                self.write_value(out, v);
            },
            ", ",
        );
        if !value.condition.is_true() {
            out.push_str("\nWHERE ");
            self.write_condition(out, &value.condition);
        }
        out.push(';');
    }

    fn write_delete(&self, out: &mut String, value: &Delete) {
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, &value.table);
        if !value.condition.is_true() {
            out.push_str("\nWHERE ");
            self.write_condition(out, &value.condition);
        }
        out.push(';');
    }

    fn write_query(&self, out: &mut String, value: &Query) {
        match value {
            Query::Raw(v) => out.push_str(v),
            Query::Select(v) => self.write_select(out, v),
            Query::Insert(v) => self.write_insert(out, v),
            Query::Update(v) => self.write_update(out, v),
            Query::Delete(v) => self.write_delete(out, v),
        }
    }
}

/// Fallback SQL writer with no dialect specific overrides.
#[derive(Default, Clone, Copy)]
pub struct GenericSqlWriter {}

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
