use quickread_core::Value;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use std::cmp::Ordering;

fn as_integer(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Int8(Some(v)) => *v as i128,
        Value::Int16(Some(v)) => *v as i128,
        Value::Int32(Some(v)) => *v as i128,
        Value::Int64(Some(v)) => *v as i128,
        Value::Int128(Some(v)) => *v,
        Value::UInt8(Some(v)) => *v as i128,
        Value::UInt16(Some(v)) => *v as i128,
        Value::UInt32(Some(v)) => *v as i128,
        Value::UInt64(Some(v)) => *v as i128,
        Value::UInt128(Some(v)) => i128::try_from(*v).ok()?,
        _ => return None,
    })
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Float32(Some(v)) => Some(*v as f64),
        Value::Float64(Some(v)) => Some(*v),
        _ => as_integer(value).map(|v| v as f64),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(Some(v), ..) => Some(*v),
        Value::Float32(Some(v)) => Decimal::from_f32(*v),
        Value::Float64(Some(v)) => Decimal::from_f64(*v),
        _ => as_integer(value).and_then(Decimal::from_i128),
    }
}

/// Orders two non null values, `None` when they are not comparable.
///
/// Numbers compare across widths and representations.
pub(crate) fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Boolean(Some(l)), Value::Boolean(Some(r))) => l.partial_cmp(r),
        (Value::Varchar(Some(l)), Value::Varchar(Some(r))) => l.partial_cmp(r),
        (Value::Blob(Some(l)), Value::Blob(Some(r))) => l.partial_cmp(r),
        (Value::Date(Some(l)), Value::Date(Some(r))) => l.partial_cmp(r),
        (Value::Time(Some(l)), Value::Time(Some(r))) => l.partial_cmp(r),
        (Value::Timestamp(Some(l)), Value::Timestamp(Some(r))) => l.partial_cmp(r),
        (Value::TimestampWithTimezone(Some(l)), Value::TimestampWithTimezone(Some(r))) => {
            l.partial_cmp(r)
        }
        (Value::Uuid(Some(l)), Value::Uuid(Some(r))) => l.partial_cmp(r),
        (Value::Decimal(..), _) | (_, Value::Decimal(..)) => {
            as_decimal(lhs)?.partial_cmp(&as_decimal(rhs)?)
        }
        (Value::Float32(..) | Value::Float64(..), _) | (_, Value::Float32(..) | Value::Float64(..)) => {
            as_float(lhs)?.partial_cmp(&as_float(rhs)?)
        }
        _ => as_integer(lhs)?.partial_cmp(&as_integer(rhs)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn integers_across_widths() {
        assert_eq!(
            compare(&Value::Int32(Some(7)), &Value::UInt64(Some(7))),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare(&Value::Int8(Some(-1)), &Value::UInt8(Some(0))),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn mixed_numbers() {
        assert_eq!(
            compare(&Value::Float64(Some(2.5)), &Value::Int16(Some(2))),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare(
                &Value::Decimal(Some(Decimal::from_str("9.99").unwrap()), 0, 0),
                &Value::Int64(Some(10))
            ),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn incomparable() {
        assert_eq!(
            compare(&Value::Varchar(Some("1".into())), &Value::Int32(Some(1))),
            None
        );
        assert_eq!(compare(&Value::Int32(None), &Value::Int32(Some(1))), None);
    }
}
